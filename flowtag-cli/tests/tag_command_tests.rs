//! Integration tests for `flowtag tag` and `flowtag clean` commands.
//!
//! Runs the compiled binary against temporary lookup tables and flow logs.

use std::fs;
use std::process::Command;

use tempfile::TempDir;

const LOOKUP_CSV: &str = "dstport,protocol,tag\n443,tcp,sv_P2\n68,udp,sv_P2\n23,tcp,sv_P1\n";

const FLOW_LOG: &str = "\
2 123456789012 eni-0a1b2c3d 10.0.1.201 198.51.100.2 443 49153 6 25 20000 1620140761 1620140821 ACCEPT OK
2 123456789012 eni-4d3c2b1a 192.168.1.100 203.0.113.101 23 49154 6 15 12000 1620140761 1620140821 REJECT OK
2 123456789012 eni-1a2b3c4d 10.0.0.5 10.0.0.6 68 67 17 3 900 1620140661 1620140721 ACCEPT OK
2 123456789012 eni-1a2b3c4d 10.0.0.5 10.0.0.6 8080 67 6 3 900 1620140661 1620140721 ACCEPT OK
2 123456789012 eni-broken
";

fn flowtag(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_flowtag"));
    cmd.current_dir(dir.path()).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn write_inputs(dir: &TempDir) {
    fs::write(dir.path().join("lookup.csv"), LOOKUP_CSV).expect("should write lookup");
    fs::write(dir.path().join("flows.log"), FLOW_LOG).expect("should write flow log");
}

#[test]
fn test_tag_writes_reports_and_json_summary() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    write_inputs(&temp_dir);

    let output = flowtag(&temp_dir)
        .args(["--output", "json", "tag", "flows.log", "lookup.csv", "--output-dir", "out"])
        .output()
        .expect("should run flowtag");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["total_lines"].as_u64(), Some(5));
    assert_eq!(json["classified"].as_u64(), Some(4));
    assert_eq!(json["skipped"].as_u64(), Some(1));
    assert_eq!(json["untagged"].as_u64(), Some(1));
    assert_eq!(json["lookup_entries"].as_u64(), Some(3));

    let tags = fs::read_to_string(temp_dir.path().join("out/tag_counts.csv"))
        .expect("tag report should exist");
    assert_eq!(tags, "Tag,Count\nsv_p1,1\nsv_p2,2\nuntagged,1\n");

    let ports = fs::read_to_string(temp_dir.path().join("out/port_protocol_counts.csv"))
        .expect("port/protocol report should exist");
    assert_eq!(
        ports,
        "Port,Protocol,Count\n23,tcp,1\n443,tcp,1\n68,udp,1\n8080,tcp,1\n"
    );
}

#[test]
fn test_tag_skip_warning_goes_to_stderr() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    write_inputs(&temp_dir);

    let output = flowtag(&temp_dir)
        .args(["--output", "json", "tag", "flows.log", "lookup.csv"])
        .output()
        .expect("should run flowtag");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("skipped"), "stderr should carry the skip summary: {stderr}");
    serde_json::from_slice::<serde_json::Value>(&output.stdout)
        .expect("stdout should stay pure JSON");
}

#[test]
fn test_tag_with_workers_matches_sequential() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    write_inputs(&temp_dir);

    let sequential = flowtag(&temp_dir)
        .args(["--output", "json", "tag", "flows.log", "lookup.csv", "--output-dir", "seq"])
        .output()
        .expect("should run flowtag");
    let parallel = flowtag(&temp_dir)
        .args(["--output", "json", "tag", "flows.log", "lookup.csv", "--output-dir", "par", "-w", "3"])
        .output()
        .expect("should run flowtag");

    assert!(sequential.status.success() && parallel.status.success());
    let seq_tags = fs::read_to_string(temp_dir.path().join("seq/tag_counts.csv")).expect("seq report");
    let par_tags = fs::read_to_string(temp_dir.path().join("par/tag_counts.csv")).expect("par report");
    assert_eq!(seq_tags, par_tags);
}

#[test]
fn test_tag_missing_flow_log_exits_with_source_code() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    write_inputs(&temp_dir);

    let output = flowtag(&temp_dir)
        .args(["tag", "missing.log", "lookup.csv"])
        .output()
        .expect("should run flowtag");

    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.log"));
}

#[test]
fn test_tag_lookup_missing_column_exits_with_config_code() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    write_inputs(&temp_dir);
    fs::write(temp_dir.path().join("bad.csv"), "dstport,protocol\n443,tcp\n")
        .expect("should write lookup");

    let output = flowtag(&temp_dir)
        .args(["tag", "flows.log", "bad.csv", "--output-dir", "out"])
        .output()
        .expect("should run flowtag");

    assert_eq!(output.status.code(), Some(2));
    assert!(
        !temp_dir.path().join("out").exists(),
        "no report should be written when the lookup table is invalid"
    );
}

#[test]
fn test_tag_invalid_workers_exits_with_config_code() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    write_inputs(&temp_dir);

    let output = flowtag(&temp_dir)
        .args(["tag", "flows.log", "lookup.csv", "--workers", "0"])
        .output()
        .expect("should run flowtag");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_clean_lookup_and_flows() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    fs::write(
        temp_dir.path().join("raw.csv"),
        " dstport , protocol , tag \n 443 , TCP , Web \n , , \n",
    )
    .expect("should write raw lookup");
    fs::write(temp_dir.path().join("raw.log"), "  a b c  \n\n   \n").expect("should write raw log");

    let output = flowtag(&temp_dir)
        .args(["--output", "json", "clean", "lookup", "raw.csv", "clean.csv"])
        .output()
        .expect("should run flowtag");
    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["kind"].as_str(), Some("lookup"));
    assert_eq!(json["written"].as_u64(), Some(1));
    assert_eq!(json["dropped"].as_u64(), Some(1));
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("clean.csv")).expect("clean csv"),
        "dstport,protocol,tag\n443,TCP,Web\n"
    );

    let output = flowtag(&temp_dir)
        .args(["clean", "flows", "raw.log", "clean.log"])
        .output()
        .expect("should run flowtag");
    assert!(output.status.success());
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("clean.log")).expect("clean log"),
        "a b c\n"
    );
}

#[test]
fn test_clean_in_place_is_rejected_and_keeps_input() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    fs::write(temp_dir.path().join("raw.log"), " a b c \n d e f \n").expect("should write raw log");

    let output = flowtag(&temp_dir)
        .args(["clean", "flows", "raw.log", "raw.log"])
        .output()
        .expect("should run flowtag");

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("raw.log")).expect("raw log"),
        " a b c \n d e f \n"
    );
}

#[test]
fn test_tag_accepts_lookup_rows_with_trailing_comma() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    write_inputs(&temp_dir);
    fs::write(
        temp_dir.path().join("trailing.csv"),
        "dstport,protocol,tag\n443,tcp,sv_P2,\n23,tcp,sv_P1\n",
    )
    .expect("should write lookup");

    let output = flowtag(&temp_dir)
        .args(["tag", "flows.log", "trailing.csv", "--output-dir", "out"])
        .output()
        .expect("should run flowtag");

    assert!(output.status.success());
    let tag_counts =
        fs::read_to_string(temp_dir.path().join("out/tag_counts.csv")).expect("tag counts");
    assert!(tag_counts.contains("sv_p2,1"));
}
