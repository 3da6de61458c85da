//! flowtag.toml 통합 설정 테스트
//!
//! - flowtag.toml.example 파싱 테스트
//! - 부분 설정 (일부 섹션만) 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 빈 파일 / 잘못된 형식 에러 테스트

use flowtag_core::config::FlowtagConfig;
use flowtag_core::error::{ConfigError, FlowtagError};
use serial_test::serial;

// =============================================================================
// flowtag.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../flowtag.toml.example");
    let config = FlowtagConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "pretty");
    assert_eq!(config.tagger.workers, 1);
    assert_eq!(config.tagger.max_skip_warnings, 100);
    assert!(!config.tagger.ignore_blank_lines);
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../flowtag.toml.example");
    let config = FlowtagConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_matches_defaults() {
    let content = include_str!("../../../flowtag.toml.example");
    let config = FlowtagConfig::parse(content).expect("should parse");
    let defaults = FlowtagConfig::default();

    assert_eq!(config.output.dir, defaults.output.dir);
    assert_eq!(config.output.tag_counts_file, defaults.output.tag_counts_file);
    assert_eq!(
        config.output.port_protocol_counts_file,
        defaults.output.port_protocol_counts_file
    );
}

// =============================================================================
// 부분 설정 / 에러 테스트
// =============================================================================

#[test]
fn output_only_config_keeps_other_defaults() {
    let config = FlowtagConfig::parse(
        r#"
[output]
dir = "/srv/reports"
"#,
    )
    .expect("should parse");

    assert_eq!(config.output.dir, "/srv/reports");
    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.tagger.workers, 1);
}

#[test]
fn wrong_value_type_is_parse_error() {
    let err = FlowtagConfig::parse("[tagger]\nworkers = \"many\"\n").unwrap_err();
    assert!(matches!(
        err,
        FlowtagError::Config(ConfigError::ParseFailed { .. })
    ));
}

#[tokio::test]
async fn load_empty_file_uses_defaults() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("flowtag.toml");
    std::fs::write(&path, "").expect("should write config");

    let config = FlowtagConfig::from_file(&path).await.expect("should load");
    assert_eq!(config.output.tag_counts_file, "tag_counts.csv");
}

#[tokio::test]
async fn validate_rejects_invalid_file_values() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("flowtag.toml");
    std::fs::write(&path, "[general]\nlog_format = \"xml\"\n").expect("should write config");

    let config = FlowtagConfig::from_file(&path).await.expect("should parse");
    let err = config.validate().unwrap_err();
    assert!(matches!(
        err,
        FlowtagError::Config(ConfigError::InvalidValue { .. })
    ));
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[tokio::test]
#[serial]
async fn env_overrides_take_precedence_over_file() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("flowtag.toml");
    std::fs::write(&path, "[output]\ndir = \"from-file\"\n").expect("should write config");

    // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
    unsafe { std::env::set_var("FLOWTAG_OUTPUT_DIR", "from-env") };
    let result = FlowtagConfig::load(&path).await;
    unsafe { std::env::remove_var("FLOWTAG_OUTPUT_DIR") };

    let config = result.expect("should load");
    assert_eq!(config.output.dir, "from-env");
}

#[tokio::test]
#[serial]
async fn env_override_is_validated() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("flowtag.toml");
    std::fs::write(&path, "").expect("should write config");

    // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
    unsafe { std::env::set_var("FLOWTAG_TAGGER_WORKERS", "0") };
    let result = FlowtagConfig::load(&path).await;
    unsafe { std::env::remove_var("FLOWTAG_TAGGER_WORKERS") };

    assert!(result.is_err(), "zero workers from env should be rejected");
}
