//! CSV 리포트 출력
//!
//! - 태그별 카운트: 헤더 `Tag,Count`
//! - (포트, 프로토콜)별 카운트: 헤더 `Port,Protocol,Count`
//!
//! 행 순서는 [`CountSnapshot`]의 정렬 순서를 그대로 따릅니다.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::Writer;

use flowtag_core::config::OutputConfig;

use crate::aggregator::CountSnapshot;
use crate::error::TaggerError;

/// 태그별 카운트 CSV 헤더
pub const TAG_COUNTS_HEADER: [&str; 2] = ["Tag", "Count"];

/// (포트, 프로토콜)별 카운트 CSV 헤더
pub const PORT_PROTOCOL_COUNTS_HEADER: [&str; 3] = ["Port", "Protocol", "Count"];

/// 기록된 리포트 파일 경로
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub tag_counts: PathBuf,
    pub port_protocol_counts: PathBuf,
}

/// 태그별 카운트를 CSV로 기록합니다.
pub fn write_tag_counts<W: Write>(writer: W, snapshot: &CountSnapshot) -> Result<(), TaggerError> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(TAG_COUNTS_HEADER)?;
    for row in &snapshot.tag_counts {
        wtr.write_record([row.tag.as_str(), row.count.to_string().as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// (포트, 프로토콜)별 카운트를 CSV로 기록합니다.
pub fn write_port_protocol_counts<W: Write>(
    writer: W,
    snapshot: &CountSnapshot,
) -> Result<(), TaggerError> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(PORT_PROTOCOL_COUNTS_HEADER)?;
    for row in &snapshot.port_protocol_counts {
        wtr.write_record([
            row.port.as_str(),
            row.protocol.as_str(),
            row.count.to_string().as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// 출력 설정에 따라 두 리포트 파일을 기록합니다.
///
/// 출력 디렉토리가 없으면 생성합니다.
pub fn write_reports(output: &OutputConfig, snapshot: &CountSnapshot) -> Result<ReportPaths, TaggerError> {
    let dir = Path::new(&output.dir);
    fs::create_dir_all(dir)?;

    let paths = ReportPaths {
        tag_counts: dir.join(&output.tag_counts_file),
        port_protocol_counts: dir.join(&output.port_protocol_counts_file),
    };

    write_tag_counts(BufWriter::new(File::create(&paths.tag_counts)?), snapshot)?;
    write_port_protocol_counts(
        BufWriter::new(File::create(&paths.port_protocol_counts)?),
        snapshot,
    )?;

    tracing::info!(
        tag_counts = %paths.tag_counts.display(),
        port_protocol_counts = %paths.port_protocol_counts.display(),
        "wrote reports"
    );
    Ok(paths)
}
