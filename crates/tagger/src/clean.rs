//! 입력 정리 -- 룩업 CSV와 플로우 로그의 공백을 정리합니다.
//!
//! 태깅 전에 외부에서 받은 파일을 한 번 정리해 두는 용도입니다.
//! 태깅 엔진은 정리되지 않은 입력도 처리할 수 있으므로 필수 단계는 아닙니다.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use serde::Serialize;

use crate::error::TaggerError;

/// 정리 결과 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanStats {
    /// 출력에 기록된 행(라인) 수 (CSV 헤더 제외)
    pub written: u64,
    /// 비어 있어 버린 행(라인) 수
    pub dropped: u64,
}

/// 룩업 CSV를 정리합니다.
///
/// 헤더와 모든 필드의 앞뒤 공백을 제거하고, 모든 필드가 빈 행은 버립니다.
/// 행마다 필드 수가 달라도 그대로 기록합니다.
pub fn clean_lookup_csv<R: Read, W: Write>(reader: R, writer: W) -> Result<CleanStats, TaggerError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let mut wtr = WriterBuilder::new().flexible(true).from_writer(writer);

    let mut stats = CleanStats::default();
    let mut record = StringRecord::new();

    if !rdr.read_record(&mut record)? {
        wtr.flush()?;
        return Ok(stats);
    }
    wtr.write_record(&record)?;

    while rdr.read_record(&mut record)? {
        if record.iter().all(str::is_empty) {
            stats.dropped += 1;
            continue;
        }
        wtr.write_record(&record)?;
        stats.written += 1;
    }

    wtr.flush()?;
    Ok(stats)
}

/// 플로우 로그를 정리합니다.
///
/// 각 라인의 앞뒤 공백을 제거하고, 제거 후 빈 라인은 버립니다.
pub fn clean_flow_log<R: BufRead, W: Write>(reader: R, mut writer: W) -> Result<CleanStats, TaggerError> {
    let mut stats = CleanStats::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| TaggerError::SourceRead {
            line: index as u64 + 1,
            reason: e.to_string(),
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            stats.dropped += 1;
            continue;
        }
        writeln!(writer, "{trimmed}")?;
        stats.written += 1;
    }

    writer.flush()?;
    Ok(stats)
}

/// 출력 경로가 입력과 같은 파일이면 거부합니다.
///
/// 출력 파일을 생성하는 순간 입력이 비워지므로 열기 전에 확인해야 합니다.
fn ensure_distinct(input: &Path, output: &Path) -> Result<(), TaggerError> {
    let same = match (input.canonicalize(), output.canonicalize()) {
        (Ok(input), Ok(output)) => input == output,
        _ => false,
    };
    if same {
        return Err(TaggerError::Config {
            field: "output".to_owned(),
            reason: format!("{} is the same file as the input", output.display()),
        });
    }
    Ok(())
}

/// 파일 경로로 룩업 CSV를 정리합니다.
///
/// # Errors
/// - 입력 파일을 열 수 없는 경우 ([`TaggerError::LookupUnavailable`])
/// - 출력 경로가 입력과 같은 파일인 경우 ([`TaggerError::Config`])
pub fn clean_lookup_csv_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<CleanStats, TaggerError> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let file = File::open(input).map_err(|e| TaggerError::LookupUnavailable {
        path: input.display().to_string(),
        reason: e.to_string(),
    })?;
    ensure_distinct(input, output)?;

    let stats = clean_lookup_csv(file, BufWriter::new(File::create(output)?))?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        written = stats.written,
        dropped = stats.dropped,
        "cleaned lookup table"
    );
    Ok(stats)
}

/// 파일 경로로 플로우 로그를 정리합니다.
///
/// # Errors
/// - 입력 파일을 열 수 없는 경우 ([`TaggerError::SourceUnavailable`])
/// - 출력 경로가 입력과 같은 파일인 경우 ([`TaggerError::Config`])
pub fn clean_flow_log_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<CleanStats, TaggerError> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let file = File::open(input).map_err(|e| TaggerError::SourceUnavailable {
        path: input.display().to_string(),
        reason: e.to_string(),
    })?;
    ensure_distinct(input, output)?;

    let stats = clean_flow_log(BufReader::new(file), BufWriter::new(File::create(output)?))?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        written = stats.written,
        dropped = stats.dropped,
        "cleaned flow log"
    );
    Ok(stats)
}
