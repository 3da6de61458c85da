//! 룩업 테이블 -- (목적지 포트, 프로토콜) → 태그 매핑
//!
//! CSV 헤더에 `dstport`, `protocol`, `tag` 컬럼이 있어야 합니다.
//! 세 필드 모두 앞뒤 공백을 제거하고, 프로토콜과 태그는 소문자로 정규화합니다.
//! 같은 키가 여러 번 나오면 나중 행이 앞의 행을 덮어씁니다.
//!
//! 테이블은 한 번 생성된 뒤 읽기 전용이며 스레드 간에 공유할 수 있습니다.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};

use flowtag_core::metrics as m;
use flowtag_core::types::{FlowKey, Protocol};

use crate::error::TaggerError;

/// 룩업 CSV의 필수 컬럼
pub const REQUIRED_COLUMNS: [&str; 3] = ["dstport", "protocol", "tag"];

/// 룩업 키 -- 정규화된 (포트, 프로토콜 이름)
///
/// 포트는 정수로 해석하지 않으므로 `"0443"`과 `"443"`은 서로 다른 키입니다.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LookupKey {
    port: String,
    protocol: String,
}

impl LookupKey {
    /// 포트는 trim, 프로토콜은 trim 후 소문자로 정규화합니다.
    pub fn new(port: &str, protocol: &str) -> Self {
        Self {
            port: port.trim().to_owned(),
            protocol: protocol.trim().to_lowercase(),
        }
    }

    /// 목적지 포트
    pub fn port(&self) -> &str {
        &self.port
    }

    /// 프로토콜 이름 (소문자)
    pub fn protocol(&self) -> &str {
        &self.protocol
    }
}

impl From<&FlowKey> for LookupKey {
    fn from(key: &FlowKey) -> Self {
        Self::new(&key.port, key.protocol.as_str())
    }
}

/// 룩업 테이블 원본 행
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRow {
    pub dstport: String,
    pub protocol: String,
    pub tag: String,
}

impl LookupRow {
    pub fn new(dstport: impl Into<String>, protocol: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            dstport: dstport.into(),
            protocol: protocol.into(),
            tag: tag.into(),
        }
    }

    fn is_blank(&self) -> bool {
        self.dstport.trim().is_empty() && self.protocol.trim().is_empty() && self.tag.trim().is_empty()
    }
}

/// 불변 룩업 테이블
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupTable {
    entries: HashMap<LookupKey, String>,
}

impl LookupTable {
    /// 행 목록에서 테이블을 생성합니다.
    pub fn build<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = LookupRow>,
    {
        let mut entries = HashMap::new();

        for row in rows {
            let key = LookupKey::new(&row.dstport, &row.protocol);
            let tag = row.tag.trim().to_lowercase();

            if key.protocol.parse::<Protocol>().is_err() {
                tracing::warn!(
                    dstport = %key.port,
                    protocol = %key.protocol,
                    "lookup protocol is not tcp, udp or icmp; entry can never match"
                );
            }

            if let Some(previous) = entries.insert(key.clone(), tag) {
                tracing::debug!(
                    dstport = %key.port,
                    protocol = %key.protocol,
                    previous = %previous,
                    "duplicate lookup key, later row wins"
                );
            }
        }

        Self { entries }
    }

    /// CSV 리더에서 테이블을 생성합니다.
    ///
    /// # Errors
    /// - 헤더에 필수 컬럼이 없는 경우 ([`TaggerError::MissingColumn`])
    /// - 행을 읽거나 해석할 수 없는 경우 ([`TaggerError::InvalidRow`])
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TaggerError> {
        let mut rdr = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| TaggerError::InvalidRow {
                row: 1,
                reason: format!("failed to read header: {e}"),
            })?
            .clone();

        let mut indices = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers.iter().position(|h| h == column).ok_or_else(|| {
                TaggerError::MissingColumn {
                    column: column.to_owned(),
                }
            })?;
        }
        let [dstport_idx, protocol_idx, tag_idx] = indices;
        let required_width = indices.iter().max().map_or(0, |max| max + 1);

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| TaggerError::InvalidRow {
                row: e.position().map_or(0, |p| p.line()),
                reason: e.to_string(),
            })?;
            let row_number = record.position().map_or(0, |p| p.line());

            if record.iter().all(str::is_empty) {
                tracing::debug!(row = row_number, "blank lookup row, skipping");
                continue;
            }

            // 필드 수가 헤더와 달라도 되지만 필수 컬럼까지는 있어야 합니다.
            if record.len() < required_width {
                return Err(TaggerError::InvalidRow {
                    row: row_number,
                    reason: format!(
                        "row has {} fields, required columns need {}",
                        record.len(),
                        required_width
                    ),
                });
            }

            let field = |index: usize| record.get(index).unwrap_or_default();
            let row = LookupRow::new(field(dstport_idx), field(protocol_idx), field(tag_idx));

            if row.is_blank() {
                tracing::debug!(row = row_number, "blank lookup row, skipping");
                continue;
            }
            rows.push(row);
        }

        let table = Self::build(rows);
        metrics::gauge!(m::LOOKUP_ENTRIES).set(table.len() as f64);
        Ok(table)
    }

    /// 디스크의 CSV 파일에서 테이블을 로드합니다.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TaggerError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| TaggerError::LookupUnavailable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let table = Self::from_reader(file)?;
        tracing::info!(
            path = %path.display(),
            entries = table.len(),
            "loaded lookup table"
        );
        Ok(table)
    }

    /// 정확히 일치하는 키의 태그를 반환합니다.
    ///
    /// 조회 인자도 키와 같은 방식으로 정규화됩니다.
    pub fn lookup(&self, port: &str, protocol: &str) -> Option<&str> {
        self.entries
            .get(&LookupKey::new(port, protocol))
            .map(String::as_str)
    }

    /// 집계 키로 태그를 조회합니다.
    pub fn lookup_flow(&self, key: &FlowKey) -> Option<&str> {
        self.entries.get(&LookupKey::from(key)).map(String::as_str)
    }

    /// 엔트리 수
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 테이블이 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 모든 엔트리를 순회합니다 (순서 보장 없음).
    pub fn iter(&self) -> impl Iterator<Item = (&LookupKey, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }
}
