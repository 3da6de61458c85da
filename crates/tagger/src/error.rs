//! 태깅 엔진 에러 타입
//!
//! [`TaggerError`]는 엔진 내부에서 실행 전체를 중단시키는 에러를 표현합니다.
//! 라인 단위 형식 오류는 여기에 속하지 않으며
//! [`ParseError`](flowtag_core::error::ParseError)로 반환된 뒤 건너뛴 라인으로 집계됩니다.
//!
//! `From<TaggerError> for FlowtagError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use flowtag_core::error::{ConfigError, FlowtagError, SourceError};

/// 태깅 엔진 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum TaggerError {
    /// 룩업 테이블 파일을 열거나 읽을 수 없음
    #[error("lookup table unavailable: {path}: {reason}")]
    LookupUnavailable {
        /// 룩업 테이블 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 룩업 테이블 헤더에 필수 컬럼이 없음
    #[error("missing expected column in the lookup table: {column}")]
    MissingColumn {
        /// 누락된 컬럼 이름
        column: String,
    },

    /// 룩업 테이블 행을 해석할 수 없음
    #[error("invalid lookup row {row}: {reason}")]
    InvalidRow {
        /// 1부터 시작하는 CSV 라인 번호
        row: u64,
        /// 실패 사유
        reason: String,
    },

    /// 플로우 로그 소스를 열 수 없음
    #[error("flow log source unavailable: {path}: {reason}")]
    SourceUnavailable {
        /// 소스 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 플로우 로그를 읽는 도중 실패
    #[error("failed to read flow log at line {line}: {reason}")]
    SourceRead {
        /// 1부터 시작하는 라인 번호
        line: u64,
        /// 실패 사유
        reason: String,
    },

    /// 엔진 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// CSV 읽기/쓰기 에러
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl TaggerError {
    /// 룩업 테이블 또는 설정 문제인지 여부
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::LookupUnavailable { .. }
                | Self::MissingColumn { .. }
                | Self::InvalidRow { .. }
                | Self::Config { .. }
        )
    }

    /// 플로우 로그 소스 문제인지 여부
    pub fn is_source(&self) -> bool {
        matches!(self, Self::SourceUnavailable { .. } | Self::SourceRead { .. })
    }
}

impl From<TaggerError> for FlowtagError {
    fn from(err: TaggerError) -> Self {
        match err {
            TaggerError::LookupUnavailable { path, reason } => {
                FlowtagError::Config(ConfigError::InvalidValue {
                    field: "lookup_table".to_owned(),
                    reason: format!("{path}: {reason}"),
                })
            }
            TaggerError::MissingColumn { column } => {
                FlowtagError::Config(ConfigError::MissingColumn { column })
            }
            TaggerError::InvalidRow { row, reason } => {
                FlowtagError::Config(ConfigError::InvalidRow { row, reason })
            }
            TaggerError::SourceUnavailable { path, reason } => {
                FlowtagError::Source(SourceError::Unavailable { path, reason })
            }
            TaggerError::SourceRead { line, reason } => {
                FlowtagError::Source(SourceError::ReadFailed { line, reason })
            }
            TaggerError::Config { field, reason } => {
                FlowtagError::Config(ConfigError::InvalidValue { field, reason })
            }
            TaggerError::Csv(e) => FlowtagError::Io(std::io::Error::other(e.to_string())),
            TaggerError::Io(e) => FlowtagError::Io(e),
        }
    }
}
