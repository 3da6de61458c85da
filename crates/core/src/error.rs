//! 에러 타입 -- 도메인별 에러 정의
//!
//! 치명적 에러([`ConfigError`], [`SourceError`])와 라인 단위로 복구 가능한
//! 에러([`ParseError`])를 타입으로 구분합니다. 호출자는 메시지 문자열을
//! 검사하지 않고도 실행 중단 여부를 판단할 수 있습니다.

/// flowtag 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum FlowtagError {
    /// 설정 관련 에러 (룩업 테이블 포함)
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 플로우 로그 소스 에러
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// 라인 파싱 에러
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl FlowtagError {
    /// 실행 전체를 중단해야 하는 에러인지 여부
    ///
    /// 라인 파싱 에러만 복구 가능합니다.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Parse(_))
    }
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일 또는 룩업 테이블을 찾을 수 없음
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// 룩업 테이블에 필수 컬럼이 없음
    #[error("missing expected column in the lookup table: {column}")]
    MissingColumn { column: String },

    /// 룩업 테이블의 행을 해석할 수 없음
    #[error("invalid lookup row {row}: {reason}")]
    InvalidRow { row: u64, reason: String },
}

/// 플로우 로그 소스 에러
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// 소스를 열 수 없음
    #[error("flow log source unavailable: {path}: {reason}")]
    Unavailable { path: String, reason: String },

    /// 읽는 도중 실패
    #[error("failed to read flow log at line {line}: {reason}")]
    ReadFailed { line: u64, reason: String },
}

/// 라인 파싱 에러 (복구 가능)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// 필드 수 부족
    #[error("not enough fields: got {field_count}, need at least {min_fields}")]
    MalformedLine {
        /// 원본 라인
        line: String,
        /// 공백으로 분리된 필드 수
        field_count: usize,
        /// 요구되는 최소 필드 수
        min_fields: usize,
    },

    /// 고정 위치 필드 추출 실패
    ///
    /// 기본 VPC 파서는 최소 필드 수 검사로 충분하므로 이 에러를 만들지 않습니다.
    /// 필드 위치가 가변적인 [`FlowParser`](crate::pipeline::FlowParser) 구현용입니다.
    #[error("missing field at index {index}")]
    MissingField {
        /// 필드 인덱스 (0부터)
        index: usize,
        /// 원본 라인
        line: String,
    },
}

impl ParseError {
    /// 진단 메시지용 원본 라인
    pub fn line(&self) -> &str {
        match self {
            Self::MalformedLine { line, .. } | Self::MissingField { line, .. } => line,
        }
    }
}
