//! 설정 관리 -- flowtag.toml 파싱 및 런타임 설정
//!
//! [`FlowtagConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`FLOWTAG_TAGGER_WORKERS=4` 형식)
//! 3. 설정 파일 (`flowtag.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), flowtag_core::error::FlowtagError> {
//! use flowtag_core::config::FlowtagConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = FlowtagConfig::load("flowtag.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = FlowtagConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, FlowtagError};

/// 워커 수 상한
pub const MAX_WORKERS: usize = 256;

/// flowtag 통합 설정
///
/// `flowtag.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowtagConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 태깅 엔진 설정
    #[serde(default)]
    pub tagger: TaggerSection,
    /// 리포트 출력 설정
    #[serde(default)]
    pub output: OutputConfig,
}

impl FlowtagConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, FlowtagError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일 없이 기본값에 환경변수 오버라이드만 적용합니다.
    pub fn from_env() -> Result<Self, FlowtagError> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    ///
    /// 검증하지 않습니다. 환경변수가 파일 값을 덮어쓸 수 있도록 검증은
    /// [`load`](Self::load)에서 오버라이드 적용 후에 한 번만 수행합니다.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, FlowtagError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FlowtagError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                FlowtagError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, FlowtagError> {
        toml::from_str(toml_str).map_err(|e| {
            FlowtagError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `FLOWTAG_{SECTION}_{FIELD}`
    /// 예: `FLOWTAG_OUTPUT_DIR=/tmp/reports`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "FLOWTAG_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "FLOWTAG_GENERAL_LOG_FORMAT");

        // Tagger
        override_usize(&mut self.tagger.workers, "FLOWTAG_TAGGER_WORKERS");
        override_usize(
            &mut self.tagger.max_skip_warnings,
            "FLOWTAG_TAGGER_MAX_SKIP_WARNINGS",
        );
        override_bool(
            &mut self.tagger.ignore_blank_lines,
            "FLOWTAG_TAGGER_IGNORE_BLANK_LINES",
        );

        // Output
        override_string(&mut self.output.dir, "FLOWTAG_OUTPUT_DIR");
        override_string(
            &mut self.output.tag_counts_file,
            "FLOWTAG_OUTPUT_TAG_COUNTS_FILE",
        );
        override_string(
            &mut self.output.port_protocol_counts_file,
            "FLOWTAG_OUTPUT_PORT_PROTOCOL_COUNTS_FILE",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), FlowtagError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.tagger.workers == 0 || self.tagger.workers > MAX_WORKERS {
            return Err(ConfigError::InvalidValue {
                field: "tagger.workers".to_owned(),
                reason: format!("must be 1-{MAX_WORKERS}"),
            }
            .into());
        }

        if self.output.dir.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "output.dir".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        validate_file_name("output.tag_counts_file", &self.output.tag_counts_file)?;
        validate_file_name(
            "output.port_protocol_counts_file",
            &self.output.port_protocol_counts_file,
        )?;

        if self.output.tag_counts_file == self.output.port_protocol_counts_file {
            return Err(ConfigError::InvalidValue {
                field: "output.port_protocol_counts_file".to_owned(),
                reason: "must differ from output.tag_counts_file".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 리포트 파일 이름은 출력 디렉토리 밖을 가리킬 수 없습니다.
fn validate_file_name(field: &str, name: &str) -> Result<(), FlowtagError> {
    if name.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: field.to_owned(),
            reason: "must not be empty".to_owned(),
        }
        .into());
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(ConfigError::InvalidValue {
            field: field.to_owned(),
            reason: format!("'{name}' must be a plain file name"),
        }
        .into());
    }
    Ok(())
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 태깅 엔진 설정 (`[tagger]` 섹션)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerSection {
    /// 분류 워커 수 (1이면 순차 처리)
    pub workers: usize,
    /// 라인별 경고 로그 최대 개수 (초과분은 debug 레벨)
    pub max_skip_warnings: usize,
    /// 빈 라인을 건너뛴 라인으로 세지 않고 무시할지 여부
    pub ignore_blank_lines: bool,
}

impl Default for TaggerSection {
    fn default() -> Self {
        Self {
            workers: 1,
            max_skip_warnings: 100,
            ignore_blank_lines: false,
        }
    }
}

/// 리포트 출력 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// 리포트 디렉토리
    pub dir: String,
    /// 태그별 집계 파일 이름
    pub tag_counts_file: String,
    /// 포트/프로토콜별 집계 파일 이름
    pub port_protocol_counts_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: ".".to_owned(),
            tag_counts_file: "tag_counts.csv".to_owned(),
            port_protocol_counts_file: "port_protocol_counts.csv".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}
