//! 태깅 엔진 설정
//!
//! [`TaggerConfig`]는 core의 [`TaggerSection`](flowtag_core::config::TaggerSection)을
//! 기반으로 파이프라인 실행 옵션을 제공합니다.
//!
//! # 사용 예시
//! ```ignore
//! use flowtag_core::config::FlowtagConfig;
//! use flowtag_tagger::config::TaggerConfig;
//!
//! let core_config = FlowtagConfig::default();
//! let config = TaggerConfig::from_core(&core_config.tagger);
//! ```

use flowtag_core::config::{MAX_WORKERS, TaggerSection};
use serde::{Deserialize, Serialize};

use crate::error::TaggerError;

/// 태깅 파이프라인 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggerConfig {
    /// 분류 워커 수 (1이면 순차 처리)
    pub workers: usize,
    /// 라인별 형식 오류 경고 최대 개수
    pub max_skip_warnings: usize,
    /// 빈 라인 무시 여부
    pub ignore_blank_lines: bool,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self::from_core(&TaggerSection::default())
    }
}

impl TaggerConfig {
    /// core의 `TaggerSection`에서 엔진 설정을 생성합니다.
    pub fn from_core(core: &TaggerSection) -> Self {
        Self {
            workers: core.workers,
            max_skip_warnings: core.max_skip_warnings,
            ignore_blank_lines: core.ignore_blank_lines,
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), TaggerError> {
        if self.workers == 0 || self.workers > MAX_WORKERS {
            return Err(TaggerError::Config {
                field: "workers".to_owned(),
                reason: format!("must be 1-{MAX_WORKERS}"),
            });
        }
        Ok(())
    }

    /// 순차 처리 여부
    pub fn is_sequential(&self) -> bool {
        self.workers <= 1
    }
}

/// 태깅 설정 빌더
#[derive(Default)]
pub struct TaggerConfigBuilder {
    config: TaggerConfig,
}

impl TaggerConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 워커 수를 설정합니다.
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// 경고 로그 상한을 설정합니다.
    pub fn max_skip_warnings(mut self, max: usize) -> Self {
        self.config.max_skip_warnings = max;
        self
    }

    /// 빈 라인 무시 여부를 설정합니다.
    pub fn ignore_blank_lines(mut self, ignore: bool) -> Self {
        self.config.ignore_blank_lines = ignore;
        self
    }

    /// 설정을 검증하고 `TaggerConfig`를 생성합니다.
    pub fn build(self) -> Result<TaggerConfig, TaggerError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
