#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`lookup`]: CSV 룩업 테이블 로딩 및 정규화된 키 조회
//! - [`classifier`]: 라인 필드 추출(기본 형식 파서)과 태그 결정
//! - [`aggregator`]: 태그별/(포트, 프로토콜)별 카운터와 정렬된 스냅샷
//! - [`pipeline`]: 순차/분할 실행 오케스트레이션과 실행 결과
//! - [`clean`]: 룩업 CSV와 플로우 로그 공백 정리
//! - [`report`]: 집계 결과 CSV 출력
//! - [`config`]: 엔진 설정 (core 설정 확장)
//! - [`error`]: 도메인 에러 타입

pub mod aggregator;
pub mod classifier;
pub mod clean;
pub mod config;
pub mod error;
pub mod lookup;
pub mod pipeline;
pub mod report;

// --- 주요 타입 re-export ---

// 파이프라인
pub use pipeline::{PipelineReport, TaggingPipeline};

// 설정
pub use config::{TaggerConfig, TaggerConfigBuilder};

// 에러
pub use error::TaggerError;

// 룩업 테이블
pub use lookup::{LookupKey, LookupRow, LookupTable};

// 분류기
pub use classifier::{RecordClassifier, UNTAGGED, VpcFlowLogParser};

// 집계
pub use aggregator::{Aggregator, CountSnapshot, PortProtocolCount, TagCount};

// 정리
pub use clean::CleanStats;
