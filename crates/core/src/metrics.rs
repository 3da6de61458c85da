//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`, `metrics::gauge!()`
//! 매크로를 호출합니다. 레코더가 설치되지 않으면 호출은 아무 일도 하지 않습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `flowtag_`
//! - 접미어: `_total` (counter), 없음 (gauge)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(flowtag_core::metrics::LINES_PROCESSED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 프로토콜 레이블 키 (tcp, udp, icmp)
pub const LABEL_PROTOCOL: &str = "protocol";

// ─── 파이프라인 메트릭 ──────────────────────────────────────────────

/// 분류에 성공한 라인 수 (counter, label: protocol)
pub const LINES_PROCESSED_TOTAL: &str = "flowtag_lines_processed_total";

/// 형식 오류로 건너뛴 라인 수 (counter)
pub const LINES_SKIPPED_TOTAL: &str = "flowtag_lines_skipped_total";

/// 룩업 테이블에 없어 `untagged`로 분류된 라인 수 (counter)
pub const LINES_UNTAGGED_TOTAL: &str = "flowtag_lines_untagged_total";

// ─── 룩업 테이블 메트릭 ─────────────────────────────────────────────

/// 로드된 룩업 엔트리 수 (gauge)
pub const LOOKUP_ENTRIES: &str = "flowtag_lookup_entries";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge};

    describe_counter!(
        LINES_PROCESSED_TOTAL,
        "Total number of flow log lines classified and aggregated"
    );
    describe_counter!(
        LINES_SKIPPED_TOTAL,
        "Total number of flow log lines skipped due to format issues"
    );
    describe_counter!(
        LINES_UNTAGGED_TOTAL,
        "Total number of flow log lines without a lookup table match"
    );
    describe_gauge!(
        LOOKUP_ENTRIES,
        "Number of (port, protocol) entries in the loaded lookup table"
    );
}
