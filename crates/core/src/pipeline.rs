//! 파이프라인 trait -- 모듈 확장 포인트 정의

use crate::error::ParseError;
use crate::types::FlowKey;

/// 플로우 로그 라인 파서 trait
///
/// 한 라인에서 집계 키(목적지 포트, 프로토콜)를 추출합니다.
/// 새로운 로그 레이아웃을 지원하려면 이 trait을 구현합니다.
pub trait FlowParser: Send + Sync {
    /// 지원하는 로그 형식 이름
    fn format_name(&self) -> &str;

    /// 원시 라인에서 집계 키를 추출
    ///
    /// 형식이 맞지 않는 라인은 패닉 없이 [`ParseError`]로 반환해야 합니다.
    fn parse(&self, line: &str) -> Result<FlowKey, ParseError>;
}
