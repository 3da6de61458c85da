//! 라인 분류기 -- 플로우 로그 한 줄을 태그와 집계 키로 변환합니다.
//!
//! [`VpcFlowLogParser`]는 core의 [`FlowParser`] trait을 구현하며,
//! 공백으로 분리된 필드 중 고정 위치(5: 목적지 포트, 7: 프로토콜 번호)만 사용합니다.
//! [`RecordClassifier`]는 파서 결과를 [`LookupTable`]에서 조회하고,
//! 매칭되지 않으면 [`UNTAGGED`]를 부여합니다.
//!
//! # 사용 예시
//! ```ignore
//! use flowtag_tagger::{LookupTable, RecordClassifier};
//!
//! let table = LookupTable::load("lookup.csv")?;
//! let classifier = RecordClassifier::new(&table);
//! let result = classifier.classify(line)?;
//! ```

use flowtag_core::error::ParseError;
use flowtag_core::pipeline::FlowParser;
use flowtag_core::types::{Classification, FlowKey, Protocol};

use crate::lookup::LookupTable;

/// 룩업 테이블에 없는 키에 부여되는 태그
pub const UNTAGGED: &str = "untagged";

/// 한 라인에 필요한 최소 필드 수
pub const MIN_FIELDS: usize = 12;

/// 목적지 포트 필드 위치
pub const DSTPORT_INDEX: usize = 5;

/// 프로토콜 번호 필드 위치
pub const PROTOCOL_INDEX: usize = 7;

const _: () = assert!(DSTPORT_INDEX < MIN_FIELDS && PROTOCOL_INDEX < MIN_FIELDS);

/// 기본 형식(version 2) 플로우 로그 파서
#[derive(Debug, Clone, Copy, Default)]
pub struct VpcFlowLogParser;

impl VpcFlowLogParser {
    /// 새 파서를 생성합니다.
    pub fn new() -> Self {
        Self
    }
}

impl FlowParser for VpcFlowLogParser {
    fn format_name(&self) -> &str {
        "vpc-flow-v2"
    }

    fn parse(&self, line: &str) -> Result<FlowKey, ParseError> {
        let fields: Vec<&str> = line.split_whitespace().collect();

        if fields.len() < MIN_FIELDS {
            return Err(ParseError::MalformedLine {
                line: line.trim().to_owned(),
                field_count: fields.len(),
                min_fields: MIN_FIELDS,
            });
        }

        // 아래 인덱싱은 MIN_FIELDS 검사와 모듈 상단의 const 단언으로 보장됩니다.
        let port = fields[DSTPORT_INDEX];
        let protocol = Protocol::from_number(fields[PROTOCOL_INDEX]);

        Ok(FlowKey::new(port, protocol))
    }
}

/// 라인 분류기
///
/// 룩업 테이블을 빌려 사용하므로 여러 워커가 같은 테이블을 공유할 수 있습니다.
pub struct RecordClassifier<'t> {
    table: &'t LookupTable,
    parser: Box<dyn FlowParser>,
}

impl<'t> RecordClassifier<'t> {
    /// 기본 파서([`VpcFlowLogParser`])로 분류기를 생성합니다.
    pub fn new(table: &'t LookupTable) -> Self {
        Self::with_parser(table, Box::new(VpcFlowLogParser::new()))
    }

    /// 지정한 파서로 분류기를 생성합니다.
    pub fn with_parser(table: &'t LookupTable, parser: Box<dyn FlowParser>) -> Self {
        Self { table, parser }
    }

    /// 한 라인을 분류합니다.
    ///
    /// 필드 추출에 실패하면 [`ParseError`]를 반환합니다.
    /// 룩업 테이블에 없는 키는 에러가 아니며 [`UNTAGGED`] 태그를 받습니다.
    pub fn classify(&self, line: &str) -> Result<Classification, ParseError> {
        let key = self.parser.parse(line)?;
        let tag = self.table.lookup_flow(&key).unwrap_or(UNTAGGED).to_owned();
        Ok(Classification { tag, key })
    }

    /// 사용 중인 파서의 형식 이름
    pub fn format_name(&self) -> &str {
        self.parser.format_name()
    }

    /// 분류에 사용하는 룩업 테이블
    pub fn table(&self) -> &'t LookupTable {
        self.table
    }
}

/// 기본 파서로 한 라인을 분류합니다.
pub fn classify(line: &str, table: &LookupTable) -> Result<Classification, ParseError> {
    RecordClassifier::new(table).classify(line)
}
