//! 집계기 -- 태그별, (포트, 프로토콜)별 카운트
//!
//! 두 카운터는 항상 함께 증가하므로 전체 합계가 같습니다.
//! 워커별 집계기를 만든 뒤 [`Aggregator::merge`]로 합칠 수 있으며,
//! 덧셈이므로 병합 순서는 결과에 영향을 주지 않습니다.

use std::collections::HashMap;

use serde::Serialize;

use flowtag_core::types::{Classification, FlowKey, Protocol};

/// 태그별/키별 카운터
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregator {
    tag_counts: HashMap<String, u64>,
    port_protocol_counts: HashMap<FlowKey, u64>,
}

impl Aggregator {
    /// 빈 집계기를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 분류 결과 하나를 기록합니다.
    pub fn record(&mut self, tag: &str, port: &str, protocol: Protocol) {
        self.record_classification(Classification {
            tag: tag.to_owned(),
            key: FlowKey::new(port, protocol),
        });
    }

    /// 분류 결과 하나를 기록합니다 (소유권 이동, 추가 할당 없음).
    pub fn record_classification(&mut self, classification: Classification) {
        let Classification { tag, key } = classification;
        *self.tag_counts.entry(tag).or_insert(0) += 1;
        *self.port_protocol_counts.entry(key).or_insert(0) += 1;
    }

    /// 다른 집계기의 카운트를 더합니다.
    pub fn merge(&mut self, other: Aggregator) {
        for (tag, count) in other.tag_counts {
            *self.tag_counts.entry(tag).or_insert(0) += count;
        }
        for (key, count) in other.port_protocol_counts {
            *self.port_protocol_counts.entry(key).or_insert(0) += count;
        }
    }

    /// 기록된 분류 결과 수
    pub fn total(&self) -> u64 {
        self.tag_counts.values().sum()
    }

    /// 태그의 카운트
    pub fn tag_count(&self, tag: &str) -> u64 {
        self.tag_counts.get(tag).copied().unwrap_or(0)
    }

    /// (포트, 프로토콜)의 카운트
    pub fn port_protocol_count(&self, port: &str, protocol: Protocol) -> u64 {
        self.port_protocol_counts
            .get(&FlowKey::new(port, protocol))
            .copied()
            .unwrap_or(0)
    }

    /// 아무것도 기록되지 않았는지 여부
    pub fn is_empty(&self) -> bool {
        self.tag_counts.is_empty()
    }

    /// 프로토콜별 합계 (메트릭 보고용)
    pub fn protocol_totals(&self) -> [(Protocol, u64); 3] {
        let mut totals = [(Protocol::Icmp, 0), (Protocol::Tcp, 0), (Protocol::Udp, 0)];
        for (key, count) in &self.port_protocol_counts {
            if let Some(slot) = totals.iter_mut().find(|(p, _)| *p == key.protocol) {
                slot.1 += count;
            }
        }
        totals
    }

    /// 정렬된 읽기 전용 스냅샷을 생성합니다.
    ///
    /// 태그는 문자열 순, 키는 (포트, 프로토콜) 문자열 순으로 정렬됩니다.
    pub fn snapshot(&self) -> CountSnapshot {
        let mut tag_counts: Vec<TagCount> = self
            .tag_counts
            .iter()
            .map(|(tag, &count)| TagCount {
                tag: tag.clone(),
                count,
            })
            .collect();
        tag_counts.sort_by(|a, b| a.tag.cmp(&b.tag));

        let mut port_protocol_counts: Vec<PortProtocolCount> = self
            .port_protocol_counts
            .iter()
            .map(|(key, &count)| PortProtocolCount {
                port: key.port.clone(),
                protocol: key.protocol,
                count,
            })
            .collect();
        port_protocol_counts.sort_by(|a, b| {
            (a.port.as_str(), a.protocol.as_str()).cmp(&(b.port.as_str(), b.protocol.as_str()))
        });

        CountSnapshot {
            tag_counts,
            port_protocol_counts,
        }
    }
}

/// 태그별 카운트 행
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: u64,
}

/// (포트, 프로토콜)별 카운트 행
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortProtocolCount {
    pub port: String,
    pub protocol: Protocol,
    pub count: u64,
}

/// 정렬된 집계 스냅샷
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CountSnapshot {
    pub tag_counts: Vec<TagCount>,
    pub port_protocol_counts: Vec<PortProtocolCount>,
}

impl CountSnapshot {
    /// 태그 카운트 합계
    pub fn tag_total(&self) -> u64 {
        self.tag_counts.iter().map(|c| c.count).sum()
    }

    /// (포트, 프로토콜) 카운트 합계
    pub fn port_protocol_total(&self) -> u64 {
        self.port_protocol_counts.iter().map(|c| c.count).sum()
    }
}
