//! 도메인 타입 -- 시스템 전역에서 사용되는 공통 타입
//!
//! 분류기, 집계기, 리포트 작성기가 공유하는 데이터 구조를 정의합니다.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 분류 결과에 사용되는 프로토콜 이름
///
/// 변형 순서는 이름의 사전순(icmp < tcp < udp)과 같아서
/// 파생된 `Ord`가 문자열 정렬과 일치합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Icmp,
    Tcp,
    Udp,
}

impl Protocol {
    /// 플로우 로그의 프로토콜 번호를 이름으로 변환합니다.
    ///
    /// `6`은 tcp, `17`은 udp, 그 외 모든 값(빈 문자열, 숫자가 아닌 값 포함)은
    /// icmp로 처리합니다. 기존 리포트와의 호환을 위해 IANA 전체 표를 쓰지 않습니다.
    pub fn from_number(number: &str) -> Self {
        match number.trim() {
            "6" => Self::Tcp,
            "17" => Self::Udp,
            _ => Self::Icmp,
        }
    }

    /// 소문자 프로토콜 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Icmp => "icmp",
            Self::Tcp => "tcp",
            Self::Udp => "udp",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = String;

    /// 대소문자와 앞뒤 공백을 무시하고 프로토콜 이름을 해석합니다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "icmp" => Ok(Self::Icmp),
            "tcp" => Ok(Self::Tcp),
            "udp" => Ok(Self::Udp),
            other => Err(format!("unknown protocol name: '{other}'")),
        }
    }
}

/// 집계 키 -- (목적지 포트, 프로토콜)
///
/// 포트는 정수로 해석하지 않고 원본 문자열 그대로 보관합니다.
/// 정렬도 문자열 기준이므로 `"10"`이 `"9"`보다 앞섭니다.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FlowKey {
    /// 목적지 포트 (trim된 문자열)
    pub port: String,
    /// 프로토콜 이름
    pub protocol: Protocol,
}

impl FlowKey {
    /// 새 키를 생성합니다. 포트는 앞뒤 공백을 제거합니다.
    pub fn new(port: impl AsRef<str>, protocol: Protocol) -> Self {
        Self {
            port: port.as_ref().trim().to_owned(),
            protocol,
        }
    }
}

impl fmt::Display for FlowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.port, self.protocol)
    }
}

/// 한 라인의 분류 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// 매칭된 태그 또는 `untagged`
    pub tag: String,
    /// 집계 키
    pub key: FlowKey,
}

impl Classification {
    /// 목적지 포트
    pub fn port(&self) -> &str {
        &self.key.port
    }

    /// 프로토콜 이름
    pub fn protocol(&self) -> Protocol {
        self.key.protocol
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.key, self.tag)
    }
}
