//! 에러 타입 -- 도메인별 에러 정의
//!
//! 핸드오프 큐의 세 가지 결과 중 `Dropped`는 에러가 아니므로 여기에 없습니다.
//! `Closed`와 `Cancelled`만 경계(trait) 레벨에서 에러 값으로 표현됩니다.

use std::fmt;

/// logbridge 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 핸드오프(큐) 종료 신호
    #[error("handoff error: {0}")]
    Handoff(#[from] HandoffError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// 프로바이더가 닫혀서 발생한 에러인지 확인합니다.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Handoff(HandoffError::Closed))
    }

    /// 읽기 취소로 발생한 에러라면 취소 사유를 반환합니다.
    pub fn cancel_reason(&self) -> Option<CancelReason> {
        match self {
            Self::Handoff(HandoffError::Cancelled(reason)) => Some(*reason),
            _ => None,
        }
    }
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 핸드오프 경계의 종료 신호
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HandoffError {
    /// 프로바이더가 종료되어 더 이상 레코드를 받지 않음
    #[error("provider closed")]
    Closed,

    /// 호출자가 전달한 취소 신호가 발동됨
    #[error("read cancelled: {0}")]
    Cancelled(CancelReason),
}

/// 읽기 취소 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelReason {
    /// 취소 토큰이 명시적으로 발동됨
    Cancelled,
    /// 데드라인이 지남
    DeadlineExceeded,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "cancelled"),
            Self::DeadlineExceeded => write!(f, "deadline exceeded"),
        }
    }
}
