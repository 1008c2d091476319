//! 핸드오프 크레이트 에러 타입
//!
//! 큐 결과(`Dropped`/`Closed`/`Cancelled`)는 값으로 반환되므로 여기에 없습니다.
//! [`ProviderError`]는 프로바이더 구성 단계의 실패만 표현하며,
//! `From<ProviderError> for BridgeError` 변환으로 `?` 전파가 가능합니다.

use logbridge_core::error::{BridgeError, ConfigError};

/// 프로바이더 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },
}

impl From<ProviderError> for BridgeError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Config { field, reason } => {
                BridgeError::Config(ConfigError::InvalidValue { field, reason })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ProviderError::Config {
            field: "buffer_size".to_owned(),
            reason: "must be 1-10000000".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("buffer_size"));
        assert!(msg.contains("1-10000000"));
    }

    #[test]
    fn converts_to_bridge_error() {
        let err = ProviderError::Config {
            field: "max_fields".to_owned(),
            reason: "must be greater than 0".to_owned(),
        };
        let bridge: BridgeError = err.into();
        assert!(matches!(
            bridge,
            BridgeError::Config(ConfigError::InvalidValue { ref field, .. }) if field == "max_fields"
        ));
    }
}
