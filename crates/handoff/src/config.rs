//! 프로바이더 설정
//!
//! [`ProviderConfig`]는 core의 [`ProviderSection`](logbridge_core::config::ProviderSection)을
//! 기반으로 프로바이더 생성에 필요한 값을 담습니다.
//!
//! # 사용 예시
//! ```ignore
//! use logbridge_core::config::BridgeConfig;
//! use logbridge_handoff::config::ProviderConfig;
//!
//! let core_config = BridgeConfig::default();
//! let config = ProviderConfig::from_core(&core_config.provider);
//! ```

use serde::{Deserialize, Serialize};

use logbridge_core::config::{MAX_BUFFER_SIZE, ProviderSection};
use logbridge_core::types::DEFAULT_MAX_FIELDS;

use crate::error::ProviderError;

/// 프로바이더 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// 핸드오프 큐 용량
    pub buffer_size: usize,
    /// 하류 레코드의 필드 한도
    pub max_fields: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            buffer_size: 1000,
            max_fields: DEFAULT_MAX_FIELDS,
        }
    }
}

impl ProviderConfig {
    /// core의 `ProviderSection`에서 설정을 생성합니다.
    pub fn from_core(core: &ProviderSection) -> Self {
        Self {
            buffer_size: core.buffer_size,
            max_fields: core.max_fields,
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.buffer_size == 0 || self.buffer_size > MAX_BUFFER_SIZE {
            return Err(ProviderError::Config {
                field: "buffer_size".to_owned(),
                reason: format!("must be 1-{MAX_BUFFER_SIZE}"),
            });
        }

        if self.max_fields == 0 {
            return Err(ProviderError::Config {
                field: "max_fields".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        Ok(())
    }
}

/// 프로바이더 설정 빌더
#[derive(Default)]
pub struct ProviderConfigBuilder {
    config: ProviderConfig,
}

impl ProviderConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 큐 용량을 설정합니다.
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.config.buffer_size = size;
        self
    }

    /// 필드 한도를 설정합니다.
    pub fn max_fields(mut self, max_fields: usize) -> Self {
        self.config.max_fields = max_fields;
        self
    }

    /// 설정을 검증하고 `ProviderConfig`를 생성합니다.
    pub fn build(self) -> Result<ProviderConfig, ProviderError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
