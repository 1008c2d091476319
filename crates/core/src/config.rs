//! 설정 관리 -- logbridge.toml 파싱 및 런타임 설정
//!
//! [`BridgeConfig`]는 모든 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`LOGBRIDGE_PROVIDER_BUFFER_SIZE=5000` 형식)
//! 3. 설정 파일 (`logbridge.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), logbridge_core::error::BridgeError> {
//! use logbridge_core::config::BridgeConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = BridgeConfig::load("logbridge.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = BridgeConfig::parse("[provider]\nbuffer_size = 5000")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{BridgeError, ConfigError};
use crate::types::DEFAULT_MAX_FIELDS;

/// 버퍼 크기 상한
pub const MAX_BUFFER_SIZE: usize = 10_000_000;

/// logbridge 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 프로바이더(핸드오프 큐) 설정
    #[serde(default)]
    pub provider: ProviderSection,
}

impl BridgeConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, BridgeError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드, 검증 없음).
    ///
    /// 오버라이드를 더 적용할 호출자는 마지막에 [`validate`](Self::validate)를 호출해야 합니다.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, BridgeError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BridgeError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                BridgeError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, BridgeError> {
        toml::from_str(toml_str).map_err(|e| {
            BridgeError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOGBRIDGE_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        override_string(&mut self.general.log_level, "LOGBRIDGE_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LOGBRIDGE_GENERAL_LOG_FORMAT");

        override_usize(
            &mut self.provider.buffer_size,
            "LOGBRIDGE_PROVIDER_BUFFER_SIZE",
        );
        override_usize(&mut self.provider.max_fields, "LOGBRIDGE_PROVIDER_MAX_FIELDS");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), BridgeError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.provider.buffer_size == 0 || self.provider.buffer_size > MAX_BUFFER_SIZE {
            return Err(ConfigError::InvalidValue {
                field: "provider.buffer_size".to_owned(),
                reason: format!("must be 1-{MAX_BUFFER_SIZE}"),
            }
            .into());
        }

        if self.provider.max_fields == 0 {
            return Err(ConfigError::InvalidValue {
                field: "provider.max_fields".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 프로바이더 설정 섹션
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSection {
    /// 핸드오프 큐 용량 (레코드 수)
    ///
    /// - 100-500: 낮거나 보통 수준의 로깅량
    /// - 1000-5000: 높은 로깅량
    /// - 5000+: 버스트가 심한 환경
    pub buffer_size: usize,
    /// 하류 레코드가 보존하는 최대 필드 수
    pub max_fields: usize,
}

impl Default for ProviderSection {
    fn default() -> Self {
        Self {
            buffer_size: 1000,
            max_fields: DEFAULT_MAX_FIELDS,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}
