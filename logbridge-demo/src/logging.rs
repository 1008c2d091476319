//! Logging initialization for logbridge-demo.
//!
//! Installs two layers on one registry:
//! - a formatting layer (json or pretty, to stderr) filtered by `EnvFilter`
//! - a [`ProviderLayer`] that hands application events to the provider
//!
//! Only events with the [`APP_TARGET`] target reach the provider, so the
//! demo's own diagnostics never end up in the record stream.

use std::sync::Arc;

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

use logbridge_core::config::GeneralConfig;
use logbridge_handoff::{Provider, ProviderLayer};

/// Target used by application call sites whose events become records.
pub const APP_TARGET: &str = "app";

/// Filter selecting the events forwarded to the provider.
pub fn app_filter() -> Targets {
    Targets::new().with_target(APP_TARGET, LevelFilter::TRACE)
}

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros are used.
///
/// # Formats
///
/// * `"json"` - Machine-parseable JSON lines
/// * `"pretty"` - Human-readable output (for development)
pub fn init_tracing(config: &GeneralConfig, provider: Arc<Provider>) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let provider_layer = ProviderLayer::new(provider).with_filter(app_filter());

    match config.log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(provider_layer)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_filter(env_filter),
                )
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize JSON tracing subscriber: {}", e)
                })?;
        }
        "pretty" => {
            tracing_subscriber::registry()
                .with(provider_layer)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr)
                        .with_filter(env_filter),
                )
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize pretty tracing subscriber: {}", e)
                })?;
        }
        _ => {
            return Err(anyhow::anyhow!(
                "unknown log format '{}', expected 'json' or 'pretty'",
                config.log_format
            ));
        }
    }

    Ok(())
}
