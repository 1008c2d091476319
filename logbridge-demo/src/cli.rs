//! CLI argument definitions for logbridge-demo.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use logbridge_core::config::BridgeConfig;

/// logbridge demo.
///
/// Emits sample events through `tracing`, hands them off to the provider
/// and writes the converted records to stdout as JSON lines.
#[derive(Parser, Debug, Default)]
#[command(name = "logbridge-demo")]
#[command(version, about, long_about = None)]
pub struct DemoCli {
    /// Path to logbridge.toml configuration file.
    ///
    /// Without it, defaults and `LOGBRIDGE_*` environment variables are used.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override handoff queue capacity.
    #[arg(long)]
    pub buffer_size: Option<usize>,

    /// Override the per-record field limit.
    #[arg(long)]
    pub max_fields: Option<usize>,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_format: Option<String>,

    /// Validate configuration and exit without running the demo.
    #[arg(long)]
    pub validate: bool,
}

impl DemoCli {
    /// Resolve the effective configuration.
    ///
    /// Order: defaults, config file, environment, CLI flags. The result is
    /// validated after all overrides are applied.
    pub async fn resolve_config(&self) -> Result<BridgeConfig> {
        let mut config = match &self.config {
            Some(path) => BridgeConfig::from_file(path)
                .await
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => BridgeConfig::default(),
        };

        config.apply_env_overrides();
        self.apply_overrides(&mut config);
        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    /// Apply CLI flags on top of `config`.
    pub fn apply_overrides(&self, config: &mut BridgeConfig) {
        if let Some(level) = &self.log_level {
            debug!(log_level = %level, "cli override");
            config.general.log_level.clone_from(level);
        }
        if let Some(format) = &self.log_format {
            debug!(log_format = %format, "cli override");
            config.general.log_format.clone_from(format);
        }
        if let Some(size) = self.buffer_size {
            debug!(buffer_size = size, "cli override");
            config.provider.buffer_size = size;
        }
        if let Some(max_fields) = self.max_fields {
            debug!(max_fields, "cli override");
            config.provider.max_fields = max_fields;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_flags() {
        let cli = DemoCli::try_parse_from([
            "logbridge-demo",
            "--config",
            "/tmp/logbridge.toml",
            "--buffer-size",
            "64",
            "--max-fields",
            "8",
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "--validate",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/logbridge.toml")));
        assert_eq!(cli.buffer_size, Some(64));
        assert_eq!(cli.max_fields, Some(8));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.log_format.as_deref(), Some("json"));
        assert!(cli.validate);
    }

    #[test]
    fn no_flags_means_no_overrides() {
        let cli = DemoCli::try_parse_from(["logbridge-demo"]).unwrap();
        assert!(cli.config.is_none());
        assert!(!cli.validate);

        let mut config = BridgeConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.provider.buffer_size, 1000);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn rejects_non_numeric_buffer_size() {
        assert!(DemoCli::try_parse_from(["logbridge-demo", "--buffer-size", "big"]).is_err());
    }

    #[test]
    fn overrides_replace_config_values() {
        let cli = DemoCli {
            buffer_size: Some(10),
            max_fields: Some(2),
            log_format: Some("json".to_owned()),
            ..Default::default()
        };
        let mut config = BridgeConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.provider.buffer_size, 10);
        assert_eq!(config.provider.max_fields, 2);
        assert_eq!(config.general.log_format, "json");
    }
}
