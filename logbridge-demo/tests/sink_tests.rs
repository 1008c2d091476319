//! JSON-lines sink and config resolution tests.

use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio_util::sync::CancellationToken;
use tracing_subscriber::layer::{Layer, SubscriberExt};

use logbridge_core::pipeline::{Handler, RecordReader};
use logbridge_core::types::{Attr, SourceLevel, SourceRecord};
use logbridge_demo::cli::DemoCli;
use logbridge_demo::logging::{APP_TARGET, app_filter};
use logbridge_demo::sink::JsonLineSink;
use logbridge_handoff::{Provider, ProviderLayer};

fn lines(buf: &[u8]) -> Vec<serde_json::Value> {
    std::str::from_utf8(buf)
        .expect("utf8 output")
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid json line"))
        .collect()
}

#[tokio::test]
async fn sink_writes_one_line_per_record() {
    let provider = Provider::new(10);
    provider
        .handle(
            SourceRecord::new(SystemTime::now(), SourceLevel::INFO, "User authentication")
                .with_attr(Attr::string("user_id", "12345")),
        )
        .unwrap();
    provider
        .handle(
            SourceRecord::new(SystemTime::now(), SourceLevel::ERROR, "Database connection failed")
                .with_attr(Attr::int64("retry_count", 3))
                .with_attr(Attr::duration("timeout", Duration::from_millis(45))),
        )
        .unwrap();
    provider.close().unwrap();

    let mut sink = JsonLineSink::new(Vec::new());
    let written = sink
        .run(&provider, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(written, 2);

    let out = lines(&sink.into_inner());
    assert_eq!(out.len(), 2);
    assert_eq!(out[0]["level"], "info");
    assert_eq!(out[0]["msg"], "User authentication");
    assert_eq!(out[0]["user_id"], "12345");
    assert_eq!(out[1]["level"], "error");
    assert_eq!(out[1]["retry_count"], 3);
    assert_eq!(out[1]["timeout"], "45ms");
    assert!(out[1]["ts"].is_string());
}

#[tokio::test]
async fn sink_stops_on_cancellation() {
    let provider = Provider::new(10);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut sink = JsonLineSink::new(Vec::new());
    let written = sink.run(&provider, &cancel).await.unwrap();
    assert_eq!(written, 0);
    assert!(sink.into_inner().is_empty());
    assert!(!provider.is_closed());
}

#[tokio::test]
async fn app_events_flow_through_layer_to_sink() {
    let provider = Arc::new(Provider::new(16));
    let subscriber = tracing_subscriber::registry()
        .with(ProviderLayer::new(Arc::clone(&provider)).with_filter(app_filter()));
    tracing::subscriber::with_default(subscriber, || {
        tracing::warn!(target: APP_TARGET, current_rate = 95_i64, "Rate limit approaching");
        tracing::info!(target: "internal", "not forwarded");
    });
    provider.close().unwrap();

    let mut sink = JsonLineSink::new(Vec::new());
    let written = sink
        .run(provider.as_ref(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(written, 1);
    let out = lines(&sink.into_inner());
    assert_eq!(out[0]["msg"], "Rate limit approaching");
    assert_eq!(out[0]["current_rate"], 95);
}

#[tokio::test]
#[serial_test::serial]
async fn resolve_config_from_file_with_cli_override() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(b"[provider]\nbuffer_size = 50\nmax_fields = 4\n")
        .expect("write");

    let cli = DemoCli {
        config: Some(file.path().to_path_buf()),
        max_fields: Some(9),
        ..Default::default()
    };
    let config = cli.resolve_config().await.unwrap();
    assert_eq!(config.provider.buffer_size, 50);
    assert_eq!(config.provider.max_fields, 9);
}

#[tokio::test]
#[serial_test::serial]
async fn cli_override_fixes_invalid_file_value() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(b"[provider]\nbuffer_size = 0\n").expect("write");

    let cli = DemoCli {
        config: Some(file.path().to_path_buf()),
        buffer_size: Some(10),
        ..Default::default()
    };
    let config = cli.resolve_config().await.unwrap();
    assert_eq!(config.provider.buffer_size, 10);

    let without_override = DemoCli {
        config: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    let err = without_override.resolve_config().await.unwrap_err();
    assert!(format!("{err:#}").contains("provider.buffer_size"));
}

#[tokio::test]
#[serial_test::serial]
async fn resolve_config_rejects_invalid_override() {
    let cli = DemoCli {
        buffer_size: Some(0),
        ..Default::default()
    };
    let err = cli.resolve_config().await.unwrap_err();
    assert!(format!("{err:#}").contains("provider.buffer_size"));
}

#[tokio::test]
#[serial_test::serial]
async fn resolve_config_missing_file_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cli = DemoCli {
        config: Some(dir.path().join("missing.toml")),
        ..Default::default()
    };
    let err = cli.resolve_config().await.unwrap_err();
    assert!(format!("{err:#}").contains("failed to load config"));
}
