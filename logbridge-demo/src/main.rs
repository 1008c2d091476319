use std::sync::Arc;
use std::time::{Duration, SystemTime};

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use logbridge_core::pipeline::{Handler, RecordReader};
use logbridge_core::types::{Attr, SourceLevel, SourceRecord};
use logbridge_demo::cli::DemoCli;
use logbridge_demo::logging::{APP_TARGET, init_tracing};
use logbridge_demo::sink::JsonLineSink;
use logbridge_handoff::{Provider, ProviderConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = DemoCli::parse();
    let config = cli.resolve_config().await?;

    if cli.validate {
        println!("configuration is valid");
        return Ok(());
    }

    // 프로바이더 생성
    let provider_config = ProviderConfig::from_core(&config.provider);
    provider_config.validate()?;
    let provider = Arc::new(Provider::from_config(&provider_config));

    // 로깅 초기화 (ProviderLayer 포함)
    init_tracing(&config.general, Arc::clone(&provider))?;

    tracing::info!(
        buffer_size = provider.capacity(),
        max_fields = provider.max_fields(),
        "logbridge-demo starting"
    );

    // 싱크 시작
    let cancel = CancellationToken::new();
    let mut sink = {
        let provider = Arc::clone(&provider);
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let mut sink = JsonLineSink::new(std::io::stdout());
            sink.run(provider.as_ref(), &cancel).await
        })
    };

    emit_samples(&provider)?;

    // 종료: 새 레코드 차단 후 싱크가 남은 레코드를 모두 쓸 때까지 대기
    provider.close()?;
    let written = match tokio::time::timeout(Duration::from_secs(5), &mut sink).await {
        Ok(joined) => joined??,
        Err(_) => {
            tracing::warn!("sink did not drain in time, cancelling");
            cancel.cancel();
            sink.await??
        }
    };

    let stats = provider.stats();
    tracing::info!(
        written,
        accepted = stats.accepted,
        dropped = stats.dropped,
        rejected = stats.rejected,
        "logbridge-demo finished"
    );
    Ok(())
}

/// 모든 레벨과 필드 타입의 샘플 이벤트를 보냅니다.
fn emit_samples(provider: &Provider) -> Result<()> {
    tracing::debug!(target: APP_TARGET, component = "main", version = "1.0.0", "Application initializing");
    tracing::info!(target: APP_TARGET, user_id = "12345", method = "oauth", "User authentication");
    tracing::warn!(target: APP_TARGET, current_rate = 95_i64, limit = 100_i64, "Rate limit approaching");
    tracing::error!(target: APP_TARGET, error = "timeout", retry_count = 3_i64, "Database connection failed");

    tracing::info!(
        target: APP_TARGET,
        service = "auth",
        requests = 1523_i64,
        avg_response = ?Duration::from_millis(45),
        healthy = true,
        cpu_usage = 23.4_f64,
        "Performance metrics"
    );

    // 핸들러 경계를 직접 사용: 기간 타입과 그룹 속성
    let record = SourceRecord::new(SystemTime::now(), SourceLevel::INFO, "Processing request")
        .with_attr(Attr::group(
            "request",
            vec![
                Attr::string("request_id", "req-123"),
                Attr::string("path", "/api/users"),
                Attr::string("method", "GET"),
            ],
        ))
        .with_attr(Attr::duration("elapsed", Duration::from_millis(12)));
    if provider.enabled(record.level) {
        provider.handle(record)?;
    }

    Ok(())
}
