//! `tracing` 연결 -- 이벤트를 소스 레코드로 만들어 프로바이더에 넘깁니다.
//!
//! [`ProviderLayer`]를 subscriber에 얹으면 `tracing::info!` 등의 호출이
//! 그대로 핸드오프 큐로 들어갑니다. span 컨텍스트는 사용하지 않습니다.

use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use tracing::field::{Field as TracingField, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use logbridge_core::pipeline::Handler;
use logbridge_core::types::{Attr, SourceLevel, SourceRecord};

use crate::provider::Provider;

/// `tracing` 레벨에 대응하는 소스 레벨
///
/// TRACE는 DEBUG보다 4 낮은 값으로 매핑되어 변환 후 `Debug`가 됩니다.
pub fn source_level(level: &tracing::Level) -> SourceLevel {
    match *level {
        tracing::Level::TRACE => SourceLevel(SourceLevel::DEBUG.0 - 4),
        tracing::Level::DEBUG => SourceLevel::DEBUG,
        tracing::Level::INFO => SourceLevel::INFO,
        tracing::Level::WARN => SourceLevel::WARN,
        tracing::Level::ERROR => SourceLevel::ERROR,
    }
}

/// 이벤트를 프로바이더로 전달하는 `tracing_subscriber` 레이어
#[derive(Clone)]
pub struct ProviderLayer {
    provider: Arc<Provider>,
}

impl ProviderLayer {
    pub fn new(provider: Arc<Provider>) -> Self {
        Self { provider }
    }

    /// 연결된 프로바이더를 반환합니다.
    pub fn provider(&self) -> &Arc<Provider> {
        &self.provider
    }
}

impl<S: Subscriber> Layer<S> for ProviderLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = source_level(event.metadata().level());
        if !self.provider.enabled(level) {
            return;
        }

        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);

        let mut record = SourceRecord::new(SystemTime::now(), level, visitor.message);
        record.add_attrs(visitor.attrs);

        // 닫힌 뒤의 이벤트는 버린다
        let _ = self.provider.handle(record);
    }
}

/// 이벤트 필드를 메시지와 속성으로 나눠 모으는 visitor
#[derive(Default)]
struct RecordVisitor {
    message: String,
    attrs: Vec<Attr>,
}

impl RecordVisitor {
    fn push(&mut self, field: &TracingField, attr: impl FnOnce(&'static str) -> Attr) {
        self.attrs.push(attr(field.name()));
    }
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &TracingField, value: &str) {
        if field.name() == "message" {
            self.message = value.to_owned();
        } else {
            self.push(field, |key| Attr::string(key, value));
        }
    }

    fn record_i64(&mut self, field: &TracingField, value: i64) {
        self.push(field, |key| Attr::int64(key, value));
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        self.push(field, |key| Attr::uint64(key, value));
    }

    fn record_f64(&mut self, field: &TracingField, value: f64) {
        self.push(field, |key| Attr::float64(key, value));
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.push(field, |key| Attr::bool(key, value));
    }

    fn record_error(&mut self, field: &TracingField, value: &(dyn std::error::Error + 'static)) {
        self.push(field, |key| Attr::string(key, value.to_string()));
    }

    fn record_debug(&mut self, field: &TracingField, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push(field, |key| Attr::any(key, value));
        }
    }
}
