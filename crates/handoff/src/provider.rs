//! 이중 인터페이스 어댑터 -- 상류 핸들러와 하류 리더를 하나의 큐로 잇습니다.
//!
//! [`Provider`]는 core의 [`Handler`]와 [`RecordReader`] trait을 모두 구현합니다.
//! 로그 호출 지점은 `handle`로 소스 레코드를 밀어 넣고,
//! 파이프라인은 `read`로 변환된 레코드를 하나씩 당겨 갑니다.
//! 변환은 적재 시점이 아니라 읽기 시점에 일어납니다.
//!
//! # 사용 예시
//! ```ignore
//! use std::sync::Arc;
//! use logbridge_core::{Handler, RecordReader};
//! use logbridge_handoff::Provider;
//!
//! let provider = Arc::new(Provider::new(1000));
//! provider.handle(record)?;
//!
//! let cancel = CancellationToken::new();
//! while let Some(record) = provider.read(&cancel).await? {
//!     // ...
//! }
//! provider.close()?;
//! ```

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use logbridge_core::error::{BridgeError, HandoffError};
use logbridge_core::pipeline::{Handler, RecordReader};
use logbridge_core::types::{DEFAULT_MAX_FIELDS, Record, SourceLevel, SourceRecord};

use crate::config::ProviderConfig;
use crate::convert::convert_record;
use crate::queue::{Dequeued, Enqueued, HandoffQueue, QueueStats};

/// 소스 레코드를 버퍼링했다가 파이프라인 레코드로 내주는 어댑터
///
/// 동시성 특성:
/// - `handle`/`enqueue`는 블로킹하지 않습니다 (버퍼가 가득 차면 버림)
/// - `read`만 대기하며, 취소 토큰 또는 종료로 깨어납니다
/// - `close`는 멱등이며 어느 스레드에서나 호출할 수 있습니다
pub struct Provider {
    /// 소스 레코드 핸드오프 큐
    queue: HandoffQueue<SourceRecord>,
    /// 하류 레코드 필드 한도
    max_fields: usize,
}

impl Provider {
    /// 기본 필드 한도로 새 프로바이더를 생성합니다.
    ///
    /// 버퍼가 클수록 버스트에 강하지만 메모리를 더 씁니다.
    pub fn new(buffer_size: usize) -> Self {
        Self::with_field_limit(buffer_size, DEFAULT_MAX_FIELDS)
    }

    /// 하류 필드 한도를 지정하여 새 프로바이더를 생성합니다.
    pub fn with_field_limit(buffer_size: usize, max_fields: usize) -> Self {
        let queue = HandoffQueue::new(buffer_size);
        debug!(
            buffer_size = queue.capacity(),
            max_fields, "log provider created"
        );
        Self { queue, max_fields }
    }

    /// 검증된 설정으로 프로바이더를 생성합니다.
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::with_field_limit(config.buffer_size, config.max_fields)
    }

    /// 소스 레코드를 큐에 넣고 결과를 그대로 반환합니다.
    ///
    /// [`Handler::handle`]과 달리 `Dropped`와 `Accepted`를 구분할 수 있습니다.
    pub fn enqueue(&self, record: SourceRecord) -> Enqueued {
        self.queue.enqueue(record)
    }

    /// 데드라인이 있는 읽기
    ///
    /// 데드라인이 지나면 `CancelReason::DeadlineExceeded`를 담은 에러를 반환합니다.
    pub async fn read_until(
        &self,
        cancel: &CancellationToken,
        deadline: Instant,
    ) -> Result<Option<Record>, BridgeError> {
        let outcome = self.queue.dequeue_until(cancel, deadline).await;
        self.finish_read(outcome)
    }

    fn finish_read(&self, outcome: Dequeued<SourceRecord>) -> Result<Option<Record>, BridgeError> {
        match outcome {
            Dequeued::Item(source) => Ok(Some(convert_record(source, self.max_fields))),
            Dequeued::Closed => Ok(None),
            Dequeued::Cancelled(reason) => Err(HandoffError::Cancelled(reason).into()),
        }
    }

    /// 종료 여부를 반환합니다.
    pub fn is_closed(&self) -> bool {
        self.queue.is_closed()
    }

    /// 큐 누적 통계를 반환합니다.
    pub fn stats(&self) -> QueueStats {
        self.queue.stats()
    }

    /// 현재 버퍼에 있는 레코드 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// 큐 용량을 반환합니다.
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// 하류 레코드 필드 한도를 반환합니다.
    pub fn max_fields(&self) -> usize {
        self.max_fields
    }

    /// 버퍼 사용률을 0.0~1.0 범위로 반환합니다.
    pub fn utilization(&self) -> f64 {
        let capacity = self.queue.capacity();
        if capacity == 0 {
            return 0.0;
        }
        f64::from(u32::try_from(self.queue.len()).unwrap_or(u32::MAX))
            / f64::from(u32::try_from(capacity).unwrap_or(u32::MAX))
    }
}

impl Handler for Provider {
    /// 항상 `true`입니다. 레벨 필터링은 하류 파이프라인이 담당합니다.
    fn enabled(&self, _level: SourceLevel) -> bool {
        true
    }

    /// 레코드를 큐에 넣습니다.
    ///
    /// 버퍼가 가득 차서 버려져도 `Ok(())`입니다. 닫힌 뒤에만 에러를 반환합니다.
    fn handle(&self, record: SourceRecord) -> Result<(), BridgeError> {
        match self.queue.enqueue(record) {
            Enqueued::Accepted | Enqueued::Dropped => Ok(()),
            Enqueued::Closed => Err(HandoffError::Closed.into()),
        }
    }
}

impl RecordReader for Provider {
    async fn read(&self, cancel: &CancellationToken) -> Result<Option<Record>, BridgeError> {
        let outcome = self.queue.dequeue(cancel).await;
        self.finish_read(outcome)
    }

    /// 더 이상 레코드를 받지 않도록 닫습니다.
    ///
    /// 버퍼에 남은 레코드는 `read`로 계속 읽을 수 있고,
    /// 모두 읽은 뒤 `read`가 `Ok(None)`을 반환합니다.
    fn close(&self) -> Result<(), BridgeError> {
        if self.queue.shutdown() {
            info!(
                pending = self.queue.len(),
                dropped = self.queue.stats().dropped,
                "log provider closed"
            );
        }
        Ok(())
    }
}
