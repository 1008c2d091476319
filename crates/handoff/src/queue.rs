//! 핸드오프 큐 -- 다중 생산자 / 풀 기반 소비자 사이의 고정 용량 FIFO
//!
//! [`HandoffQueue`]는 로그 호출 지점(생산자)과 파이프라인 리더(소비자)의
//! 실행 컨텍스트를 분리합니다.
//!
//! # 오버플로우 정책
//! 버퍼가 가득 차면 새 유입을 조용히 버립니다 ([`Enqueued::Dropped`]).
//! 생산자는 소비자 속도와 무관하게 절대 블로킹되지 않습니다.
//! 버림 자체는 로그로 남기지 않고 카운터만 증가시킵니다.
//!
//! # 종료
//! [`HandoffQueue::shutdown`]은 원자적 compare-and-set 플래그와
//! 브로드캐스트 취소 토큰으로 구현됩니다. 종료 후에도 이미 들어간 레코드는
//! 순서대로 모두 읽을 수 있고, 버퍼가 빈 뒤에야 [`Dequeued::Closed`]가 보고됩니다.
//!
//! ```text
//! producers --try_send--> [ mpsc(capacity) ] --recv--> consumer
//!                 |                                  |
//!             closed flag <---- shutdown() ----> shutdown token
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::{Mutex, mpsc};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use logbridge_core::config::MAX_BUFFER_SIZE;
use logbridge_core::error::CancelReason;
use logbridge_core::metrics as names;

/// 큐 적재 결과
///
/// 세 결과 모두 정상적인 반환값이며 에러가 아닙니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueued {
    /// 버퍼에 저장됨
    Accepted,
    /// 버퍼가 가득 차서 버려짐
    Dropped,
    /// 큐가 종료되어 거부됨
    Closed,
}

impl Enqueued {
    pub fn is_accepted(self) -> bool {
        self == Self::Accepted
    }
}

/// 큐 인출 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dequeued<T> {
    /// FIFO 맨 앞의 항목
    Item(T),
    /// 호출자의 취소 신호가 발동됨
    Cancelled(CancelReason),
    /// 큐가 종료되었고 버퍼가 비었음
    Closed,
}

impl<T> Dequeued<T> {
    /// 항목이면 꺼내고, 종료 신호면 `None`을 반환합니다.
    pub fn into_item(self) -> Option<T> {
        match self {
            Self::Item(item) => Some(item),
            _ => None,
        }
    }
}

/// 큐 누적 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// 버퍼에 저장된 항목 수
    pub accepted: u64,
    /// 버퍼가 가득 차서 버려진 항목 수
    pub dropped: u64,
    /// 종료 후 거부된 항목 수
    pub rejected: u64,
    /// 소비자가 꺼내간 항목 수
    pub dequeued: u64,
}

/// 고정 용량 핸드오프 큐
///
/// 용량은 생성 시 정해지며 수명 동안 바뀌지 않습니다.
/// 여러 스레드에서 `&self`로 동시에 사용할 수 있습니다.
pub struct HandoffQueue<T> {
    /// 생산자 측 송신 핸들 (`try_send`만 사용)
    tx: mpsc::Sender<T>,
    /// 소비자 측 수신 핸들. 소비자가 여럿이면 순서대로 잠금을 얻습니다.
    rx: Mutex<mpsc::Receiver<T>>,
    /// 1회성 종료 플래그
    closed: AtomicBool,
    /// 대기 중인 소비자를 깨우는 브로드캐스트 신호
    shutdown_signal: CancellationToken,
    /// 고정 용량
    capacity: usize,
    accepted: AtomicU64,
    dropped: AtomicU64,
    rejected: AtomicU64,
    dequeued: AtomicU64,
}

impl<T: Send> HandoffQueue<T> {
    /// 새 큐를 생성합니다.
    ///
    /// 용량은 `1..=MAX_BUFFER_SIZE` 범위로 맞춥니다 (0은 1로, 상한 초과는 상한으로).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_BUFFER_SIZE);
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx,
            rx: Mutex::new(rx),
            closed: AtomicBool::new(false),
            shutdown_signal: CancellationToken::new(),
            capacity,
            accepted: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            dequeued: AtomicU64::new(0),
        }
    }

    /// 항목을 큐에 넣습니다. 절대 블로킹하거나 대기하지 않습니다.
    ///
    /// 비동기 런타임 밖의 임의 스레드에서 호출해도 됩니다.
    pub fn enqueue(&self, item: T) -> Enqueued {
        if self.closed.load(Ordering::Acquire) {
            self.rejected.fetch_add(1, Ordering::Relaxed);
            metrics::counter!(names::HANDOFF_RECORDS_REJECTED_TOTAL).increment(1);
            return Enqueued::Closed;
        }

        match self.tx.try_send(item) {
            Ok(()) => {
                self.accepted.fetch_add(1, Ordering::Relaxed);
                metrics::counter!(names::HANDOFF_RECORDS_ACCEPTED_TOTAL).increment(1);
                Enqueued::Accepted
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                metrics::counter!(names::HANDOFF_RECORDS_DROPPED_TOTAL).increment(1);
                Enqueued::Dropped
            }
            // 소비자가 종료를 관찰하고 수신 측을 닫은 뒤
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.rejected.fetch_add(1, Ordering::Relaxed);
                metrics::counter!(names::HANDOFF_RECORDS_REJECTED_TOTAL).increment(1);
                Enqueued::Closed
            }
        }
    }

    /// 다음 항목을 꺼냅니다.
    ///
    /// 다음 중 하나가 일어날 때까지 대기합니다.
    /// - 항목이 들어옴 -> [`Dequeued::Item`]
    /// - `cancel` 발동 -> [`Dequeued::Cancelled`]
    /// - 종료되었고 버퍼가 빔 -> [`Dequeued::Closed`]
    ///
    /// 취소되어도 큐 상태는 바뀌지 않습니다.
    pub async fn dequeue(&self, cancel: &CancellationToken) -> Dequeued<T> {
        let mut rx = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Dequeued::Cancelled(CancelReason::Cancelled),
            guard = self.rx.lock() => guard,
        };

        let received = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Dequeued::Cancelled(CancelReason::Cancelled),
            item = rx.recv() => Some(item),
            _ = self.shutdown_signal.cancelled() => None,
        };

        let item = match received {
            Some(item) => item,
            None => {
                // 수신 측을 닫으면 남은 항목은 그대로 받을 수 있고,
                // 빈 뒤에는 recv가 즉시 None을 반환합니다.
                rx.close();
                rx.recv().await
            }
        };

        match item {
            Some(item) => {
                self.dequeued.fetch_add(1, Ordering::Relaxed);
                metrics::counter!(names::HANDOFF_RECORDS_READ_TOTAL).increment(1);
                Dequeued::Item(item)
            }
            None => Dequeued::Closed,
        }
    }

    /// 데드라인이 있는 [`dequeue`](Self::dequeue)
    ///
    /// 데드라인이 먼저 지나면 [`CancelReason::DeadlineExceeded`]를 반환합니다.
    /// 이미 지난 데드라인이라도 준비된 항목이 있으면 항목을 반환합니다.
    pub async fn dequeue_until(&self, cancel: &CancellationToken, deadline: Instant) -> Dequeued<T> {
        match tokio::time::timeout_at(deadline, self.dequeue(cancel)).await {
            Ok(outcome) => outcome,
            Err(_) => Dequeued::Cancelled(CancelReason::DeadlineExceeded),
        }
    }

    /// 큐를 종료합니다.
    ///
    /// 여러 번, 여러 스레드에서 호출해도 실제 전이는 한 번만 일어나며
    /// 그 호출만 `true`를 반환합니다. 버퍼 비우기를 기다리지 않습니다.
    pub fn shutdown(&self) -> bool {
        let transitioned = self
            .closed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if transitioned {
            self.shutdown_signal.cancel();
        }
        transitioned
    }

    /// 종료 여부를 반환합니다.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl<T> HandoffQueue<T> {
    /// 고정 용량을 반환합니다.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 현재 버퍼에 있는 항목 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.capacity.saturating_sub(self.tx.capacity())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 누적 통계 스냅샷을 반환합니다.
    pub fn stats(&self) -> QueueStats {
        QueueStats {
            accepted: self.accepted.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            dequeued: self.dequeued.load(Ordering::Relaxed),
        }
    }
}
