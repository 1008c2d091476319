#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`queue`]: 고정 용량 핸드오프 큐 (비블로킹 적재, 취소 가능한 꺼내기, 멱등 종료)
//! - [`convert`]: 소스 레코드 -> 파이프라인 레코드 변환 (레벨, 속성, 필드 한도)
//! - [`provider`]: `Handler` + `RecordReader` 이중 인터페이스 어댑터
//! - [`layer`]: `tracing` 이벤트를 프로바이더로 보내는 subscriber 레이어
//! - [`config`]: 프로바이더 설정 (core 설정 확장)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! tracing / Handler::handle -> HandoffQueue -> RecordReader::read -> convert -> pipeline
//!        (many threads)        (bounded FIFO)     (one reader)       (on read)
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod layer;
pub mod provider;
pub mod queue;

// --- 주요 타입 re-export ---

// 프로바이더
pub use provider::Provider;

// tracing 레이어
pub use layer::ProviderLayer;

// 큐
pub use queue::{Dequeued, Enqueued, HandoffQueue, QueueStats};

// 변환
pub use convert::{convert_attr, convert_level, convert_record};

// 설정
pub use config::{ProviderConfig, ProviderConfigBuilder};

// 에러
pub use error::ProviderError;

// 경계 trait
pub use logbridge_core::pipeline::{Handler, RecordReader};
