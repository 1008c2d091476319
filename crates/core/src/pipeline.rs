//! 경계 trait -- 상류 핸들러와 하류 리더 인터페이스
//!
//! 어댑터는 두 trait을 동시에 구현합니다.
//!
//! ```text
//! log call sites --Handler::handle--> [adapter] --RecordReader::read--> pipeline
//! ```

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::BridgeError;
use crate::types::{Attr, Record, SourceLevel, SourceRecord};

/// 상류(로그 호출 지점) 측 핸들러 인터페이스
///
/// 속성/그룹 체이닝은 항등 연산입니다. 속성 보강은 레코드가
/// `handle`에 도착하기 전에 상류에서 끝납니다.
pub trait Handler: Send + Sync {
    /// 해당 레벨의 레코드를 처리할지 여부
    fn enabled(&self, level: SourceLevel) -> bool;

    /// 레코드를 받아들입니다. 호출자를 절대 블로킹하지 않아야 합니다.
    fn handle(&self, record: SourceRecord) -> Result<(), BridgeError>;

    /// 속성이 추가된 핸들러를 반환합니다 (기본 구현: 같은 인스턴스)
    fn with_attrs(&self, _attrs: &[Attr]) -> &Self
    where
        Self: Sized,
    {
        self
    }

    /// 이름 있는 그룹이 열린 핸들러를 반환합니다 (기본 구현: 같은 인스턴스)
    fn with_group(&self, _name: &str) -> &Self
    where
        Self: Sized,
    {
        self
    }
}

/// 하류(파이프라인) 측 풀 기반 리더 인터페이스
pub trait RecordReader: Send + Sync {
    /// 다음 레코드를 읽습니다.
    ///
    /// - `Ok(Some(record))`: 레코드
    /// - `Ok(None)`: 스트림 종료 (닫혔고 버퍼가 비었음)
    /// - `Err(..)`: 취소 토큰 발동 (`HandoffError::Cancelled`)
    fn read(
        &self,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Option<Record>, BridgeError>> + Send;

    /// 리더를 닫습니다. 여러 번 호출해도 안전합니다.
    fn close(&self) -> Result<(), BridgeError>;
}
