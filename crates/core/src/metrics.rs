//! 메트릭 상수
//!
//! 모든 메트릭의 이름을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! 익스포터 설치는 호스트 애플리케이션의 몫입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `logbridge_`
//! - 모듈명: `handoff_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(logbridge_core::metrics::HANDOFF_RECORDS_ACCEPTED_TOTAL).increment(1);
//! ```

// ─── Handoff 메트릭 ────────────────────────────────────────────────

/// Handoff: 큐에 들어간 레코드 수 (counter)
pub const HANDOFF_RECORDS_ACCEPTED_TOTAL: &str = "logbridge_handoff_records_accepted_total";

/// Handoff: 버퍼가 가득 차서 버려진 레코드 수 (counter)
pub const HANDOFF_RECORDS_DROPPED_TOTAL: &str = "logbridge_handoff_records_dropped_total";

/// Handoff: 종료 후 거부된 레코드 수 (counter)
pub const HANDOFF_RECORDS_REJECTED_TOTAL: &str = "logbridge_handoff_records_rejected_total";

/// Handoff: 리더가 가져간 레코드 수 (counter)
pub const HANDOFF_RECORDS_READ_TOTAL: &str = "logbridge_handoff_records_read_total";

/// Handoff: 필드 한도 초과로 잘린 속성 수 (counter)
pub const HANDOFF_FIELDS_TRUNCATED_TOTAL: &str = "logbridge_handoff_fields_truncated_total";
