//! 레코드 변환 -- 소스 레코드를 파이프라인 레코드로 매핑합니다.
//!
//! 상태가 없고, 한 번의 순회로 끝나며, 실패하지 않습니다.
//!
//! # 레벨 매핑
//! | 소스 레벨 | 파이프라인 레벨 |
//! |---|---|
//! | `<= DEBUG(-4)` | `Debug` |
//! | `<= INFO(0)` | `Info` |
//! | `<= WARN(4)` | `Warn` |
//! | 그 외 | `Error` |
//!
//! # 속성 매핑
//! 타입을 보존합니다 (문자열, 정수, 부호 없는 정수, 실수, 불리언, 기간, 시각).
//! 그룹과 그 밖의 값은 문자열 표현으로 대체됩니다.
//! 필드 한도를 넘는 속성은 조용히 잘립니다.

use logbridge_core::metrics as names;
use logbridge_core::types::{Attr, AttrValue, Field, Level, Record, SourceLevel, SourceRecord};

/// 소스 레벨을 가장 가까운 파이프라인 레벨로 매핑합니다.
pub fn convert_level(level: SourceLevel) -> Level {
    if level <= SourceLevel::DEBUG {
        Level::Debug
    } else if level <= SourceLevel::INFO {
        Level::Info
    } else if level <= SourceLevel::WARN {
        Level::Warn
    } else {
        Level::Error
    }
}

/// 속성 하나를 타입을 보존하여 필드로 변환합니다.
pub fn convert_attr(attr: Attr) -> Field {
    let Attr { key, value } = attr;
    match value {
        AttrValue::String(s) => Field::string(key, s),
        AttrValue::Int64(v) => Field::int64(key, v),
        AttrValue::Uint64(v) => Field::uint64(key, v),
        AttrValue::Float64(v) => Field::float64(key, v),
        AttrValue::Bool(v) => Field::bool(key, v),
        AttrValue::Duration(d) => Field::dur(key, d),
        AttrValue::Time(t) => Field::time(key, t),
        AttrValue::Any(s) => Field::string(key, s),
        other @ AttrValue::Group(_) => Field::string(key, other.to_string()),
    }
}

/// 소스 레코드 전체를 변환합니다.
///
/// 메시지, 시각, 레벨, 속성 순서를 보존하며 `max_fields`를 넘는 속성은 버립니다.
pub fn convert_record(mut record: SourceRecord, max_fields: usize) -> Record {
    let message = std::mem::take(&mut record.message);
    let mut out = Record::with_field_limit(convert_level(record.level), message, max_fields)
        .at(record.time);

    let mut attrs = record.into_attrs().into_iter();
    while let Some(attr) = attrs.next() {
        if !out.add_field(convert_attr(attr)) {
            let truncated = 1 + attrs.len() as u64;
            metrics::counter!(names::HANDOFF_FIELDS_TRUNCATED_TOTAL).increment(truncated);
            break;
        }
    }

    out
}
