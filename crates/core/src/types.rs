//! 도메인 타입 -- 두 레코드 표현
//!
//! - 소스 측 ([`SourceRecord`], [`Attr`], [`AttrValue`], [`SourceLevel`]):
//!   핸들러 인터페이스로 들어오는 구조화 로그 레코드
//! - 목적지 측 ([`Record`], [`Field`], [`FieldValue`], [`Level`]):
//!   풀(pull) 기반 리더 인터페이스로 나가는 파이프라인 레코드
//!
//! 두 표현 사이의 변환은 `logbridge-handoff`의 `convert` 모듈이 담당합니다.

use std::fmt;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// 목적지 레코드가 기본으로 보존하는 최대 필드 수
pub const DEFAULT_MAX_FIELDS: usize = 32;

fn format_time(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

// --- 소스 측 ---

/// 소스 측 로그 레벨
///
/// 정수 기반이며 이름 있는 레벨 사이의 사용자 정의 레벨을 허용합니다.
/// 값이 클수록 심각합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SourceLevel(pub i32);

impl SourceLevel {
    /// 디버그 레벨 (-4)
    pub const DEBUG: Self = Self(-4);
    /// 정보 레벨 (0)
    pub const INFO: Self = Self(0);
    /// 경고 레벨 (4)
    pub const WARN: Self = Self(4);
    /// 에러 레벨 (8)
    pub const ERROR: Self = Self(8);

    /// 정수 값을 반환합니다.
    pub fn as_i32(self) -> i32 {
        self.0
    }
}

impl fmt::Display for SourceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (base, named) = if *self < Self::INFO {
            ("DEBUG", Self::DEBUG)
        } else if *self < Self::WARN {
            ("INFO", Self::INFO)
        } else if *self < Self::ERROR {
            ("WARN", Self::WARN)
        } else {
            ("ERROR", Self::ERROR)
        };
        let offset = self.0 - named.0;
        if offset == 0 {
            write!(f, "{base}")
        } else {
            write!(f, "{base}{offset:+}")
        }
    }
}

/// 소스 측 속성 값
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    String(String),
    Int64(i64),
    Uint64(u64),
    Float64(f64),
    Bool(bool),
    Duration(Duration),
    Time(SystemTime),
    /// 중첩 속성 그룹
    Group(Vec<Attr>),
    /// 위 종류에 속하지 않는 값의 문자열 표현
    Any(String),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) | Self::Any(s) => write!(f, "{s}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Uint64(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Duration(d) => write!(f, "{d:?}"),
            Self::Time(t) => write!(f, "{}", format_time(*t)),
            Self::Group(attrs) => {
                write!(f, "[")?;
                for (i, attr) in attrs.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{attr}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// 소스 측 키-값 속성
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: AttrValue,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: AttrValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, AttrValue::String(value.into()))
    }

    pub fn int64(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, AttrValue::Int64(value))
    }

    pub fn uint64(key: impl Into<String>, value: u64) -> Self {
        Self::new(key, AttrValue::Uint64(value))
    }

    pub fn float64(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, AttrValue::Float64(value))
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, AttrValue::Bool(value))
    }

    pub fn duration(key: impl Into<String>, value: Duration) -> Self {
        Self::new(key, AttrValue::Duration(value))
    }

    pub fn time(key: impl Into<String>, value: SystemTime) -> Self {
        Self::new(key, AttrValue::Time(value))
    }

    pub fn group(key: impl Into<String>, attrs: Vec<Attr>) -> Self {
        Self::new(key, AttrValue::Group(attrs))
    }

    /// `Debug` 표현을 값으로 하는 속성을 생성합니다.
    pub fn any(key: impl Into<String>, value: &dyn fmt::Debug) -> Self {
        Self::new(key, AttrValue::Any(format!("{value:?}")))
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// 소스 측 로그 레코드
///
/// 핸들러에 전달된 뒤에는 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    /// 기록 시각
    pub time: SystemTime,
    /// 로그 레벨
    pub level: SourceLevel,
    /// 로그 메시지
    pub message: String,
    attrs: Vec<Attr>,
}

impl SourceRecord {
    /// 속성이 없는 새 레코드를 생성합니다.
    pub fn new(time: SystemTime, level: SourceLevel, message: impl Into<String>) -> Self {
        Self {
            time,
            level,
            message: message.into(),
            attrs: Vec::new(),
        }
    }

    /// 속성을 하나 추가합니다.
    pub fn add_attr(&mut self, attr: Attr) {
        self.attrs.push(attr);
    }

    /// 속성 여러 개를 순서대로 추가합니다.
    pub fn add_attrs(&mut self, attrs: impl IntoIterator<Item = Attr>) {
        self.attrs.extend(attrs);
    }

    /// 빌더 스타일로 속성을 추가합니다.
    pub fn with_attr(mut self, attr: Attr) -> Self {
        self.attrs.push(attr);
        self
    }

    /// 속성을 추가된 순서대로 반환합니다.
    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    pub fn num_attrs(&self) -> usize {
        self.attrs.len()
    }

    /// 레코드를 분해하여 속성 목록의 소유권을 넘깁니다.
    pub fn into_attrs(self) -> Vec<Attr> {
        self.attrs
    }
}

// --- 목적지 측 ---

/// 파이프라인 로그 레벨
///
/// `Ord` 구현으로 레벨 비교가 가능합니다 (`Debug < Info < Warn < Error`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl Level {
    /// 문자열에서 레벨을 파싱합니다. 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 파이프라인 필드 값 (타입 보존)
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Int64(i64),
    Uint64(u64),
    Float64(f64),
    Bool(bool),
    Duration(Duration),
    Time(SystemTime),
}

impl FieldValue {
    /// JSON 값으로 변환합니다.
    ///
    /// 기간은 사람이 읽을 수 있는 문자열(`45ms`), 시각은 RFC 3339로 표현합니다.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Str(s) => serde_json::Value::from(s.as_str()),
            Self::Int64(v) => serde_json::Value::from(*v),
            Self::Uint64(v) => serde_json::Value::from(*v),
            Self::Float64(v) => serde_json::Value::from(*v),
            Self::Bool(v) => serde_json::Value::from(*v),
            Self::Duration(d) => serde_json::Value::from(format!("{d:?}")),
            Self::Time(t) => serde_json::Value::from(format_time(*t)),
        }
    }
}

/// 파이프라인 필드
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: FieldValue,
}

impl Field {
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Str(value.into()),
        }
    }

    pub fn int64(key: impl Into<String>, value: i64) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Int64(value),
        }
    }

    pub fn uint64(key: impl Into<String>, value: u64) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Uint64(value),
        }
    }

    pub fn float64(key: impl Into<String>, value: f64) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Float64(value),
        }
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Bool(value),
        }
    }

    pub fn dur(key: impl Into<String>, value: Duration) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Duration(value),
        }
    }

    pub fn time(key: impl Into<String>, value: SystemTime) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Time(value),
        }
    }
}

/// 파이프라인 레코드
///
/// 필드 수는 생성 시 지정한 한도(`max_fields`)를 넘지 않습니다.
/// 한도는 하류 파이프라인이 정하는 값이며 기본값은 [`DEFAULT_MAX_FIELDS`]입니다.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// 기록 시각
    pub time: SystemTime,
    /// 로그 레벨
    pub level: Level,
    /// 로그 메시지
    pub message: String,
    fields: Vec<Field>,
    max_fields: usize,
}

impl Record {
    /// 기본 필드 한도로 새 레코드를 생성합니다. 시각은 현재 시각입니다.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self::with_field_limit(level, message, DEFAULT_MAX_FIELDS)
    }

    /// 지정한 필드 한도로 새 레코드를 생성합니다.
    pub fn with_field_limit(level: Level, message: impl Into<String>, max_fields: usize) -> Self {
        Self {
            time: SystemTime::now(),
            level,
            message: message.into(),
            fields: Vec::with_capacity(max_fields.min(DEFAULT_MAX_FIELDS)),
            max_fields,
        }
    }

    /// 기록 시각을 지정합니다.
    pub fn at(mut self, time: SystemTime) -> Self {
        self.time = time;
        self
    }

    /// 필드를 추가합니다.
    ///
    /// 한도에 도달했으면 필드를 버리고 `false`를 반환합니다.
    pub fn add_field(&mut self, field: Field) -> bool {
        if self.fields.len() >= self.max_fields {
            return false;
        }
        self.fields.push(field);
        true
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// 키로 필드 값을 찾습니다. 같은 키가 여러 개면 첫 번째를 반환합니다.
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.key == key).map(|f| &f.value)
    }

    pub fn max_fields(&self) -> usize {
        self.max_fields
    }

    /// 한 줄 JSON 출력용 객체로 변환합니다.
    ///
    /// 키 순서: `ts`, `level`, `msg`, 그다음 필드 순서 그대로.
    /// 헤더와 이름이 같은 필드는 `fields.<key>`로, 이미 나온 키는
    /// `<key>#2`, `<key>#3` ...으로 바꿔 적습니다. 어떤 필드도 덮어쓰이지 않습니다.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::with_capacity(self.fields.len() + 3);
        map.insert("ts".to_owned(), format_time(self.time).into());
        map.insert("level".to_owned(), self.level.as_str().into());
        map.insert("msg".to_owned(), self.message.as_str().into());
        for field in &self.fields {
            let key = unique_key(&map, &field.key);
            map.insert(key, field.value.to_json());
        }
        serde_json::Value::Object(map)
    }
}

/// JSON 헤더 키
const HEADER_KEYS: [&str; 3] = ["ts", "level", "msg"];

fn unique_key(map: &serde_json::Map<String, serde_json::Value>, key: &str) -> String {
    let base = if HEADER_KEYS.contains(&key) {
        format!("fields.{key}")
    } else {
        key.to_owned()
    };
    if !map.contains_key(&base) {
        return base;
    }
    (2..)
        .map(|n| format!("{base}#{n}"))
        .find(|candidate| !map.contains_key(candidate))
        .unwrap_or(base)
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)?;
        for field in &self.fields {
            write!(f, " {}={:?}", field.key, field.value)?;
        }
        Ok(())
    }
}
