// Copyright 2025 Infix Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Value type for infix - runtime values with type information
//!
//! Every expression result is a [`Value`]. Numbers are always IEEE-754
//! doubles; integers are not a separate kind. Bitwise operators truncate to
//! 64-bit integers during the operation and re-widen the result.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use regex::Regex;

/// Timestamp formats accepted for quoted string literals
///
/// Tried in order; first match wins. Mirrors the classic reference set:
/// ANSI C, UNIX `date`, Ruby date, kitchen, RFC 3339 (plus nano), and the
/// ISO-8601 compact-offset variants.
const TIMESTAMP_FORMATS: &[TimestampFormat] = &[
    TimestampFormat::Naive("%a %b %e %H:%M:%S %Y"), // ANSI C
    TimestampFormat::Naive("%a %b %e %H:%M:%S UTC %Y"), // UNIX date (UTC zone)
    TimestampFormat::Naive("%a %b %e %H:%M:%S GMT %Y"), // UNIX date (GMT zone)
    TimestampFormat::Offset("%a %b %d %H:%M:%S %z %Y"), // Ruby date
    TimestampFormat::Kitchen("%I:%M%p"),            // kitchen clock
    TimestampFormat::Rfc3339,                       // RFC 3339, incl. nanoseconds
    TimestampFormat::DateOnly("%Y-%m-%d"),          // RFC 3339, date only
    TimestampFormat::Naive("%Y-%m-%d %H:%M"),       // RFC 3339 with minutes
    TimestampFormat::Naive("%Y-%m-%d %H:%M:%S"),    // RFC 3339 with seconds
    TimestampFormat::Offset("%Y-%m-%d %H:%M:%S%:z"), // RFC 3339 with seconds and offset
    TimestampFormat::Offset("%Y-%m-%dT%H:%M%z"),    // ISO 8601 with minutes
    TimestampFormat::Offset("%Y-%m-%dT%H:%M:%S%z"), // ISO 8601 with seconds
    TimestampFormat::Offset("%Y-%m-%dT%H:%M:%S%.f%z"), // ISO 8601 with nanoseconds
];

/// How a single timestamp format string is applied
enum TimestampFormat {
    /// Full datetime without zone; interpreted as UTC
    Naive(&'static str),
    /// Full datetime with explicit offset
    Offset(&'static str),
    /// Date without time of day
    DateOnly(&'static str),
    /// Time of day without date; pinned to the zero date
    Kitchen(&'static str),
    /// RFC 3339 via the dedicated chrono parser
    Rfc3339,
}

/// Attempt to parse a string under the accepted timestamp formats
///
/// Returns `None` when no format matches, in which case the caller keeps
/// the string as text.
pub fn parse_timestamp(candidate: &str) -> Option<DateTime<Utc>> {
    for format in TIMESTAMP_FORMATS {
        let parsed = match format {
            TimestampFormat::Naive(fmt) => {
                chrono::NaiveDateTime::parse_from_str(candidate, fmt)
                    .ok()
                    .map(|dt| Utc.from_utc_datetime(&dt))
            }
            TimestampFormat::Offset(fmt) => DateTime::parse_from_str(candidate, fmt)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            TimestampFormat::DateOnly(fmt) => NaiveDate::parse_from_str(candidate, fmt)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| Utc.from_utc_datetime(&dt)),
            TimestampFormat::Kitchen(fmt) => NaiveTime::parse_from_str(candidate, fmt)
                .ok()
                .and_then(|t| NaiveDate::from_ymd_opt(0, 1, 1).map(|d| d.and_time(t)))
                .map(|dt| Utc.from_utc_datetime(&dt)),
            TimestampFormat::Rfc3339 => DateTime::parse_from_rfc3339(candidate)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        };
        if parsed.is_some() {
            return parsed;
        }
    }
    None
}

/// A runtime value
///
/// Note: Text uses `Arc<str>` and Pattern uses `Arc<Regex>` for cheap
/// cloning; values are cloned freely while walking the evaluation tree.
#[derive(Debug, Clone)]
pub enum Value {
    /// Absence of a value; also the result of a false ternary condition
    Null,

    /// IEEE-754 double, the only numeric kind
    Number(f64),

    /// Boolean value
    Bool(bool),

    /// UTF-8 text
    Text(Arc<str>),

    /// Instant in time (UTC)
    Timestamp(DateTime<Utc>),

    /// Compiled regular expression
    Pattern(Arc<Regex>),

    /// Ordered, heterogeneous sequence
    Array(Vec<Value>),
}

/// The kind of a [`Value`], without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Number,
    Bool,
    Text,
    Timestamp,
    Pattern,
    Array,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Null => write!(f, "null"),
            ValueKind::Number => write!(f, "number"),
            ValueKind::Bool => write!(f, "bool"),
            ValueKind::Text => write!(f, "string"),
            ValueKind::Timestamp => write!(f, "timestamp"),
            ValueKind::Pattern => write!(f, "pattern"),
            ValueKind::Array => write!(f, "array"),
        }
    }
}

impl Value {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a number value
    pub fn number(value: f64) -> Self {
        Value::Number(value)
    }

    /// Create a boolean value
    pub fn boolean(value: bool) -> Self {
        Value::Bool(value)
    }

    /// Create a text value
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(Arc::from(value.into().as_str()))
    }

    /// Create a timestamp value
    pub fn timestamp(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }

    /// Create a compiled-pattern value
    pub fn pattern(value: Regex) -> Self {
        Value::Pattern(Arc::new(value))
    }

    /// Create an array value
    pub fn array(values: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(values.into_iter().collect())
    }

    // =========================================================================
    // Kind and extractors
    // =========================================================================

    /// Returns the kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Number(_) => ValueKind::Number,
            Value::Bool(_) => ValueKind::Bool,
            Value::Text(_) => ValueKind::Text,
            Value::Timestamp(_) => ValueKind::Timestamp,
            Value::Pattern(_) => ValueKind::Pattern,
            Value::Array(_) => ValueKind::Array,
        }
    }

    /// Returns true if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Extract as f64, without coercion
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract as bool, without coercion
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract as &str, without coercion
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Extract as a timestamp
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Extract as a compiled pattern
    pub fn as_pattern(&self) -> Option<&Regex> {
        match self {
            Value::Pattern(p) => Some(p),
            _ => None,
        }
    }

    /// Extract as an array slice
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }
}

/// Structural deep equality across the value domain
///
/// Numbers compare by `f64` equality, arrays element-wise, patterns by
/// source string, timestamps by instant.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Pattern(a), Value::Pattern(b)) => a.as_str() == b.as_str(),
            (Value::Array(a), Value::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(s) => write!(f, "{}", s),
            Value::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
            Value::Pattern(p) => write!(f, "{}", p.as_str()),
            Value::Array(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
        }
    }
}

// =============================================================================
// Coercion: every numeric width widens to f64 on the way in, so parameter
// resolution can only ever produce Number where the source held a number.
// =============================================================================

macro_rules! impl_from_numeric {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Number(value as f64)
                }
            }
        )*
    };
}

impl_from_numeric!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(Arc::from(value.as_str()))
    }
}

impl From<Arc<str>> for Value {
    fn from(value: Arc<str>) -> Self {
        Value::Text(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}

impl From<Regex> for Value {
    fn from(value: Regex) -> Self {
        Value::Pattern(Arc::new(value))
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Array(values)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}
