#![forbid(unsafe_code)]

//! Scalar and list values held by fields and record attributes.

use std::fmt;

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time};

/// A single value stored in a field or a record attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "value", rename_all = "snake_case"))]
pub enum Value {
    /// Boolean (radio yes/no, checkbox).
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Free text or an opaque identifier.
    Text(String),
    /// Calendar date.
    Date(Date),
    /// Wall-clock time of day.
    Time(Time),
    /// Instant with offset.
    DateTime(OffsetDateTime),
    /// Ordered list, used for multi-valued attributes.
    List(Vec<Value>),
}

impl Value {
    /// Create a text value.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Short name of the variant, used in validation messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Text(_) => "text",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::DateTime(_) => "datetime",
            Self::List(_) => "list",
        }
    }

    /// Interpret the value as a boolean toggle.
    ///
    /// `Bool` maps directly, integers are truthy when non-zero, text is
    /// truthy when non-empty, lists when they have any element.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Text(s) => !s.is_empty(),
            Self::List(items) => !items.is_empty(),
            Self::Date(_) | Self::Time(_) | Self::DateTime(_) => true,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Date> for Value {
    fn from(d: Date) -> Self {
        Self::Date(d)
    }
}

impl From<Time> for Value {
    fn from(t: Time) -> Self {
        Self::Time(t)
    }
}

impl From<OffsetDateTime> for Value {
    fn from(dt: OffsetDateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Date(d) => {
                let fmt = format_description!("[year]-[month]-[day]");
                let s = d.format(&fmt).map_err(|_| fmt::Error)?;
                f.write_str(&s)
            }
            Self::Time(t) => {
                let fmt = format_description!("[hour]:[minute]");
                let s = t.format(&fmt).map_err(|_| fmt::Error)?;
                f.write_str(&s)
            }
            Self::DateTime(dt) => {
                let s = dt.format(&Rfc3339).map_err(|_| fmt::Error)?;
                f.write_str(&s)
            }
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

/// Parse `HH:MM` into a time of day.
pub fn parse_time_of_day(input: &str) -> Option<Time> {
    let fmt = format_description!("[hour]:[minute]");
    Time::parse(input.trim(), &fmt).ok()
}

/// Parse `YYYY-MM-DD` into a date.
pub fn parse_date(input: &str) -> Option<Date> {
    let fmt = format_description!("[year]-[month]-[day]");
    Date::parse(input.trim(), &fmt).ok()
}

/// Parse an RFC 3339 timestamp.
pub fn parse_date_time(input: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(input.trim(), &Rfc3339).ok()
}
