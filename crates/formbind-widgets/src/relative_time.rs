#![forbid(unsafe_code)]

//! "Last N units" relative-time input.
//!
//! The input holds the raw text of the amount and a unit. Each edit returns
//! the serialized `{last, unit}` pair together with its error state, so the
//! owner can store the value and show the error in one step.

use std::fmt;
use std::str::FromStr;

use formbind_core::validation::{
    ERROR_CODE_KIND_MISMATCH, ERROR_CODE_RANGE, ERROR_CODE_VALUE_TOO_LARGE,
};
use formbind_core::{FormError, FormResult, ValidationError};

use crate::{Editable, Widget, fit_to_width};

/// Largest span a date can move from the epoch, in milliseconds.
pub const MAX_SPAN_MS: f64 = 8.64e15;

/// Units offered by the unit dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RelativeUnit {
    Minutes,
    #[default]
    Hours,
    Days,
    Months,
    Years,
}

impl RelativeUnit {
    pub const ALL: [Self; 5] = [
        Self::Minutes,
        Self::Hours,
        Self::Days,
        Self::Months,
        Self::Years,
    ];

    /// Short unit code (`m`, `h`, `d`, `M`, `y`).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Minutes => "m",
            Self::Hours => "h",
            Self::Days => "d",
            Self::Months => "M",
            Self::Years => "y",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Minutes => "Minutes",
            Self::Hours => "Hours",
            Self::Days => "Days",
            Self::Months => "Months",
            Self::Years => "Years",
        }
    }

    /// Average length of one unit in milliseconds.
    #[must_use]
    pub fn millis(self) -> f64 {
        const MINUTE: f64 = 60_000.0;
        const DAY: f64 = 24.0 * 60.0 * MINUTE;
        match self {
            Self::Minutes => MINUTE,
            Self::Hours => 60.0 * MINUTE,
            Self::Days => DAY,
            // 400-year Gregorian cycle averages.
            Self::Months => DAY * 146_097.0 / 4_800.0,
            Self::Years => DAY * 146_097.0 / 400.0,
        }
    }
}

impl fmt::Display for RelativeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RelativeUnit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|u| u.code() == s)
            .ok_or_else(|| {
                ValidationError::new(ERROR_CODE_KIND_MISMATCH, "unknown unit {unit}")
                    .with_param("unit", s)
            })
    }
}

/// Serialized value of the input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RelativeTime {
    /// Raw amount text as typed.
    pub last: String,
    pub unit: RelativeUnit,
}

impl RelativeTime {
    pub fn new(last: impl Into<String>, unit: RelativeUnit) -> Self {
        Self {
            last: last.into(),
            unit,
        }
    }

    /// Error for this value, if any.
    ///
    /// Empty text is accepted (the field is being cleared).
    #[must_use]
    pub fn error(&self) -> Option<ValidationError> {
        let text = self.last.trim();
        if text.is_empty() {
            return None;
        }
        let amount = match text.parse::<f64>() {
            Ok(n) if n.is_finite() => n,
            _ => {
                return Some(ValidationError::new(ERROR_CODE_KIND_MISMATCH, "not a number"));
            }
        };
        if amount < 0.0 {
            return Some(ValidationError::new(ERROR_CODE_RANGE, "must not be negative"));
        }
        if amount * self.unit.millis() > MAX_SPAN_MS {
            return Some(ValidationError::new(
                ERROR_CODE_VALUE_TOO_LARGE,
                "value too large",
            ));
        }
        None
    }
}

/// What an edit produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativeTimeChange {
    pub value: RelativeTime,
    pub error: Option<ValidationError>,
}

/// Input for "last N units".
#[derive(Debug, Clone, Default)]
pub struct RelativeTimeInput {
    value: RelativeTime,
    error: Option<ValidationError>,
    editing: bool,
}

impl RelativeTimeInput {
    #[must_use]
    pub fn new(value: RelativeTime) -> Self {
        let error = value.error();
        Self {
            value,
            error,
            editing: false,
        }
    }

    #[must_use]
    pub fn value(&self) -> &RelativeTime {
        &self.value
    }

    #[must_use]
    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    /// The amount text changed.
    ///
    /// # Errors
    ///
    /// [`FormError::ReadOnly`] when not editing.
    pub fn change_last(&mut self, last: impl Into<String>) -> FormResult<RelativeTimeChange> {
        let next = RelativeTime::new(last, self.value.unit);
        self.apply(next)
    }

    /// The unit changed; the amount is re-checked against the new unit.
    ///
    /// # Errors
    ///
    /// [`FormError::ReadOnly`] when not editing.
    pub fn change_unit(&mut self, unit: RelativeUnit) -> FormResult<RelativeTimeChange> {
        let next = RelativeTime::new(self.value.last.clone(), unit);
        self.apply(next)
    }

    fn apply(&mut self, next: RelativeTime) -> FormResult<RelativeTimeChange> {
        if !self.editing {
            return Err(FormError::ReadOnly("Last".to_string()));
        }
        let error = next.error();
        self.value = next;
        self.error = error.clone();
        Ok(RelativeTimeChange {
            value: self.value.clone(),
            error,
        })
    }
}

impl Editable for RelativeTimeInput {
    fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
    }

    fn is_editing(&self) -> bool {
        self.editing
    }
}

impl Widget for RelativeTimeInput {
    fn render_line(&self, width: usize) -> String {
        let mut line = format!("Last: {} {}", self.value.last, self.value.unit.label());
        if let Some(err) = &self.error {
            line.push_str(" ⚠ ");
            line.push_str(&err.format_message());
        }
        fit_to_width(&line, width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editing(value: RelativeTime) -> RelativeTimeInput {
        let mut input = RelativeTimeInput::new(value);
        input.turn_on_editing();
        input
    }

    #[test]
    fn small_values_are_valid() {
        let mut input = editing(RelativeTime::new("1", RelativeUnit::Days));
        let change = input.change_last("30").unwrap();
        assert_eq!(change.value, RelativeTime::new("30", RelativeUnit::Days));
        assert_eq!(change.error, None);
    }

    #[test]
    fn too_large_for_unit() {
        let mut input = editing(RelativeTime::new("1", RelativeUnit::Minutes));
        // 300,000 fits as minutes but not as years.
        let minutes = input.change_last("300000").unwrap();
        assert!(minutes.error.is_none());
        let years = input.change_unit(RelativeUnit::Years).unwrap();
        let err = years.error.unwrap();
        assert_eq!(err.code, ERROR_CODE_VALUE_TOO_LARGE);
        assert_eq!(err.format_message(), "value too large");
        assert_eq!(input.value().unit, RelativeUnit::Years);
    }

    #[test]
    fn garbage_and_negative() {
        assert_eq!(
            RelativeTime::new("abc", RelativeUnit::Hours).error().map(|e| e.code),
            Some(ERROR_CODE_KIND_MISMATCH)
        );
        assert_eq!(
            RelativeTime::new("-2", RelativeUnit::Hours).error().map(|e| e.code),
            Some(ERROR_CODE_RANGE)
        );
        assert_eq!(
            RelativeTime::new("inf", RelativeUnit::Hours).error().map(|e| e.code),
            Some(ERROR_CODE_KIND_MISMATCH)
        );
        assert!(RelativeTime::new("", RelativeUnit::Hours).error().is_none());
    }

    #[test]
    fn read_only_rejects_changes() {
        let mut input = RelativeTimeInput::new(RelativeTime::default());
        assert!(input.change_last("5").is_err());
        assert_eq!(input.value().last, "");
    }

    #[test]
    fn unit_codes_round_trip() {
        for unit in RelativeUnit::ALL {
            assert_eq!(unit.code().parse::<RelativeUnit>(), Ok(unit));
        }
        assert!("w".parse::<RelativeUnit>().is_err());
    }

    #[test]
    fn render_with_error() {
        let input = RelativeTimeInput::new(RelativeTime::new("1e20", RelativeUnit::Days));
        assert_eq!(input.render_line(80), "Last: 1e20 Days ⚠ value too large");
    }
}
