#![forbid(unsafe_code)]

//! Validation types and the built-in field validators.
//!
//! A field is checked by running a small fixed set of validators over its
//! value sequence: [`KindMatches`], [`Cardinality`], [`Required`] when the
//! field is flagged required, and, for enumerated kinds with a resolved
//! choice list, [`OneOfChoices`]. Each reports at most
//! one [`ValidationError`]; [`All`] collects every failure so a widget can
//! show all of them at once.
//!
//! ```
//! use formbind_core::validation::{KindMatches, Validator};
//! use formbind_core::{FieldKind, Value};
//!
//! let check = KindMatches::new(FieldKind::Integer);
//! assert!(check.validate(&[Value::Int(3)]).is_valid());
//! assert!(!check.validate(&[Value::text("3")]).is_valid());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::field::{Choice, FieldKind};
use crate::value::Value;

// ---------------------------------------------------------------------------
// Error Codes
// ---------------------------------------------------------------------------

/// An element's type does not match the field kind.
pub const ERROR_CODE_KIND_MISMATCH: &str = "kind_mismatch";
/// An element is not one of the enumerated choices.
pub const ERROR_CODE_NOT_A_CHOICE: &str = "not_a_choice";
/// Wrong number of elements for the field kind.
pub const ERROR_CODE_CARDINALITY: &str = "cardinality";
/// Integer outside declared bounds.
pub const ERROR_CODE_RANGE: &str = "range";
/// Required value missing.
pub const ERROR_CODE_REQUIRED: &str = "required";
/// Numeric input too large to represent.
pub const ERROR_CODE_VALUE_TOO_LARGE: &str = "value_too_large";

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// A validation failure with a stable code, a message template, and
/// interpolation parameters.
///
/// ```
/// use formbind_core::ValidationError;
///
/// let err = ValidationError::new("not_a_choice", "{value} is not an option")
///     .with_param("value", 61);
/// assert_eq!(err.format_message(), "61 is not an option");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Stable error code.
    pub code: &'static str,
    /// Message template with `{key}` placeholders.
    pub message: String,
    /// Parameters substituted into `message`.
    pub params: BTreeMap<String, String>,
}

impl ValidationError {
    #[must_use]
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter for message interpolation.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// Render the message with every `{key}` replaced by its parameter.
    #[must_use]
    pub fn format_message(&self) -> String {
        let mut result = self.message.clone();
        for (key, value) in &self.params {
            result = result.replace(&format!("{{{key}}}"), value);
        }
        result
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_message())
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// ValidationResult
// ---------------------------------------------------------------------------

/// Outcome of running one validator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValidationResult {
    #[default]
    Valid,
    Invalid(ValidationError),
}

impl ValidationResult {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    #[must_use]
    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            Self::Valid => None,
            Self::Invalid(e) => Some(e),
        }
    }

    #[must_use]
    pub fn into_error(self) -> Option<ValidationError> {
        match self {
            Self::Valid => None,
            Self::Invalid(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

/// Validates values of type `T`.
pub trait Validator<T: ?Sized> {
    /// Validate the given value.
    fn validate(&self, value: &T) -> ValidationResult;
}

/// Checks that every element has the type the field kind expects.
#[derive(Debug, Clone, Copy)]
pub struct KindMatches {
    kind: FieldKind,
}

impl KindMatches {
    #[must_use]
    pub const fn new(kind: FieldKind) -> Self {
        Self { kind }
    }
}

impl Validator<[Value]> for KindMatches {
    fn validate(&self, values: &[Value]) -> ValidationResult {
        match values.iter().find(|v| !self.kind.accepts(v)) {
            None => ValidationResult::Valid,
            Some(bad) => ValidationResult::Invalid(
                ValidationError::new(
                    ERROR_CODE_KIND_MISMATCH,
                    "Expected a {expected} value, got {actual}",
                )
                .with_param("expected", self.kind.name())
                .with_param("actual", bad.type_name()),
            ),
        }
    }
}

/// Single-valued kinds hold exactly one element; multi-valued kinds any number.
#[derive(Debug, Clone, Copy)]
pub struct Cardinality {
    kind: FieldKind,
}

impl Cardinality {
    #[must_use]
    pub const fn new(kind: FieldKind) -> Self {
        Self { kind }
    }
}

impl Validator<[Value]> for Cardinality {
    fn validate(&self, values: &[Value]) -> ValidationResult {
        if self.kind.is_multi() || values.len() == 1 {
            return ValidationResult::Valid;
        }
        ValidationResult::Invalid(
            ValidationError::new(ERROR_CODE_CARDINALITY, "Expected one value, got {count}")
                .with_param("count", values.len()),
        )
    }
}

/// Every element must appear among the choices.
#[derive(Debug, Clone, Copy)]
pub struct OneOfChoices<'a> {
    choices: &'a [Choice],
}

impl<'a> OneOfChoices<'a> {
    #[must_use]
    pub const fn new(choices: &'a [Choice]) -> Self {
        Self { choices }
    }
}

impl Validator<[Value]> for OneOfChoices<'_> {
    fn validate(&self, values: &[Value]) -> ValidationResult {
        let missing = values
            .iter()
            .find(|v| !self.choices.iter().any(|c| &c.value == *v));
        match missing {
            None => ValidationResult::Valid,
            Some(v) => ValidationResult::Invalid(
                ValidationError::new(ERROR_CODE_NOT_A_CHOICE, "{value} is not one of the options")
                    .with_param("value", v),
            ),
        }
    }
}

/// The value must hold at least one non-blank element.
///
/// Blank text and empty lists count as missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

impl Validator<[Value]> for Required {
    fn validate(&self, values: &[Value]) -> ValidationResult {
        let blank = |v: &Value| match v {
            Value::Text(s) => s.trim().is_empty(),
            Value::List(items) => items.is_empty(),
            _ => false,
        };
        if values.iter().all(blank) {
            ValidationResult::Invalid(ValidationError::new(ERROR_CODE_REQUIRED, "A value is required"))
        } else {
            ValidationResult::Valid
        }
    }
}

/// Runs every validator and collects each failure in order.
pub struct All<'a, T: ?Sized> {
    validators: Vec<Box<dyn Validator<T> + 'a>>,
}

impl<'a, T: ?Sized> All<'a, T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    /// Append a validator.
    #[must_use]
    pub fn with(mut self, validator: impl Validator<T> + 'a) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Every error, in validator order.
    pub fn errors(&self, value: &T) -> Vec<ValidationError> {
        self.validators
            .iter()
            .filter_map(|v| v.validate(value).into_error())
            .collect()
    }
}

impl<T: ?Sized> Default for All<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Validator<T> for All<'_, T> {
    fn validate(&self, value: &T) -> ValidationResult {
        self.validators
            .iter()
            .map(|v| v.validate(value))
            .find(|r| !r.is_valid())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours() -> Vec<Choice> {
        (0..24).map(|h| Choice::new(format!("{h:02}"), h as i64)).collect()
    }

    #[test]
    fn format_message_substitutes_params() {
        let err = ValidationError::new("range", "between {min} and {max}")
            .with_param("min", 0)
            .with_param("max", 59);
        assert_eq!(err.format_message(), "between 0 and 59");
        assert_eq!(err.to_string(), "between 0 and 59");
    }

    #[test]
    fn kind_matches_rejects_wrong_type() {
        let check = KindMatches::new(FieldKind::BooleanRadio);
        assert!(check.validate(&[Value::Bool(false)]).is_valid());
        let result = check.validate(&[Value::Int(0)]);
        assert_eq!(result.error().map(|e| e.code), Some(ERROR_CODE_KIND_MISMATCH));
    }

    #[test]
    fn cardinality_single_vs_multi() {
        let single = Cardinality::new(FieldKind::EnumSingle);
        assert!(single.validate(&[Value::Int(1)]).is_valid());
        assert!(!single.validate(&[]).is_valid());
        assert!(!single.validate(&[Value::Int(1), Value::Int(2)]).is_valid());

        let multi = Cardinality::new(FieldKind::EnumMulti);
        assert!(multi.validate(&[]).is_valid());
        assert!(multi.validate(&[Value::Int(1), Value::Int(2)]).is_valid());
    }

    #[test]
    fn one_of_choices() {
        let choices = hours();
        let check = OneOfChoices::new(&choices);
        assert!(check.validate(&[Value::Int(23)]).is_valid());
        let err = check.validate(&[Value::Int(24)]).into_error().unwrap();
        assert_eq!(err.code, ERROR_CODE_NOT_A_CHOICE);
        assert_eq!(err.format_message(), "24 is not one of the options");
    }

    #[test]
    fn all_collects_every_failure() {
        let choices = hours();
        let all = All::new()
            .with(KindMatches::new(FieldKind::EnumSingle))
            .with(Cardinality::new(FieldKind::EnumSingle))
            .with(OneOfChoices::new(&choices));
        let errors = all.errors(&[Value::Int(30), Value::Int(40)]);
        let codes: Vec<_> = errors.iter().map(|e| e.code).collect();
        assert_eq!(codes, vec![ERROR_CODE_CARDINALITY, ERROR_CODE_NOT_A_CHOICE]);
        assert!(!all.validate(&[Value::Int(30)]).is_valid());
        assert!(all.validate(&[Value::Int(3)]).is_valid());
    }

    #[test]
    fn required_rejects_blank() {
        assert_eq!(Required.validate(&[]).error().map(|e| e.code), Some(ERROR_CODE_REQUIRED));
        assert!(!Required.validate(&[Value::text("  ")]).is_valid());
        assert!(!Required.validate(&[Value::List(Vec::new())]).is_valid());
        assert!(Required.validate(&[Value::Bool(false)]).is_valid());
        assert!(Required.validate(&[Value::text(""), Value::text("email-1")]).is_valid());
    }
}
