#![forbid(unsafe_code)]

//! Field models: one named value slot with its kind, choices, and flags.
//!
//! A [`FieldModel`] owns the current value sequence of a single form control.
//! Every write goes through [`FieldModel::set_value`], which normalizes
//! integers against their [`IntBounds`] and then validates:
//!
//! - If the field shows validation issues ([`FieldFlags::SHOW_VALIDATION_ISSUES`]),
//!   an invalid value is stored and [`FieldModel::is_valid`] turns `false`.
//! - Otherwise the write is rejected with [`FormError::Validation`] and the
//!   previous value is kept.
//!
//! Enumerated fields whose choices are still [`Choices::Pending`] skip the
//! membership check until [`FieldModel::set_choices`] installs the list.

use bitflags::bitflags;

use crate::error::{FormError, FormResult};
use crate::validation::{All, Cardinality, KindMatches, OneOfChoices, Required, ValidationError};
use crate::value::Value;

/// The kind of control a field renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FieldKind {
    /// Two labelled radio buttons over a boolean.
    BooleanRadio,
    Integer,
    /// One value picked from a choice list.
    EnumSingle,
    /// Zero or more values picked from a choice list.
    EnumMulti,
    Date,
    /// Time of day.
    Time,
    /// Instant with offset.
    DateTime,
    Text,
}

impl FieldKind {
    /// Whether the field holds zero or more values instead of exactly one.
    #[must_use]
    pub const fn is_multi(self) -> bool {
        matches!(self, Self::EnumMulti)
    }

    /// Whether values must come from a choice list.
    #[must_use]
    pub const fn is_enumerated(self) -> bool {
        matches!(self, Self::BooleanRadio | Self::EnumSingle | Self::EnumMulti)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BooleanRadio => "bool",
            Self::Integer => "int",
            Self::EnumSingle => "choice",
            Self::EnumMulti => "choices",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "datetime",
            Self::Text => "text",
        }
    }

    /// Whether `value` is an acceptable element for this kind.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::BooleanRadio => matches!(value, Value::Bool(_)),
            Self::Integer => matches!(value, Value::Int(_)),
            Self::EnumSingle | Self::EnumMulti => !matches!(value, Value::List(_)),
            Self::Date => matches!(value, Value::Date(_)),
            Self::Time => matches!(value, Value::Time(_)),
            Self::DateTime => matches!(value, Value::DateTime(_)),
            Self::Text => matches!(value, Value::Text(_)),
        }
    }
}

/// One enumerated option.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Choice {
    pub label: String,
    pub value: Value,
    /// Tooltip for radio options.
    pub title: Option<String>,
    /// Presentation class hint.
    pub class: Option<String>,
}

impl Choice {
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            title: None,
            class: None,
        }
    }

    /// Set the tooltip shown next to a radio option.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }
}

/// The choice list of a field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Choices {
    /// Free-form field; no list.
    #[default]
    Unrestricted,
    /// List known at construction.
    Fixed(Vec<Choice>),
    /// List will arrive later; membership checks are deferred.
    Pending,
}

impl Choices {
    /// The resolved list, if any.
    #[must_use]
    pub fn as_slice(&self) -> Option<&[Choice]> {
        match self {
            Self::Fixed(list) => Some(list),
            Self::Unrestricted | Self::Pending => None,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Label of the choice holding `value`.
    #[must_use]
    pub fn label_for(&self, value: &Value) -> Option<&str> {
        self.as_slice()?
            .iter()
            .find(|c| &c.value == value)
            .map(|c| c.label.as_str())
    }
}

bitflags! {
    /// Display and validation toggles for a field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FieldFlags: u8 {
        /// Render the label before the value.
        const SHOW_LABEL = 0b0001;
        /// Keep invalid values and display the issues instead of rejecting writes.
        const SHOW_VALIDATION_ISSUES = 0b0010;
        /// Offer type-to-filter on the choice list.
        const FILTERABLE = 0b0100;
        /// Render in a narrow column.
        const LIMITED_WIDTH = 0b1000;
        /// An empty or blank value is a validation issue.
        const REQUIRED = 0b1_0000;
    }
}

impl Default for FieldFlags {
    fn default() -> Self {
        Self::SHOW_LABEL | Self::SHOW_VALIDATION_ISSUES | Self::FILTERABLE
    }
}

/// Inclusive bounds applied to integer fields on every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntBounds {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl IntBounds {
    /// Values below zero are coerced to zero.
    #[must_use]
    pub const fn non_negative() -> Self {
        Self {
            min: Some(0),
            max: None,
        }
    }

    #[must_use]
    pub const fn between(min: i64, max: i64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Clamp `n` into the bounds.
    #[must_use]
    pub fn clamp(self, n: i64) -> i64 {
        let n = self.min.map_or(n, |m| n.max(m));
        self.max.map_or(n, |m| n.min(m))
    }
}

/// A single named value slot with validation metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldModel {
    label: String,
    kind: FieldKind,
    value: Vec<Value>,
    choices: Choices,
    flags: FieldFlags,
    bounds: IntBounds,
    issues: Vec<ValidationError>,
}

impl FieldModel {
    /// Create a field of the given kind with no value.
    pub fn new(label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            label: label.into(),
            kind,
            value: Vec::new(),
            choices: Choices::Unrestricted,
            flags: FieldFlags::default(),
            bounds: IntBounds::default(),
            issues: Vec::new(),
        }
    }

    /// Boolean radio with two labelled options.
    pub fn boolean_radio(label: impl Into<String>, no: Choice, yes: Choice) -> Self {
        Self::new(label, FieldKind::BooleanRadio).with_choices(Choices::Fixed(vec![no, yes]))
    }

    /// Single-select over `choices`.
    pub fn enumerated(label: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self::new(label, FieldKind::EnumSingle).with_choices(Choices::Fixed(choices))
    }

    /// Multi-select over `choices`.
    pub fn enumerated_multi(label: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self::new(label, FieldKind::EnumMulti).with_choices(Choices::Fixed(choices))
    }

    /// Integer field with bounds.
    pub fn integer(label: impl Into<String>, bounds: IntBounds) -> Self {
        Self::new(label, FieldKind::Integer).with_bounds(bounds)
    }

    #[must_use]
    pub fn with_choices(mut self, choices: Choices) -> Self {
        self.choices = choices;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: IntBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Seed the initial value, normalizing and recording issues without
    /// rejecting. Used when loading from a backing record.
    #[must_use]
    pub fn with_value(mut self, value: Vec<Value>) -> Self {
        self.value = self.normalize(value);
        self.issues = self.check(&self.value);
        self
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    #[must_use]
    pub fn value(&self) -> &[Value] {
        &self.value
    }

    /// First element, the value of a single-valued field.
    #[must_use]
    pub fn first(&self) -> Option<&Value> {
        self.value.first()
    }

    #[must_use]
    pub fn choices(&self) -> &Choices {
        &self.choices
    }

    #[must_use]
    pub fn flags(&self) -> FieldFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: FieldFlags) {
        self.flags = flags;
    }

    #[must_use]
    pub fn bounds(&self) -> IntBounds {
        self.bounds
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Current validation issues, in validator order.
    #[must_use]
    pub fn issues(&self) -> &[ValidationError] {
        &self.issues
    }

    /// Write a new value.
    ///
    /// Returns `Ok(true)` when the stored value changed.
    ///
    /// # Errors
    ///
    /// [`FormError::Validation`] when the normalized value is invalid and the
    /// field does not show validation issues.
    pub fn set_value(&mut self, value: Vec<Value>) -> FormResult<bool> {
        let value = self.normalize(value);
        let issues = self.check(&value);
        if let Some(first) = issues.first()
            && !self.flags.contains(FieldFlags::SHOW_VALIDATION_ISSUES)
        {
            crate::warn!(field = %self.label, code = first.code, "write rejected");
            return Err(FormError::Validation {
                field: self.label.clone(),
                error: first.clone(),
            });
        }
        let changed = self.value != value;
        self.value = value;
        self.issues = issues;
        Ok(changed)
    }

    /// Install a resolved choice list and re-validate the current value.
    ///
    /// The value is never discarded here; if it is not among the new
    /// choices the field is marked invalid.
    pub fn set_choices(&mut self, choices: Vec<Choice>) {
        self.choices = Choices::Fixed(choices);
        self.issues = self.check(&self.value);
        crate::debug!(field = %self.label, valid = self.issues.is_empty(), "choices installed");
    }

    /// Re-run validation over the current value.
    pub fn revalidate(&mut self) -> bool {
        self.issues = self.check(&self.value);
        self.issues.is_empty()
    }

    fn normalize(&self, value: Vec<Value>) -> Vec<Value> {
        if self.kind != FieldKind::Integer {
            return value;
        }
        value
            .into_iter()
            .map(|v| match v {
                Value::Int(n) => Value::Int(self.bounds.clamp(n)),
                other => other,
            })
            .collect()
    }

    fn check(&self, value: &[Value]) -> Vec<ValidationError> {
        let mut all = All::new()
            .with(KindMatches::new(self.kind))
            .with(Cardinality::new(self.kind));
        if self.flags.contains(FieldFlags::REQUIRED) {
            all = all.with(Required);
        }
        if self.kind.is_enumerated()
            && let Some(choices) = self.choices.as_slice()
        {
            all = all.with(OneOfChoices::new(choices));
        }
        all.errors(value)
    }
}
