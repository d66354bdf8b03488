#![forbid(unsafe_code)]

//! Errors surfaced by field models and form controllers.
//!
//! # Failure Modes
//!
//! | Error | Cause | Effect |
//! |-------|-------|--------|
//! | `Validation` | Write outside the kind or choice set on a field that hides issues | Write rejected, value kept |
//! | `IllegalState` | Operation called in the wrong lifecycle phase, protected registry entry | Call rejected |
//! | `StaleReference` | Backing record id no longer resolves in the store | Form not created |
//! | `UnknownRegion` | Region name not declared by the layout | Call rejected |
//! | `ReadOnly` | User input while edit mode is off | Input ignored |
//! | `Store` | Backing store failure | Propagated to caller |
//!
//! None of these are fatal; each is contained to the component that raised it.

use std::fmt;

use crate::record::RecordId;
use crate::validation::ValidationError;

/// Errors from field and form operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// A value failed validation.
    Validation {
        field: String,
        error: ValidationError,
    },
    /// The operation is not valid in the current state.
    IllegalState(String),
    /// A record reference no longer exists in the store.
    StaleReference(RecordId),
    /// The named region is not part of the form.
    UnknownRegion(String),
    /// User input arrived while the field was read-only.
    ReadOnly(String),
    /// The backing store failed.
    Store(String),
}

impl FormError {
    pub fn illegal_state(msg: impl Into<String>) -> Self {
        Self::IllegalState(msg.into())
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { field, error } if field.is_empty() => {
                write!(f, "validation failed: {error}")
            }
            Self::Validation { field, error } => write!(f, "validation failed for {field}: {error}"),
            Self::IllegalState(msg) => write!(f, "illegal state: {msg}"),
            Self::StaleReference(id) => write!(f, "record {id} no longer exists in the store"),
            Self::UnknownRegion(name) => write!(f, "unknown region: {name}"),
            Self::ReadOnly(name) => write!(f, "field {name} is read-only"),
            Self::Store(msg) => write!(f, "store error: {msg}"),
        }
    }
}

impl std::error::Error for FormError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ValidationError> for FormError {
    fn from(error: ValidationError) -> Self {
        Self::Validation {
            field: String::new(),
            error,
        }
    }
}

/// Result type for form operations.
pub type FormResult<T> = Result<T, FormError>;
