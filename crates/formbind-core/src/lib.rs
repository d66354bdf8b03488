#![forbid(unsafe_code)]

//! Core: field values, field models, validation, backing records, and errors.

pub mod document;
pub mod error;
pub mod field;
pub mod logging;
pub mod record;
pub mod validation;
pub mod value;

pub use document::{Document, PathSeg};
pub use error::{FormError, FormResult};
pub use field::{Choice, Choices, FieldFlags, FieldKind, FieldModel, IntBounds};
pub use record::{Record, RecordId};
pub use validation::{ValidationError, ValidationResult, Validator};
pub use value::Value;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, info, trace, warn};
