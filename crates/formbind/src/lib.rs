#![forbid(unsafe_code)]

//! formbind public facade crate.
//!
//! Re-exports the types an application needs to declare a form variant, bind
//! it to a record, and drive it, plus a prelude for day-to-day use.
//!
//! ```
//! use formbind::prelude::*;
//!
//! let layout = FormLayout::new("alerts")
//!     .region(
//!         RegionSpec::new("enabled", FieldKind::BooleanRadio)
//!             .choices(vec![Choice::new("Off", false), Choice::new("On", true)]),
//!     )
//!     .region(RegionSpec::new("every", FieldKind::Integer).bounds(IntBounds::non_negative()))
//!     .rule(DependencyRule::show_when_truthy("enabled", ["every"]));
//!
//! let record = Record::new().attr("enabled", false).attr("every", 5_i64);
//! let mut form = CompositeForm::transient(layout, record).unwrap();
//! form.show(&NoChoices).unwrap();
//! assert_eq!(form.is_visible("every"), Some(false));
//!
//! form.input("enabled", vec![Value::Bool(true)]).unwrap();
//! form.input("every", vec![Value::Int(-1)]).unwrap();
//! assert_eq!(form.extract().unwrap().get("every"), Some(&Value::Int(0)));
//! ```

// --- Core re-exports -------------------------------------------------------

pub use formbind_core::{
    Choice, Choices, Document, FieldFlags, FieldKind, FieldModel, FormError, FormResult,
    IntBounds, PathSeg, Record, RecordId, ValidationError, ValidationResult, Validator, Value,
};

// --- Widget re-exports -----------------------------------------------------

pub use formbind_widgets::{
    ChangeEvent, ChangeOrigin, Editable, FieldWidget, RelativeTime, RelativeTimeInput,
    RelativeUnit, Widget,
};

// --- Runtime re-exports ----------------------------------------------------

pub use formbind_runtime::{
    ChoiceFetch, ChoiceProvider, CompositeForm, DependencyRule, DependencyTable, Effect,
    FormConfig, FormLayout, InFlightQuery, MemoryStore, NoChoices, Phase, Predicate, QueryService,
    RecordStore, RegionSpec, StaticChoices,
};

#[cfg(feature = "extras")]
pub use formbind_extras as extras;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Choice, ChoiceProvider, CompositeForm, DependencyRule, Editable, FieldKind, FormConfig,
        FormError, FormLayout, FormResult, IntBounds, MemoryStore, NoChoices, Record,
        RecordStore, RegionSpec, Value, Widget,
    };
}
