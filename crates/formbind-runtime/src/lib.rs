#![forbid(unsafe_code)]

//! formbind runtime
//!
//! Ties field widgets to backing records.
//!
//! # Key Components
//!
//! - [`CompositeForm`] - mounts one widget per region, seeds it from a
//!   [`Record`](formbind_core::Record), re-applies dependency rules on change,
//!   and writes values back on [`CompositeForm::extract`]
//! - [`FormLayout`] / [`RegionSpec`] - declarative description of a form variant
//! - [`DependencyTable`] - trigger/predicate/effect rules with a single dispatcher
//! - [`RecordStore`] / [`MemoryStore`] - resolution of record references
//! - [`ChoiceProvider`] - external choice lists, ready or deferred
//! - [`InFlightQuery`] - one cancellable remote lookup with a deadline
//! - [`FormConfig`] - timeouts and rendering budgets

pub mod config;
pub mod controller;
pub mod debug_trace;
pub mod dependency;
pub mod layout;
pub mod lookup;
pub mod provider;
pub mod store;

pub use config::FormConfig;
pub use controller::{CompositeForm, Phase};
pub use dependency::{DependencyRule, DependencyTable, Effect, Predicate, RegionState};
pub use layout::{ChoiceSource, FormLayout, RegionSpec};
pub use lookup::{
    CancelSignal, Federation, Filter, FilterOp, InFlightQuery, LookupError, LookupPoll,
    ManualQueryService, QueryId, QueryOutcome, QueryReply, QueryRequest, QueryService,
};
pub use provider::{ChoiceFetch, ChoiceProvider, NoChoices, StaticChoices};
pub use store::{MemoryStore, RecordStore, StoreError, StoreResult};
