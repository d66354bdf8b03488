#![forbid(unsafe_code)]

//! External choice-list providers.
//!
//! Providers are queried once per region when a form is shown. A provider
//! that cannot answer synchronously returns [`ChoiceFetch::Deferred`]; the
//! form renders the region with a pending choice list and the caller installs
//! the list later through
//! [`CompositeForm::supply_choices`](crate::CompositeForm::supply_choices).

use std::collections::HashMap;

use formbind_core::Choice;

/// Result of asking a provider for a choice list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceFetch {
    Ready(Vec<Choice>),
    /// The list will arrive later.
    Deferred,
}

/// Source of named choice lists.
pub trait ChoiceProvider {
    fn fetch(&self, key: &str) -> ChoiceFetch;
}

/// Provider that never answers synchronously.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoChoices;

impl ChoiceProvider for NoChoices {
    fn fetch(&self, _key: &str) -> ChoiceFetch {
        ChoiceFetch::Deferred
    }
}

/// Fixed lists keyed by name. Unknown keys are deferred.
#[derive(Debug, Clone, Default)]
pub struct StaticChoices {
    lists: HashMap<String, Vec<Choice>>,
}

impl StaticChoices {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, choices: Vec<Choice>) -> Self {
        self.lists.insert(key.into(), choices);
        self
    }
}

impl ChoiceProvider for StaticChoices {
    fn fetch(&self, key: &str) -> ChoiceFetch {
        self.lists
            .get(key)
            .map_or(ChoiceFetch::Deferred, |c| ChoiceFetch::Ready(c.clone()))
    }
}

impl<P: ChoiceProvider + ?Sized> ChoiceProvider for &P {
    fn fetch(&self, key: &str) -> ChoiceFetch {
        (**self).fetch(key)
    }
}
