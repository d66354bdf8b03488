#![forbid(unsafe_code)]

//! Result-form template registry.
//!
//! Result forms choose which attributes a result list shows. The registry is
//! an owned value: create it at application start, pass it to whoever needs
//! it, and [`ResultFormRegistry::reset`] it between tests.
//!
//! # Invariants
//!
//! 1. [`ResultFormRegistry::list`] always holds exactly one entry with id
//!    [`ALL_FIELDS_ID`], and it is the last entry.
//! 2. Removing that entry is refused with [`FormError::IllegalState`].
//! 3. Incoming templates that claim the reserved id are dropped.

use formbind_core::{Choice, FormError, FormResult};
use time::OffsetDateTime;

/// Id of the synthetic entry that shows every attribute.
pub const ALL_FIELDS_ID: &str = "allFields";
pub const ALL_FIELDS_LABEL: &str = "All Fields";

/// A result form as stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct ResultTemplate {
    pub id: String,
    pub title: String,
    pub descriptors: Vec<String>,
    pub description: Option<String>,
    pub created: Option<OffsetDateTime>,
    pub creator: Option<String>,
    pub access_groups: Vec<String>,
    pub access_individuals: Vec<String>,
}

impl ResultTemplate {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn descriptors<S: Into<String>>(mut self, descriptors: impl IntoIterator<Item = S>) -> Self {
        self.descriptors = descriptors.into_iter().map(Into::into).collect();
        self
    }
}

/// A registry entry: a template shaped as a choice.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TemplateDescriptor {
    pub label: String,
    pub value: String,
    pub id: String,
    pub descriptors: Vec<String>,
    pub description: Option<String>,
    pub created: Option<OffsetDateTime>,
    pub creator: Option<String>,
    pub access_groups: Vec<String>,
    pub access_individuals: Vec<String>,
}

impl TemplateDescriptor {
    /// The synthetic "All Fields" entry.
    #[must_use]
    pub fn all_fields() -> Self {
        Self {
            label: ALL_FIELDS_LABEL.to_string(),
            value: ALL_FIELDS_ID.to_string(),
            id: ALL_FIELDS_ID.to_string(),
            descriptors: Vec::new(),
            description: Some(ALL_FIELDS_LABEL.to_string()),
            created: None,
            creator: None,
            access_groups: Vec::new(),
            access_individuals: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_all_fields(&self) -> bool {
        self.id == ALL_FIELDS_ID
    }
}

impl From<ResultTemplate> for TemplateDescriptor {
    fn from(t: ResultTemplate) -> Self {
        Self {
            label: t.title,
            value: t.id.clone(),
            id: t.id,
            descriptors: t.descriptors,
            description: t.description,
            created: t.created,
            creator: t.creator,
            access_groups: t.access_groups,
            access_individuals: t.access_individuals,
        }
    }
}

/// Owned registry of result-form descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultFormRegistry {
    entries: Vec<TemplateDescriptor>,
}

impl Default for ResultFormRegistry {
    fn default() -> Self {
        Self {
            entries: vec![TemplateDescriptor::all_fields()],
        }
    }
}

impl ResultFormRegistry {
    /// Registry holding only the "All Fields" entry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_templates(templates: impl IntoIterator<Item = ResultTemplate>) -> Self {
        let mut registry = Self::new();
        registry.replace_all(templates);
        registry
    }

    /// Entries in display order; "All Fields" last.
    #[must_use]
    pub fn list(&self) -> &[TemplateDescriptor] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true; the "All Fields" entry is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&TemplateDescriptor> {
        self.entries.iter().find(|d| d.id == id)
    }

    /// Replace every user template, keeping "All Fields" last.
    pub fn replace_all(&mut self, templates: impl IntoIterator<Item = ResultTemplate>) {
        let mut entries: Vec<TemplateDescriptor> = templates
            .into_iter()
            .filter(|t| {
                let reserved = t.id == ALL_FIELDS_ID;
                if reserved {
                    formbind_core::warn!(title = %t.title, "dropping template with reserved id");
                }
                !reserved
            })
            .map(TemplateDescriptor::from)
            .collect();
        entries.push(TemplateDescriptor::all_fields());
        self.entries = entries;
    }

    /// Remove a user template. Returns the removed entry, or `None` if no
    /// entry has `id`.
    ///
    /// # Errors
    ///
    /// [`FormError::IllegalState`] for [`ALL_FIELDS_ID`]; the registry is
    /// left unchanged.
    pub fn remove_by_id(&mut self, id: &str) -> FormResult<Option<TemplateDescriptor>> {
        if id == ALL_FIELDS_ID {
            return Err(FormError::illegal_state("the All Fields result form cannot be removed"));
        }
        Ok(self
            .entries
            .iter()
            .position(|d| d.id == id)
            .map(|i| self.entries.remove(i)))
    }

    /// The registry as an enumerated choice list (label, id).
    #[must_use]
    pub fn choices(&self) -> Vec<Choice> {
        self.entries
            .iter()
            .map(|d| {
                let choice = Choice::new(d.label.clone(), d.value.clone());
                match &d.description {
                    Some(desc) => choice.with_title(desc.clone()),
                    None => choice,
                }
            })
            .collect()
    }

    /// Drop every user template.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formbind_core::Value;

    fn templates() -> Vec<ResultTemplate> {
        vec![
            ResultTemplate::new("rf-1", "Imagery").descriptors(["title", "thumbnail"]),
            ResultTemplate::new("rf-2", "Documents"),
        ]
    }

    #[test]
    fn new_has_only_all_fields() {
        let registry = ResultFormRegistry::new();
        assert_eq!(registry.list(), &[TemplateDescriptor::all_fields()]);
        assert!(!registry.is_empty());
    }

    #[test]
    fn replace_all_maps_and_appends() {
        let registry = ResultFormRegistry::from_templates(templates());
        let ids: Vec<_> = registry.list().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["rf-1", "rf-2", ALL_FIELDS_ID]);
        let first = registry.get("rf-1").unwrap();
        assert_eq!(first.label, "Imagery");
        assert_eq!(first.value, "rf-1");
        assert_eq!(first.descriptors, vec!["title", "thumbnail"]);
    }

    #[test]
    fn replace_all_twice_keeps_one_all_fields() {
        let mut registry = ResultFormRegistry::new();
        registry.replace_all(templates());
        registry.replace_all(templates());
        registry.replace_all([ResultTemplate::new(ALL_FIELDS_ID, "Impostor")]);
        let all: Vec<_> = registry.list().iter().filter(|d| d.is_all_fields()).collect();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].label, ALL_FIELDS_LABEL);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_all_fields_is_refused() {
        let mut registry = ResultFormRegistry::from_templates(templates());
        let before = registry.clone();
        assert!(matches!(
            registry.remove_by_id(ALL_FIELDS_ID),
            Err(FormError::IllegalState(_))
        ));
        assert_eq!(registry, before);
    }

    #[test]
    fn remove_user_template() {
        let mut registry = ResultFormRegistry::from_templates(templates());
        let removed = registry.remove_by_id("rf-2").unwrap().unwrap();
        assert_eq!(removed.label, "Documents");
        assert_eq!(registry.remove_by_id("rf-2").unwrap(), None);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn choices_and_reset() {
        let mut registry = ResultFormRegistry::from_templates(templates());
        let choices = registry.choices();
        assert_eq!(choices.len(), 3);
        assert_eq!(choices[2].value, Value::text(ALL_FIELDS_ID));
        assert_eq!(choices[2].title.as_deref(), Some(ALL_FIELDS_LABEL));
        registry.reset();
        assert_eq!(registry, ResultFormRegistry::new());
    }
}
