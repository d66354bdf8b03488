#![forbid(unsafe_code)]

//! Backing records: the externally persisted objects a form edits.
//!
//! A [`Record`] is an attribute bag with an optional identity. Forms read it
//! once when shown and write it back on extraction; the store that owns it
//! decides when it is persisted.

use std::collections::BTreeMap;
use std::fmt;

use crate::value::Value;

/// Identity of a persisted record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// An attribute set with an optional identity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    id: Option<RecordId>,
    attrs: BTreeMap<String, Value>,
}

impl Record {
    /// A transient record with no identity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A record that refers to a stored instance.
    #[must_use]
    pub fn with_id(id: impl Into<RecordId>) -> Self {
        Self {
            id: Some(id.into()),
            attrs: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    /// Set an attribute, returning the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.attrs.insert(name.into(), value)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.attrs.remove(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Attributes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_and_accessors() {
        let mut record = Record::with_id("delivery-7")
            .attr("hours", 9i64)
            .attr("deliveryScheduled", true);
        assert_eq!(record.id().map(RecordId::as_str), Some("delivery-7"));
        assert_eq!(record.get("hours"), Some(&Value::Int(9)));
        assert_eq!(record.set("hours", Value::Int(10)), Some(Value::Int(9)));
        assert_eq!(record.len(), 2);
        assert_eq!(record.remove("hours"), Some(Value::Int(10)));
        assert!(!record.contains("hours"));
    }

    #[test]
    fn iteration_is_name_ordered() {
        let record = Record::new().attr("b", 1i64).attr("a", 2i64);
        let names: Vec<_> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(record.id().is_none());
    }
}
