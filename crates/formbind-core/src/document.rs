#![forbid(unsafe_code)]

//! Typed access into nested result documents.
//!
//! Search results arrive as nested maps and lists. [`Document`] is the closed
//! set of shapes a result can take, and [`Document::get_in`] walks a path of
//! [`PathSeg`]s through it: keys index maps, indices index lists, and any
//! mismatch yields `None`.
//!
//! ```
//! use formbind_core::{Document, PathSeg, Value};
//!
//! let result = Document::map([(
//!     "metacard",
//!     Document::map([(
//!         "properties",
//!         Document::map([("ext.stereo-image-id", Document::list([Document::leaf("img-2")]))]),
//!     )]),
//! )]);
//! let id = result.get_in(&[
//!     PathSeg::key("metacard"),
//!     PathSeg::key("properties"),
//!     PathSeg::key("ext.stereo-image-id"),
//!     PathSeg::index(0),
//! ]);
//! assert_eq!(id.and_then(Document::as_value), Some(&Value::text("img-2")));
//! ```

use std::collections::BTreeMap;

use crate::value::Value;

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSeg {
    Key(String),
    Index(usize),
}

impl PathSeg {
    pub fn key(k: impl Into<String>) -> Self {
        Self::Key(k.into())
    }

    #[must_use]
    pub const fn index(i: usize) -> Self {
        Self::Index(i)
    }
}

/// A nested, JSON-like document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    Map(BTreeMap<String, Document>),
    List(Vec<Document>),
    Leaf(Value),
}

impl Document {
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Document)>) -> Self {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn list(items: impl IntoIterator<Item = Document>) -> Self {
        Self::List(items.into_iter().collect())
    }

    pub fn leaf(value: impl Into<Value>) -> Self {
        Self::Leaf(value.into())
    }

    /// Follow one step.
    #[must_use]
    pub fn get(&self, seg: &PathSeg) -> Option<&Document> {
        match (self, seg) {
            (Self::Map(map), PathSeg::Key(k)) => map.get(k),
            (Self::List(items), PathSeg::Index(i)) => items.get(*i),
            _ => None,
        }
    }

    /// Follow a whole path; `None` at the first step that does not fit.
    #[must_use]
    pub fn get_in(&self, path: &[PathSeg]) -> Option<&Document> {
        path.iter().try_fold(self, |doc, seg| doc.get(seg))
    }

    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Leaf(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    /// Text elements of a list, skipping anything that is not text.
    #[must_use]
    pub fn str_items(&self) -> Vec<&str> {
        match self {
            Self::List(items) => items.iter().filter_map(Document::as_str).collect(),
            Self::Leaf(Value::Text(s)) => vec![s.as_str()],
            _ => Vec::new(),
        }
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Value> for Document {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Object(map) => Self::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect()),
            Json::Array(items) => Self::List(items.into_iter().map(Into::into).collect()),
            Json::Bool(b) => Self::Leaf(Value::Bool(b)),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Self::Leaf(Value::Int(i)),
                None => Self::Leaf(Value::Text(n.to_string())),
            },
            Json::String(s) => Self::Leaf(Value::Text(s)),
            Json::Null => Self::List(Vec::new()),
        }
    }
}
