#![forbid(unsafe_code)]

//! Stereo image pair viewer.
//!
//! A result that carries `ext.stereo-image-id` has a partner image whose
//! `ext.alternate-identifier-value` list contains that id. The view looks for
//! the partner among the active results first and falls back to one
//! enterprise-federated query.
//!
//! # State machine
//!
//! ```text
//!            partner in active results
//!   new ──────────────────────────────────────► Ready
//!    │  no stereo id / submit rejected
//!    ├────────────────────────────────────────► NotFound
//!    │  query submitted
//!    └──► Loading ──pump: first result──► Ready
//!            │   ──pump: empty / failed / timed out──► NotFound
//!            └──destroy──► frozen (query cancelled, no further changes)
//! ```

use std::sync::Arc;
use std::time::Instant;

use formbind_core::{Document, PathSeg};
use formbind_runtime::{
    Federation, Filter, FormConfig, InFlightQuery, LookupPoll, QueryRequest, QueryService,
};

pub const STEREO_IMAGE_ID: &str = "ext.stereo-image-id";
pub const ALTERNATE_ID: &str = "ext.alternate-identifier-value";
/// Title of the inspector opened on the pair.
pub const INSPECTOR_TITLE: &str = "Stereo Pairs - Inspector";

fn properties(result: &Document) -> Option<&Document> {
    result.get_in(&[PathSeg::key("metacard"), PathSeg::key("properties")])
}

/// `metacard.properties["ext.stereo-image-id"][0]`.
#[must_use]
pub fn stereo_pair_id(result: &Document) -> Option<&str> {
    properties(result)?
        .get_in(&[PathSeg::key(STEREO_IMAGE_ID), PathSeg::index(0)])?
        .as_str()
}

#[must_use]
pub fn has_stereo_pair(result: &Document) -> bool {
    stereo_pair_id(result).is_some()
}

fn is_partner(candidate: &Document, id: &str) -> bool {
    properties(candidate)
        .and_then(|p| p.get(&PathSeg::key(ALTERNATE_ID)))
        .is_some_and(|ids| ids.str_items().contains(&id))
}

/// What one half of the pair shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    Loading,
    NotFound,
    Ready { thumbnail: String, title: String },
}

impl Preview {
    fn of(result: &Document) -> Self {
        let field = |name: &str| {
            properties(result)
                .and_then(|p| p.get(&PathSeg::key(name)))
                .and_then(Document::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self::Ready {
            thumbnail: field("thumbnail"),
            title: field("title"),
        }
    }

    fn caption(&self) -> &str {
        match self {
            Self::Loading => "Loading…",
            Self::NotFound => "Not Found",
            Self::Ready { title, .. } => title,
        }
    }
}

/// Side-by-side view of a result and its stereo partner.
#[derive(Debug)]
pub struct StereoPairView {
    a: Document,
    b: Option<Document>,
    not_found: bool,
    query: Option<InFlightQuery>,
    destroyed: bool,
}

impl StereoPairView {
    /// Resolve the partner of `result`, querying `service` when it is not
    /// among `active_results`.
    pub fn new(
        result: Document,
        active_results: &[Document],
        service: Arc<dyn QueryService>,
        config: &FormConfig,
        now: Instant,
    ) -> Self {
        let mut view = Self {
            a: result,
            b: None,
            not_found: false,
            query: None,
            destroyed: false,
        };
        let Some(id) = stereo_pair_id(&view.a).map(str::to_string) else {
            view.not_found = true;
            return view;
        };
        if let Some(found) = active_results.iter().find(|r| is_partner(r, &id)) {
            view.b = Some(found.clone());
            return view;
        }
        let request = QueryRequest::new(Filter::ilike(ALTERNATE_ID, id.as_str()))
            .federation(Federation::Enterprise)
            .count(1);
        match InFlightQuery::start(service, request, config.lookup_timeout, now) {
            Ok(query) => view.query = Some(query),
            Err(e) => {
                tracing::warn!(stereo_id = %id, error = %e, "stereo pair lookup not submitted");
                view.not_found = true;
            }
        }
        view
    }

    /// Apply any lookup outcome. Returns whether the view changed.
    pub fn pump(&mut self, now: Instant) -> bool {
        if self.destroyed {
            return false;
        }
        let Some(query) = self.query.as_mut() else {
            return false;
        };
        let changed = match query.poll(now) {
            LookupPoll::Pending => return false,
            LookupPoll::Done(outcome) => {
                match outcome.first() {
                    Some(doc) => self.b = Some(doc.clone()),
                    None => self.not_found = true,
                }
                true
            }
            LookupPoll::TimedOut => {
                self.not_found = true;
                true
            }
            LookupPoll::Cancelled | LookupPoll::Closed => false,
        };
        self.query = None;
        changed
    }

    /// Cancel any outstanding lookup and freeze the view.
    pub fn destroy(&mut self) {
        if let Some(mut query) = self.query.take() {
            query.cancel();
        }
        self.destroyed = true;
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Whether a lookup is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.query.is_some()
    }

    #[must_use]
    pub fn partner(&self) -> Option<&Document> {
        self.b.as_ref()
    }

    /// Previews for the result and its partner.
    #[must_use]
    pub fn previews(&self) -> (Preview, Preview) {
        let b = if self.not_found {
            Preview::NotFound
        } else {
            self.b.as_ref().map_or(Preview::Loading, Preview::of)
        };
        (Preview::of(&self.a), b)
    }

    /// The pair to open in the inspector, once the partner is known.
    #[must_use]
    pub fn inspector_selection(&self) -> Option<[&Document; 2]> {
        self.b.as_ref().map(|b| [&self.a, b])
    }

    #[must_use]
    pub fn render_lines(&self) -> Vec<String> {
        let (a, b) = self.previews();
        vec![
            "Stereo Pairs".to_string(),
            format!("{} | {}", a.caption(), b.caption()),
        ]
    }
}

impl Drop for StereoPairView {
    fn drop(&mut self) {
        self.destroy();
    }
}
