#![forbid(unsafe_code)]

//! Shared search-form list.
//!
//! The list starts in a loading state with a spinner. Forms arrive in one or
//! more batches; when the collection reports it is done loading, the spinner
//! is removed. Forms stay listed in arrival order.

use formbind_widgets::fit_to_width;

/// Title of the sharing dialog opened from a form entry.
pub const SHARING_LIGHTBOX_TITLE: &str = "Search Form Sharing";

/// One search form shared with the current user.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SharedSearchForm {
    pub id: String,
    pub title: String,
    pub creator: String,
}

impl SharedSearchForm {
    pub fn new(id: impl Into<String>, title: impl Into<String>, creator: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            creator: creator.into(),
        }
    }
}

/// Forms shared with the user, plus whether loading has finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFormSharingCollection {
    forms: Vec<SharedSearchForm>,
    done_loading: bool,
}

impl SearchFormSharingCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch. Forms whose id is already listed replace the old entry.
    pub fn extend(&mut self, forms: impl IntoIterator<Item = SharedSearchForm>) {
        for form in forms {
            match self.forms.iter_mut().find(|f| f.id == form.id) {
                Some(existing) => *existing = form,
                None => self.forms.push(form),
            }
        }
    }

    pub fn set_done_loading(&mut self, done: bool) {
        self.done_loading = done;
    }

    #[must_use]
    pub fn is_done_loading(&self) -> bool {
        self.done_loading
    }

    #[must_use]
    pub fn forms(&self) -> &[SharedSearchForm] {
        &self.forms
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SharedSearchForm> {
        self.forms.iter().find(|f| f.id == id)
    }
}

/// The list view: collection plus spinner.
#[derive(Debug, Clone)]
pub struct SearchFormSharingView {
    collection: SearchFormSharingCollection,
    spinner: bool,
}

impl SearchFormSharingView {
    /// A view over `collection`; the spinner shows unless it is already loaded.
    #[must_use]
    pub fn new(collection: SearchFormSharingCollection) -> Self {
        let mut view = Self {
            collection,
            spinner: true,
        };
        view.handle_loading_spinner();
        view
    }

    #[must_use]
    pub fn collection(&self) -> &SearchFormSharingCollection {
        &self.collection
    }

    /// Add a batch of forms.
    pub fn receive(&mut self, forms: impl IntoIterator<Item = SharedSearchForm>) {
        self.collection.extend(forms);
    }

    /// Mark the collection loaded and drop the spinner.
    pub fn finish_loading(&mut self) {
        self.collection.set_done_loading(true);
        self.handle_loading_spinner();
    }

    #[must_use]
    pub fn is_spinner_visible(&self) -> bool {
        self.spinner
    }

    fn handle_loading_spinner(&mut self) {
        if self.collection.is_done_loading() {
            self.spinner = false;
        }
    }

    /// One line per form, then the spinner while loading.
    #[must_use]
    pub fn render_lines(&self, width: usize) -> Vec<String> {
        let mut lines: Vec<String> = self
            .collection
            .forms()
            .iter()
            .map(|f| fit_to_width(&format!("{} ({})", f.title, f.creator), width))
            .collect();
        if self.spinner {
            lines.push(fit_to_width("Loading…", width));
        }
        lines
    }
}
