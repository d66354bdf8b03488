#![forbid(unsafe_code)]

//! The composite form controller.
//!
//! A [`CompositeForm`] binds the regions of a [`FormLayout`] to one backing
//! [`Record`]. It owns one [`FieldWidget`] per region, keeps region
//! visibility in sync with the layout's [`DependencyTable`](crate::DependencyTable),
//! and writes widget values back into the record on [`CompositeForm::extract`].
//!
//! # Lifecycle
//!
//! ```text
//! initialize ──► Initialized ──show──► Shown ──teardown──► TornDown
//!                     │                                      ▲
//!                     └──────────────teardown────────────────┘
//! ```
//!
//! - `show` runs exactly once. It mounts every region with editing off,
//!   resolves every dependency rule, then turns editing on.
//! - `extract` is only legal while `Shown`. It never hands out a record that
//!   was not populated from mounted widgets.
//! - `teardown` drops every widget; later writes and late choice lists are
//!   refused with [`FormError::IllegalState`].
//!
//! # Dependency dispatch
//!
//! Every successful write queues a change notification on its widget. The
//! controller drains it immediately and, when the region is a rule trigger,
//! re-resolves the whole rule table. There is no debouncing; effects apply in
//! the order writes were made.

use formbind_core::{Choice, Choices, FormError, FormResult, Record, RecordId, Value};
use formbind_widgets::{Editable, FieldWidget, Widget};
use tracing::{debug, debug_span, trace, warn};

use crate::config::FormConfig;
use crate::layout::{ChoiceSource, FormLayout, RegionSpec};
use crate::provider::{ChoiceFetch, ChoiceProvider};
use crate::store::RecordStore;

/// Where a form is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initialized,
    Shown,
    TornDown,
}

#[derive(Debug)]
struct Region {
    spec: RegionSpec,
    widget: FieldWidget,
}

/// A form variant bound to one backing record.
#[derive(Debug)]
pub struct CompositeForm {
    layout: FormLayout,
    record: Record,
    config: FormConfig,
    regions: Vec<Region>,
    editing: bool,
    phase: Phase,
}

impl CompositeForm {
    /// Bind `layout` to `record`, resolving it through `store` first when it
    /// carries an id.
    ///
    /// # Errors
    ///
    /// - [`FormError::StaleReference`] if the id no longer resolves.
    /// - [`FormError::Store`] if the store fails.
    /// - Layout errors from [`FormLayout::validate`].
    pub fn initialize(layout: FormLayout, record: Record, store: &dyn RecordStore) -> FormResult<Self> {
        match record.id() {
            Some(id) => {
                let id = id.clone();
                Self::initialize_by_id(layout, &id, store)
            }
            None => Self::transient(layout, record),
        }
    }

    /// Bind `layout` to the store's canonical copy of `id`.
    ///
    /// # Errors
    ///
    /// As [`Self::initialize`].
    pub fn initialize_by_id(layout: FormLayout, id: &RecordId, store: &dyn RecordStore) -> FormResult<Self> {
        match store.get_by_id(id)? {
            Some(record) => Self::transient(layout, record),
            None => {
                warn!(record = %id, store = store.name(), form = layout.name(), "stale record reference");
                Err(FormError::StaleReference(id.clone()))
            }
        }
    }

    /// Bind `layout` to an already-resolved record.
    ///
    /// # Errors
    ///
    /// Layout errors from [`FormLayout::validate`].
    pub fn transient(layout: FormLayout, record: Record) -> FormResult<Self> {
        layout.validate()?;
        Ok(Self {
            layout,
            record,
            config: FormConfig::default(),
            regions: Vec::new(),
            editing: false,
            phase: Phase::Initialized,
        })
    }

    #[must_use]
    pub fn with_config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn layout(&self) -> &FormLayout {
        &self.layout
    }

    #[must_use]
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Mount every region and evaluate the dependency rules once.
    ///
    /// Choice lists come from the layout or from `provider`; deferred lists
    /// leave the region pending until [`Self::supply_choices`].
    ///
    /// # Errors
    ///
    /// [`FormError::IllegalState`] unless the form is freshly initialized.
    pub fn show(&mut self, provider: &dyn ChoiceProvider) -> FormResult<()> {
        if self.phase != Phase::Initialized {
            return Err(FormError::illegal_state(format!(
                "show called on form {} in phase {:?}",
                self.layout.name(),
                self.phase
            )));
        }
        let _span = debug_span!("form.show", form = self.layout.name()).entered();
        self.editing = false;

        let mut regions = Vec::with_capacity(self.layout.regions().len());
        for spec in self.layout.regions() {
            let choices = match spec.choice_source() {
                ChoiceSource::None => Choices::Unrestricted,
                ChoiceSource::Static(list) => Choices::Fixed(list.clone()),
                ChoiceSource::Provider(key) => match provider.fetch(key) {
                    ChoiceFetch::Ready(list) => Choices::Fixed(list),
                    ChoiceFetch::Deferred => {
                        debug!(region = spec.name(), key = key.as_str(), "choice list deferred");
                        Choices::Pending
                    }
                },
            };
            let mut widget = FieldWidget::new(spec.model(&self.record, choices));
            widget.set_limited_columns(self.config.limited_width);
            if spec.is_limited_width() {
                widget.turn_on_limited_width();
            }
            widget.turn_off_editing();
            regions.push(Region {
                spec: spec.clone(),
                widget,
            });
        }
        self.regions = regions;
        self.apply_rules();
        self.phase = Phase::Shown;
        self.set_editing(true);

        debug!(regions = self.regions.len(), loading = self.is_loading(), "form shown");
        crate::debug_trace!("show: form={} regions={}", self.layout.name(), self.regions.len());
        Ok(())
    }

    /// Switch every mounted widget between editable and read-only.
    ///
    /// No-op once the form is torn down.
    pub fn set_editing(&mut self, editing: bool) {
        if self.phase == Phase::TornDown {
            return;
        }
        self.editing = editing;
        for region in &mut self.regions {
            region.widget.set_editing(editing);
        }
    }

    /// Programmatic write to a region.
    ///
    /// # Errors
    ///
    /// [`FormError::IllegalState`] unless shown, [`FormError::UnknownRegion`],
    /// or the widget's validation error.
    pub fn set_value(&mut self, region: &str, values: Vec<Value>) -> FormResult<()> {
        self.region_mut(region)?.widget.set_value(values)?;
        self.dispatch(region);
        Ok(())
    }

    /// User write to a region; the region must be editable.
    ///
    /// # Errors
    ///
    /// As [`Self::set_value`], plus [`FormError::ReadOnly`].
    pub fn input(&mut self, region: &str, values: Vec<Value>) -> FormResult<()> {
        self.region_mut(region)?.widget.input(values)?;
        self.dispatch(region);
        Ok(())
    }

    /// Install a choice list that arrived after `show`.
    ///
    /// # Errors
    ///
    /// [`FormError::IllegalState`] unless shown (including after teardown),
    /// [`FormError::UnknownRegion`].
    pub fn supply_choices(&mut self, region: &str, choices: Vec<Choice>) -> FormResult<()> {
        let target = self.region_mut(region)?;
        target.widget.supply_choices(choices);
        let valid = target.widget.is_valid();
        debug!(region, valid, "choices supplied");
        Ok(())
    }

    /// Whether any region still waits for its choice list.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.regions
            .iter()
            .any(|r| r.widget.model().choices().is_pending())
    }

    /// Write every region's value into the backing record and return it.
    ///
    /// # Errors
    ///
    /// [`FormError::IllegalState`] unless shown.
    pub fn extract(&mut self) -> FormResult<&Record> {
        self.ensure_shown("extract")?;
        for region in &self.regions {
            region.spec.store(region.widget.value(), &mut self.record);
        }
        debug!(form = self.layout.name(), attributes = self.record.len(), "form extracted");
        crate::debug_trace!("extract: form={}", self.layout.name());
        Ok(&self.record)
    }

    /// The backing record as last seeded or extracted.
    #[must_use]
    pub fn record(&self) -> &Record {
        &self.record
    }

    #[must_use]
    pub fn into_record(self) -> Record {
        self.record
    }

    /// Mounted widget for `name`, if shown.
    #[must_use]
    pub fn region(&self, name: &str) -> Option<&FieldWidget> {
        self.regions
            .iter()
            .find(|r| r.spec.name() == name)
            .map(|r| &r.widget)
    }

    /// Mounted region names in visual order.
    pub fn region_names(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|r| r.spec.name())
    }

    #[must_use]
    pub fn is_visible(&self, name: &str) -> Option<bool> {
        self.region(name).map(FieldWidget::is_visible)
    }

    /// Whether every mounted region holds a valid value.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.regions.iter().all(|r| r.widget.is_valid())
    }

    /// One line per visible region, in visual order.
    #[must_use]
    pub fn render_lines(&self, width: usize) -> Vec<String> {
        self.regions
            .iter()
            .filter(|r| r.widget.is_visible())
            .map(|r| r.widget.render_line(width))
            .collect()
    }

    /// Release every widget. Idempotent.
    pub fn teardown(&mut self) {
        if self.phase == Phase::TornDown {
            return;
        }
        self.regions.clear();
        self.editing = false;
        self.phase = Phase::TornDown;
        debug!(form = self.layout.name(), "form torn down");
        crate::debug_trace!("teardown: form={}", self.layout.name());
    }

    fn ensure_shown(&self, op: &str) -> FormResult<()> {
        match self.phase {
            Phase::Shown => Ok(()),
            Phase::Initialized => Err(FormError::illegal_state(format!(
                "{op} called before show on form {}",
                self.layout.name()
            ))),
            Phase::TornDown => Err(FormError::illegal_state(format!(
                "{op} called after teardown of form {}",
                self.layout.name()
            ))),
        }
    }

    fn region_mut(&mut self, name: &str) -> FormResult<&mut Region> {
        self.ensure_shown("write")?;
        self.regions
            .iter_mut()
            .find(|r| r.spec.name() == name)
            .ok_or_else(|| FormError::UnknownRegion(name.to_string()))
    }

    fn dispatch(&mut self, region: &str) {
        let Some(target) = self.regions.iter_mut().find(|r| r.spec.name() == region) else {
            return;
        };
        let changes = target.widget.take_changes();
        if changes.is_empty() || !self.layout.rules().is_trigger(region) {
            return;
        }
        crate::debug_trace!("dispatch: region={} changes={}", region, changes.len());
        self.apply_rules();
    }

    fn apply_rules(&mut self) {
        let states = self.layout.rules().resolve(|name| {
            self.regions
                .iter()
                .find(|r| r.spec.name() == name)
                .map(|r| r.widget.value())
        });
        for (name, state) in states {
            if let Some(region) = self.regions.iter_mut().find(|r| r.spec.name() == name) {
                trace!(region = name.as_str(), visible = state.visible, enabled = state.enabled, "dependency applied");
                region.widget.set_visible(state.visible);
                region.widget.set_enabled(state.enabled);
            }
        }
    }
}
