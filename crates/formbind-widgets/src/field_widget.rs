#![forbid(unsafe_code)]

//! The interactive wrapper around one field model.
//!
//! # Invariants
//!
//! 1. Every successful write (programmatic or user) queues exactly one
//!    [`ChangeEvent`]; rejected writes queue nothing.
//! 2. User input is accepted only while the widget is editing and enabled.
//! 3. Hidden widgets keep their value; visibility only affects rendering.

use formbind_core::{Choice, FieldFlags, FieldModel, FormError, FormResult, Value};

use crate::{Editable, Widget, fit_to_width};

/// Column budget for widgets rendered with limited width.
pub const LIMITED_WIDTH_COLUMNS: usize = 24;

/// Where a change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// Set by code (seeding, controller writes).
    Program,
    /// Entered by the user while editing.
    User,
}

/// Notification that a widget's value was written.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub value: Vec<Value>,
    pub previous: Vec<Value>,
    pub origin: ChangeOrigin,
}

impl ChangeEvent {
    /// Whether the write actually altered the value.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.value != self.previous
    }
}

/// A mounted field control.
#[derive(Debug, Clone)]
pub struct FieldWidget {
    model: FieldModel,
    editing: bool,
    visible: bool,
    enabled: bool,
    limited_columns: usize,
    pending: Vec<ChangeEvent>,
}

impl FieldWidget {
    #[must_use]
    pub fn new(model: FieldModel) -> Self {
        Self {
            model,
            editing: false,
            visible: true,
            enabled: true,
            limited_columns: LIMITED_WIDTH_COLUMNS,
            pending: Vec::new(),
        }
    }

    #[must_use]
    pub fn model(&self) -> &FieldModel {
        &self.model
    }

    #[must_use]
    pub fn value(&self) -> &[Value] {
        self.model.value()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.model.is_valid()
    }

    /// Programmatic write.
    ///
    /// # Errors
    ///
    /// Propagates [`FormError::Validation`] from the model.
    pub fn set_value(&mut self, value: Vec<Value>) -> FormResult<()> {
        self.write(value, ChangeOrigin::Program)
    }

    /// User write; only allowed while editing and enabled.
    ///
    /// # Errors
    ///
    /// [`FormError::ReadOnly`] when not editable, otherwise as [`Self::set_value`].
    pub fn input(&mut self, value: Vec<Value>) -> FormResult<()> {
        if !self.editing || !self.enabled {
            formbind_core::debug!(
                field = %self.model.label(),
                editing = self.editing,
                enabled = self.enabled,
                "input refused"
            );
            return Err(FormError::ReadOnly(self.model.label().to_string()));
        }
        self.write(value, ChangeOrigin::User)
    }

    fn write(&mut self, value: Vec<Value>, origin: ChangeOrigin) -> FormResult<()> {
        let previous = self.model.value().to_vec();
        self.model.set_value(value)?;
        formbind_core::trace!(field = %self.model.label(), origin = ?origin, "value written");
        self.pending.push(ChangeEvent {
            value: self.model.value().to_vec(),
            previous,
            origin,
        });
        Ok(())
    }

    /// Install a late-arriving choice list; the value is re-validated, not replaced.
    pub fn supply_choices(&mut self, choices: Vec<Choice>) {
        self.model.set_choices(choices);
    }

    /// Drain queued change notifications, oldest first.
    pub fn take_changes(&mut self) -> Vec<ChangeEvent> {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn turn_on_limited_width(&mut self) {
        let flags = self.model.flags() | FieldFlags::LIMITED_WIDTH;
        self.model.set_flags(flags);
    }

    /// Override the limited-width column budget.
    pub fn set_limited_columns(&mut self, columns: usize) {
        self.limited_columns = columns;
    }

    #[must_use]
    pub fn is_limited_width(&self) -> bool {
        self.model.flags().contains(FieldFlags::LIMITED_WIDTH)
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn display_value(&self) -> String {
        let choices = self.model.choices();
        let parts: Vec<String> = self
            .model
            .value()
            .iter()
            .map(|v| match choices.label_for(v) {
                Some(label) => label.to_string(),
                None => v.to_string(),
            })
            .collect();
        if parts.is_empty() {
            "-".to_string()
        } else {
            parts.join(", ")
        }
    }
}

impl Editable for FieldWidget {
    fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
    }

    fn is_editing(&self) -> bool {
        self.editing
    }
}

impl Widget for FieldWidget {
    fn render_line(&self, width: usize) -> String {
        if !self.visible {
            return String::new();
        }
        let flags = self.model.flags();
        let mut line = String::new();
        if flags.contains(FieldFlags::SHOW_LABEL) && !self.model.label().is_empty() {
            line.push_str(self.model.label());
            line.push_str(": ");
        }
        line.push_str(&self.display_value());
        if flags.contains(FieldFlags::SHOW_VALIDATION_ISSUES)
            && let Some(issue) = self.model.issues().first()
        {
            line.push_str(" ⚠ ");
            line.push_str(&issue.format_message());
        }
        let width = if self.is_limited_width() {
            width.min(self.limited_columns)
        } else {
            width
        };
        fit_to_width(&line, width)
    }
}
