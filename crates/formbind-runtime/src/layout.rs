#![forbid(unsafe_code)]

//! Declarative form variants.
//!
//! A [`FormLayout`] lists the regions of one form variant in visual order and
//! the dependency rules between them. Each [`RegionSpec`] fixes which backing
//! record attribute the region reads and writes, and how a field model is
//! built for it.

use std::collections::HashSet;

use formbind_core::{
    Choice, Choices, FieldFlags, FieldKind, FieldModel, FormError, FormResult, IntBounds, Record,
    Value,
};

use crate::dependency::{DependencyRule, DependencyTable};

/// Where a region's choice list comes from.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ChoiceSource {
    /// Any value of the field kind is accepted.
    #[default]
    None,
    /// A fixed list known when the layout is declared.
    Static(Vec<Choice>),
    /// Fetched from a [`ChoiceProvider`](crate::ChoiceProvider) under this key at show time.
    Provider(String),
}

/// One named region and its attribute mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSpec {
    name: String,
    attribute: String,
    label: String,
    kind: FieldKind,
    choices: ChoiceSource,
    flags: FieldFlags,
    bounds: IntBounds,
    default: Vec<Value>,
    limited_width: bool,
}

impl RegionSpec {
    /// A region whose attribute name equals its region name.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            attribute: name.clone(),
            name,
            label: String::new(),
            kind,
            choices: ChoiceSource::None,
            flags: FieldFlags::default(),
            bounds: IntBounds::default(),
            default: Vec::new(),
            limited_width: false,
        }
    }

    #[must_use]
    pub fn attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = attribute.into();
        self
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = ChoiceSource::Static(choices);
        self
    }

    #[must_use]
    pub fn provider(mut self, key: impl Into<String>) -> Self {
        self.choices = ChoiceSource::Provider(key.into());
        self
    }

    #[must_use]
    pub fn flags(mut self, flags: FieldFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn bounds(mut self, bounds: IntBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Value used when the record lacks the attribute.
    #[must_use]
    pub fn default_value(mut self, value: Vec<Value>) -> Self {
        self.default = value;
        self
    }

    #[must_use]
    pub fn limited_width(mut self) -> Self {
        self.limited_width = true;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn attribute_name(&self) -> &str {
        &self.attribute
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    #[must_use]
    pub fn choice_source(&self) -> &ChoiceSource {
        &self.choices
    }

    #[must_use]
    pub fn is_limited_width(&self) -> bool {
        self.limited_width
    }

    /// Read this region's value sequence out of `record`.
    ///
    /// Multi-valued kinds unpack a [`Value::List`]; single-valued kinds wrap
    /// the attribute in a one-element sequence. A missing attribute yields the
    /// region default.
    #[must_use]
    pub fn seed(&self, record: &Record) -> Vec<Value> {
        match record.get(&self.attribute) {
            None => self.default.clone(),
            Some(Value::List(items)) if self.kind.is_multi() => items.clone(),
            Some(v) => vec![v.clone()],
        }
    }

    /// Write `values` into `record` under this region's attribute.
    ///
    /// An empty single-valued region removes the attribute.
    pub fn store(&self, values: &[Value], record: &mut Record) {
        if self.kind.is_multi() {
            record.set(self.attribute.clone(), Value::List(values.to_vec()));
            return;
        }
        match values.first() {
            Some(v) => {
                record.set(self.attribute.clone(), v.clone());
            }
            None => {
                record.remove(&self.attribute);
            }
        }
    }

    /// Build the field model, seeded from `record`, with the resolved choices.
    #[must_use]
    pub fn model(&self, record: &Record, choices: Choices) -> FieldModel {
        FieldModel::new(self.label.clone(), self.kind)
            .with_flags(self.flags)
            .with_bounds(self.bounds)
            .with_choices(choices)
            .with_value(self.seed(record))
    }
}

/// Regions plus dependency rules for one form variant.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormLayout {
    name: String,
    regions: Vec<RegionSpec>,
    rules: DependencyTable,
}

impl FormLayout {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn region(mut self, spec: RegionSpec) -> Self {
        self.regions.push(spec);
        self
    }

    #[must_use]
    pub fn rule(mut self, rule: DependencyRule) -> Self {
        self.rules.register(rule);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Regions in visual order.
    #[must_use]
    pub fn regions(&self) -> &[RegionSpec] {
        &self.regions
    }

    #[must_use]
    pub fn rules(&self) -> &DependencyTable {
        &self.rules
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&RegionSpec> {
        self.regions.iter().find(|r| r.name == name)
    }

    /// Check that region names are unique and that every rule names
    /// declared regions.
    ///
    /// # Errors
    ///
    /// [`FormError::IllegalState`] on a duplicate region name,
    /// [`FormError::UnknownRegion`] for a rule naming an undeclared region.
    pub fn validate(&self) -> FormResult<()> {
        let mut seen = HashSet::new();
        for region in &self.regions {
            if !seen.insert(region.name.as_str()) {
                return Err(FormError::illegal_state(format!(
                    "layout {} declares region {} twice",
                    self.name, region.name
                )));
            }
        }
        for rule in self.rules.rules() {
            let names = std::iter::once(rule.trigger()).chain(rule.affected().iter().map(String::as_str));
            for name in names {
                if !seen.contains(name) {
                    return Err(FormError::UnknownRegion(name.to_string()));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> RegionSpec {
        RegionSpec::new("deliveryIds", FieldKind::EnumMulti).provider("deliveryMethods")
    }

    #[test]
    fn seed_single_and_multi() {
        let record = Record::new()
            .attr("isScheduled", true)
            .attr("deliveryIds", vec!["a", "b"]);
        let radio = RegionSpec::new("isScheduled", FieldKind::BooleanRadio);
        assert_eq!(radio.seed(&record), vec![Value::Bool(true)]);
        assert_eq!(ids().seed(&record), vec![Value::text("a"), Value::text("b")]);
    }

    #[test]
    fn seed_missing_uses_default() {
        let spec = RegionSpec::new("scheduleInterval", FieldKind::Integer).default_value(vec![Value::Int(1)]);
        assert_eq!(spec.seed(&Record::new()), vec![Value::Int(1)]);
        assert!(ids().seed(&Record::new()).is_empty());
    }

    #[test]
    fn store_round_trips() {
        let mut record = Record::new().attr("scheduleUnit", "days").attr("deliveryIds", vec!["x"]);
        let unit = RegionSpec::new("scheduleUnit", FieldKind::EnumSingle);
        let before = record.clone();
        unit.store(&unit.seed(&before), &mut record);
        ids().store(&ids().seed(&before), &mut record);
        assert_eq!(record, before);
    }

    #[test]
    fn store_empty_single_removes() {
        let mut record = Record::new().attr("scheduleTime", "09:00");
        let spec = RegionSpec::new("scheduleTime", FieldKind::Text);
        spec.store(&[], &mut record);
        assert!(!record.contains("scheduleTime"));
    }

    #[test]
    fn attribute_mapping_can_differ_from_region_name() {
        let spec = RegionSpec::new("hoursPicker", FieldKind::EnumSingle).attribute("hours");
        let mut record = Record::new();
        spec.store(&[Value::Int(7)], &mut record);
        assert_eq!(record.get("hours"), Some(&Value::Int(7)));
        assert_eq!(spec.name(), "hoursPicker");
    }

    #[test]
    fn model_validates_seeded_value() {
        let spec = RegionSpec::new("unit", FieldKind::EnumSingle)
            .choices(vec![Choice::new("Days", "days")]);
        let record = Record::new().attr("unit", "weeks");
        let choices = match spec.choice_source() {
            ChoiceSource::Static(c) => Choices::Fixed(c.clone()),
            _ => Choices::Unrestricted,
        };
        let model = spec.model(&record, choices);
        assert!(!model.is_valid());
        assert_eq!(model.value(), &[Value::text("weeks")]);
    }

    #[test]
    fn validate_rejects_duplicates_and_unknown_regions() {
        let dup = FormLayout::new("dup")
            .region(RegionSpec::new("a", FieldKind::Text))
            .region(RegionSpec::new("a", FieldKind::Text));
        assert!(matches!(dup.validate(), Err(FormError::IllegalState(_))));

        let unknown = FormLayout::new("unknown")
            .region(RegionSpec::new("a", FieldKind::BooleanRadio))
            .rule(DependencyRule::show_when_truthy("a", ["b"]));
        assert_eq!(unknown.validate(), Err(FormError::UnknownRegion("b".into())));

        let ok = FormLayout::new("ok")
            .region(RegionSpec::new("a", FieldKind::BooleanRadio))
            .region(RegionSpec::new("b", FieldKind::Text))
            .rule(DependencyRule::show_when_truthy("a", ["b"]));
        assert!(ok.validate().is_ok());
    }
}
