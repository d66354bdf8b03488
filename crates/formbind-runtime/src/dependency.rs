#![forbid(unsafe_code)]

//! Declarative cross-field dependency rules.
//!
//! A [`DependencyRule`] says: when `trigger`'s value satisfies `predicate`,
//! apply `effect` to every region in `affected`, otherwise apply the inverse.
//! Rules live in a [`DependencyTable`] and are resolved by one dispatcher,
//! so the relationships can be inspected and tested without a live form.
//!
//! # Invariants
//!
//! 1. **Registration order**: rules are evaluated in the order they were
//!    registered, including rules that share a trigger.
//! 2. **Last registered wins**: when several rules target the same region and
//!    property, the rule registered last decides, regardless of which trigger
//!    changed. [`DependencyTable::resolve`] re-evaluates the whole table.
//! 3. **Idempotence**: resolving twice with the same values yields the same
//!    states.

use std::collections::BTreeMap;

use formbind_core::Value;

/// Condition over a trigger region's value sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// First element is truthy.
    Truthy,
    /// Missing or falsy first element.
    Falsy,
    /// First element equals the value.
    Equals(Value),
    /// First element is one of the values.
    OneOf(Vec<Value>),
    /// Arbitrary test over the whole sequence.
    Custom(fn(&[Value]) -> bool),
}

impl Predicate {
    #[must_use]
    pub fn holds(&self, values: &[Value]) -> bool {
        let first = values.first();
        match self {
            Self::Truthy => first.is_some_and(Value::is_truthy),
            Self::Falsy => !first.is_some_and(Value::is_truthy),
            Self::Equals(v) => first == Some(v),
            Self::OneOf(vs) => first.is_some_and(|f| vs.contains(f)),
            Self::Custom(f) => f(values),
        }
    }
}

/// What a rule does to its affected regions when its predicate holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    Show,
    Hide,
    Enable,
    Disable,
}

impl Effect {
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Show => Self::Hide,
            Self::Hide => Self::Show,
            Self::Enable => Self::Disable,
            Self::Disable => Self::Enable,
        }
    }

    fn apply(self, state: &mut RegionState) {
        match self {
            Self::Show => state.visible = true,
            Self::Hide => state.visible = false,
            Self::Enable => state.enabled = true,
            Self::Disable => state.enabled = false,
        }
    }
}

/// Visibility and enablement of one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionState {
    pub visible: bool,
    pub enabled: bool,
}

impl Default for RegionState {
    fn default() -> Self {
        Self {
            visible: true,
            enabled: true,
        }
    }
}

/// One trigger → effect relationship.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyRule {
    trigger: String,
    predicate: Predicate,
    affected: Vec<String>,
    effect: Effect,
}

impl DependencyRule {
    pub fn new<S: Into<String>>(
        trigger: impl Into<String>,
        predicate: Predicate,
        affected: impl IntoIterator<Item = S>,
        effect: Effect,
    ) -> Self {
        Self {
            trigger: trigger.into(),
            predicate,
            affected: affected.into_iter().map(Into::into).collect(),
            effect,
        }
    }

    /// Shorthand: show `affected` while `trigger` is truthy, hide otherwise.
    pub fn show_when_truthy<S: Into<String>>(
        trigger: impl Into<String>,
        affected: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(trigger, Predicate::Truthy, affected, Effect::Show)
    }

    #[must_use]
    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    #[must_use]
    pub fn affected(&self) -> &[String] {
        &self.affected
    }

    #[must_use]
    pub fn effect(&self) -> Effect {
        self.effect
    }

    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// The effect this rule applies for the given trigger value.
    #[must_use]
    pub fn effect_for(&self, values: &[Value]) -> Effect {
        if self.predicate.holds(values) {
            self.effect
        } else {
            self.effect.inverse()
        }
    }
}

/// Ordered set of rules for one form variant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyTable {
    rules: Vec<DependencyRule>,
}

impl DependencyTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, rule: DependencyRule) {
        self.rules.push(rule);
    }

    #[must_use]
    pub fn rules(&self) -> &[DependencyRule] {
        &self.rules
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether any rule listens to `region`.
    #[must_use]
    pub fn is_trigger(&self, region: &str) -> bool {
        self.rules.iter().any(|r| r.trigger == region)
    }

    /// Rules triggered by `region`, in registration order.
    pub fn rules_for<'a>(&'a self, region: &'a str) -> impl Iterator<Item = &'a DependencyRule> {
        self.rules.iter().filter(move |r| r.trigger == region)
    }

    /// Evaluate every rule and return the resulting state of each affected
    /// region. Rules whose trigger has no value source are skipped.
    pub fn resolve<'v>(
        &self,
        values: impl Fn(&str) -> Option<&'v [Value]>,
    ) -> BTreeMap<String, RegionState> {
        let mut states: BTreeMap<String, RegionState> = BTreeMap::new();
        for rule in &self.rules {
            let Some(trigger_values) = values(&rule.trigger) else {
                continue;
            };
            let effect = rule.effect_for(trigger_values);
            for region in &rule.affected {
                effect.apply(states.entry(region.clone()).or_default());
            }
        }
        states
    }
}
