#![forbid(unsafe_code)]

//! Delivery-schedule forms.
//!
//! Three variants of one [`CompositeForm`](formbind_runtime::CompositeForm)
//! shape, each gated by a "Delivery Schedule" radio:
//!
//! - [`fixed_clock_layout`]: hour and minute pickers
//! - [`time_of_day_layout`]: free-form time of day
//! - [`interval_layout`]: every N units between a start and an end
//!
//! The delivery-method picker is always visible. Its choices come from the
//! user's [`UserPreferences`] under [`DELIVERY_METHODS_KEY`].

use formbind_core::{Choice, FieldFlags, FieldKind, IntBounds, Record, Value};
use formbind_runtime::{ChoiceFetch, ChoiceProvider, DependencyRule, FormLayout, RegionSpec};
use time::OffsetDateTime;

use crate::repetition::RepetitionUnit;

/// Tag carried by delivery records.
pub const DELIVERY_TAG: &str = "delivery";
pub const USER_ID: &str = "userId";
pub const IS_SCHEDULED: &str = "isScheduled";
pub const SCHEDULE_INTERVAL: &str = "scheduleInterval";
pub const SCHEDULE_UNIT: &str = "scheduleUnit";
pub const SCHEDULE_START: &str = "scheduleStart";
pub const SCHEDULE_END: &str = "scheduleEnd";
pub const DELIVERY_IDS: &str = "deliveryIds";

/// Attributes used only by the fixed-clock variant.
pub const DELIVERY_SCHEDULED: &str = "deliveryScheduled";
pub const HOURS: &str = "hours";
pub const MINUTES: &str = "minutes";
/// Attribute used only by the time-of-day variant.
pub const SCHEDULE_TIME: &str = "scheduleTime";

/// Provider key for the user's delivery methods.
pub const DELIVERY_METHODS_KEY: &str = "deliveryMethods";

/// Region names shared by the variants.
pub const REGION_SCHEDULE: &str = "deliverySchedule";
pub const REGION_DELIVERY: &str = "deliveryPicker";

/// One configured recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DeliveryMethod {
    pub name: String,
    pub delivery_id: String,
}

impl DeliveryMethod {
    pub fn new(name: impl Into<String>, delivery_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            delivery_id: delivery_id.into(),
        }
    }

    fn choice(&self) -> Choice {
        Choice::new(self.name.clone(), self.delivery_id.clone()).with_class("")
    }
}

/// The slice of user preferences a delivery form reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPreferences {
    delivery_methods: Vec<DeliveryMethod>,
}

impl UserPreferences {
    #[must_use]
    pub fn new(delivery_methods: Vec<DeliveryMethod>) -> Self {
        Self { delivery_methods }
    }

    #[must_use]
    pub fn delivery_methods(&self) -> &[DeliveryMethod] {
        &self.delivery_methods
    }
}

impl ChoiceProvider for UserPreferences {
    fn fetch(&self, key: &str) -> ChoiceFetch {
        if key != DELIVERY_METHODS_KEY {
            return ChoiceFetch::Deferred;
        }
        ChoiceFetch::Ready(self.delivery_methods.iter().map(DeliveryMethod::choice).collect())
    }
}

fn schedule_radio(attribute: &str) -> RegionSpec {
    RegionSpec::new(REGION_SCHEDULE, FieldKind::BooleanRadio)
        .attribute(attribute)
        .label("Delivery Schedule")
        .choices(vec![
            Choice::new("Immediately", false).with_title("Place Orders Immediately"),
            Choice::new("At a schedule time", true).with_title("Run Orders at a future time"),
        ])
        .default_value(vec![Value::Bool(false)])
        .limited_width()
}

fn clock_picker(name: &str, attribute: &str, count: i64) -> RegionSpec {
    RegionSpec::new(name, FieldKind::EnumSingle)
        .attribute(attribute)
        .choices((0..count).map(|n| Choice::new(format!("{n:02}"), n)).collect())
        .flags(FieldFlags::FILTERABLE)
        .default_value(vec![Value::Int(0)])
        .limited_width()
}

fn delivery_picker() -> RegionSpec {
    RegionSpec::new(REGION_DELIVERY, FieldKind::EnumMulti)
        .attribute(DELIVERY_IDS)
        .label("Delivery Method")
        .provider(DELIVERY_METHODS_KEY)
        .flags(FieldFlags::SHOW_LABEL)
        .limited_width()
}

/// Radio, hour picker (00-23), minute picker (00-59), delivery methods.
#[must_use]
pub fn fixed_clock_layout() -> FormLayout {
    FormLayout::new("query-delivery-schedule")
        .region(schedule_radio(DELIVERY_SCHEDULED))
        .region(clock_picker("hoursPicker", HOURS, 24))
        .region(clock_picker("minutesPicker", MINUTES, 60))
        .region(delivery_picker())
        .rule(DependencyRule::show_when_truthy(
            REGION_SCHEDULE,
            ["hoursPicker", "minutesPicker"],
        ))
}

/// Radio, free-form time of day, delivery methods.
#[must_use]
pub fn time_of_day_layout() -> FormLayout {
    FormLayout::new("query-delivery-time")
        .region(schedule_radio(IS_SCHEDULED))
        .region(
            RegionSpec::new("timePicker", FieldKind::Time)
                .attribute(SCHEDULE_TIME)
                .label("Time")
                .limited_width(),
        )
        .region(delivery_picker())
        .rule(DependencyRule::show_when_truthy(REGION_SCHEDULE, ["timePicker"]))
}

/// Radio, interval amount and unit, start and end, delivery methods.
#[must_use]
pub fn interval_layout() -> FormLayout {
    let units = RepetitionUnit::ALL
        .iter()
        .map(|u| Choice::new(u.label(), u.name()))
        .collect();
    FormLayout::new("query-delivery-interval")
        .region(schedule_radio(IS_SCHEDULED))
        .region(
            RegionSpec::new("intervalPicker", FieldKind::Integer)
                .attribute(SCHEDULE_INTERVAL)
                .label("Every")
                .bounds(IntBounds::non_negative())
                .default_value(vec![Value::Int(1)])
                .limited_width(),
        )
        .region(
            RegionSpec::new("unitPicker", FieldKind::EnumSingle)
                .attribute(SCHEDULE_UNIT)
                .label("Unit")
                .choices(units)
                .default_value(vec![Value::text(RepetitionUnit::Days.name())])
                .limited_width(),
        )
        .region(
            RegionSpec::new("startPicker", FieldKind::DateTime)
                .attribute(SCHEDULE_START)
                .label("Starting"),
        )
        .region(
            RegionSpec::new("endPicker", FieldKind::DateTime)
                .attribute(SCHEDULE_END)
                .label("Ending"),
        )
        .region(delivery_picker())
        .rule(DependencyRule::show_when_truthy(
            REGION_SCHEDULE,
            ["intervalPicker", "unitPicker", "startPicker", "endPicker"],
        ))
}

/// Cron preview for an interval-variant record, when it is scheduled and
/// names a unit and a start.
#[must_use]
pub fn cron_preview(record: &Record) -> Option<String> {
    if !record.get(IS_SCHEDULED).is_some_and(Value::is_truthy) {
        return None;
    }
    let unit: RepetitionUnit = record.get(SCHEDULE_UNIT)?.as_str()?.parse().ok()?;
    let start: OffsetDateTime = match record.get(SCHEDULE_START)? {
        Value::DateTime(dt) => *dt,
        _ => return None,
    };
    Some(unit.cron_for_start(start))
}
