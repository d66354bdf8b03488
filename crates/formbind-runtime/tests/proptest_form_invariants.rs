//! Property-based invariant tests for the form controller and rule dispatcher.
//!
//! 1. Round trip: extracting an unedited form reproduces every declared attribute.
//! 2. Non-negative integer regions never hold a negative value after any write.
//! 3. Trigger idempotence: writing the same trigger value twice leaves the same
//!    visibility as writing it once.
//! 4. Exactness: a falsy trigger hides exactly the rule's affected regions.
//! 5. Resolution is a pure function of the trigger values.

use formbind_core::{Choice, FieldKind, IntBounds, Record, Value};
use formbind_runtime::{
    CompositeForm, DependencyRule, DependencyTable, Effect, FormLayout, NoChoices, Predicate,
    RegionSpec,
};
use proptest::prelude::*;
use std::collections::HashMap;

fn layout() -> FormLayout {
    FormLayout::new("props")
        .region(
            RegionSpec::new("on", FieldKind::BooleanRadio)
                .choices(vec![Choice::new("No", false), Choice::new("Yes", true)])
                .default_value(vec![Value::Bool(false)]),
        )
        .region(RegionSpec::new("count", FieldKind::Integer).bounds(IntBounds::non_negative()))
        .region(RegionSpec::new("note", FieldKind::Text))
        .region(RegionSpec::new("tags", FieldKind::EnumMulti))
        .rule(DependencyRule::show_when_truthy("on", ["count", "note"]))
}

fn shown(record: Record) -> CompositeForm {
    let mut form = CompositeForm::transient(layout(), record).unwrap();
    form.show(&NoChoices).unwrap();
    form
}

fn record_strategy() -> impl Strategy<Value = Record> {
    (
        any::<bool>(),
        0i64..10_000,
        "[a-z ]{0,12}",
        prop::collection::vec("[a-z]{1,4}", 0..4),
    )
        .prop_map(|(on, count, note, tags)| {
            Record::new()
                .attr("on", on)
                .attr("count", count)
                .attr("note", note)
                .attr("tags", tags)
        })
}

proptest! {
    // 1
    #[test]
    fn unedited_round_trip(record in record_strategy()) {
        let mut form = shown(record.clone());
        prop_assert_eq!(form.extract().unwrap(), &record);
    }

    // 2
    #[test]
    fn non_negative_after_writes(writes in prop::collection::vec(any::<i64>(), 1..16)) {
        let mut form = shown(Record::new());
        for n in writes {
            form.set_value("count", vec![Value::Int(n)]).unwrap();
            let v = form.region("count").unwrap().value()[0].as_int().unwrap();
            prop_assert!(v >= 0);
            prop_assert_eq!(v, n.max(0));
        }
    }

    // 3 + 4
    #[test]
    fn trigger_toggle_is_idempotent(sequence in prop::collection::vec(any::<bool>(), 1..12)) {
        let mut form = shown(Record::new());
        for on in sequence {
            form.input("on", vec![Value::Bool(on)]).unwrap();
            let once: Vec<_> = ["on", "count", "note", "tags"].iter().map(|r| form.is_visible(r)).collect();
            form.input("on", vec![Value::Bool(on)]).unwrap();
            let twice: Vec<_> = ["on", "count", "note", "tags"].iter().map(|r| form.is_visible(r)).collect();
            prop_assert_eq!(&once, &twice);
            prop_assert_eq!(once, vec![Some(true), Some(on), Some(on), Some(true)]);
        }
    }

    // 5
    #[test]
    fn resolve_is_deterministic(
        effects in prop::collection::vec((0usize..3, 0usize..3, any::<bool>(), 0usize..4), 0..10),
        values in prop::collection::vec(any::<bool>(), 3),
    ) {
        const ALL: [Effect; 4] = [Effect::Show, Effect::Hide, Effect::Enable, Effect::Disable];
        let mut table = DependencyTable::new();
        for (trigger, affected, truthy, effect) in effects {
            let predicate = if truthy { Predicate::Truthy } else { Predicate::Falsy };
            table.register(DependencyRule::new(
                format!("t{trigger}"),
                predicate,
                [format!("r{affected}")],
                ALL[effect],
            ));
        }
        let sources: HashMap<String, Vec<Value>> = values
            .iter()
            .enumerate()
            .map(|(i, b)| (format!("t{i}"), vec![Value::Bool(*b)]))
            .collect();
        let first = table.resolve(|k| sources.get(k).map(Vec::as_slice));
        let second = table.resolve(|k| sources.get(k).map(Vec::as_slice));
        prop_assert_eq!(first, second);
    }
}
