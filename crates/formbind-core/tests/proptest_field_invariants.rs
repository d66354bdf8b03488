//! Property-based invariant tests for field models.
//!
//! 1. Non-negative integer fields never hold a negative value.
//! 2. Bounded integer fields always hold a value inside their bounds.
//! 3. A field that hides validation issues never stores an out-of-choice value.
//! 4. A field that shows validation issues stores every write and reports
//!    validity exactly when the value is a declared choice.

use formbind_core::{Choice, FieldFlags, FieldModel, FormError, IntBounds, Value};
use proptest::prelude::*;

fn hour_choices() -> Vec<Choice> {
    (0..24i64).map(|h| Choice::new(format!("{h:02}"), h)).collect()
}

proptest! {
    #[test]
    fn non_negative_never_negative(seed in 0i64..100, n in any::<i64>()) {
        let mut field = FieldModel::integer("Every", IntBounds::non_negative())
            .with_value(vec![Value::Int(seed)]);
        field.set_value(vec![Value::Int(n)]).unwrap();
        let stored = field.first().and_then(Value::as_int).unwrap();
        prop_assert!(stored >= 0);
        if n < 0 {
            prop_assert_eq!(stored, 0);
        } else {
            prop_assert_eq!(stored, n);
        }
    }

    #[test]
    fn bounded_integer_stays_in_bounds(min in -50i64..0, span in 0i64..100, n in any::<i64>()) {
        let max = min + span;
        let mut field = FieldModel::integer("n", IntBounds::between(min, max))
            .with_value(vec![Value::Int(min)]);
        field.set_value(vec![Value::Int(n)]).unwrap();
        let stored = field.first().and_then(Value::as_int).unwrap();
        prop_assert!((min..=max).contains(&stored));
    }

    #[test]
    fn hidden_issues_keep_choice_membership(writes in prop::collection::vec(-5i64..30, 1..20)) {
        let mut field = FieldModel::enumerated("", hour_choices())
            .with_flags(FieldFlags::LIMITED_WIDTH)
            .with_value(vec![Value::Int(0)]);
        for w in writes {
            let result = field.set_value(vec![Value::Int(w)]);
            if (0..24).contains(&w) {
                prop_assert!(result.is_ok());
            } else {
                let is_validation = matches!(result, Err(FormError::Validation { .. }));
                prop_assert!(is_validation);
            }
            let stored = field.first().and_then(Value::as_int).unwrap();
            prop_assert!((0..24).contains(&stored));
            prop_assert!(field.is_valid());
        }
    }

    #[test]
    fn shown_issues_track_validity(w in -5i64..30) {
        let mut field = FieldModel::enumerated("Hour", hour_choices())
            .with_value(vec![Value::Int(0)]);
        prop_assert!(field.set_value(vec![Value::Int(w)]).is_ok());
        prop_assert_eq!(field.value(), &[Value::Int(w)][..]);
        prop_assert_eq!(field.is_valid(), (0..24).contains(&w));
    }
}
