//! Property-based invariant tests for the result-form registry and theme conversion.
//!
//! 1. Exactly one "All Fields" entry after any sequence of replace/remove.
//! 2. "All Fields" is always the last entry.
//! 3. Removing "All Fields" is always refused and changes nothing.
//! 4. Zoom scale stays within [1, 100] for any finite font size.
//! 5. Zoom scale is monotonic in font size.

use formbind_core::FormError;
use formbind_extras::result_forms::{ALL_FIELDS_ID, ResultFormRegistry, ResultTemplate};
use formbind_extras::theme::zoom_scale;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Replace(Vec<String>),
    Remove(String),
}

fn id_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "rf-[0-9]{1,2}",
        1 => Just(ALL_FIELDS_ID.to_string()),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::collection::vec(id_strategy(), 0..6).prop_map(Op::Replace),
        id_strategy().prop_map(Op::Remove),
    ]
}

proptest! {
    // 1 + 2 + 3
    #[test]
    fn all_fields_survives(ops in prop::collection::vec(op_strategy(), 0..24)) {
        let mut registry = ResultFormRegistry::new();
        for op in ops {
            match op {
                Op::Replace(ids) => registry.replace_all(
                    ids.into_iter().map(|id| ResultTemplate::new(id.clone(), format!("Form {id}"))),
                ),
                Op::Remove(id) if id == ALL_FIELDS_ID => {
                    let before = registry.clone();
                    let refused = matches!(registry.remove_by_id(&id), Err(FormError::IllegalState(_)));
                    prop_assert!(refused);
                    prop_assert_eq!(&registry, &before);
                }
                Op::Remove(id) => {
                    prop_assert!(registry.remove_by_id(&id).is_ok());
                }
            }
            let count = registry.list().iter().filter(|d| d.id == ALL_FIELDS_ID).count();
            prop_assert_eq!(count, 1);
            prop_assert_eq!(registry.list().last().map(|d| d.id.as_str()), Some(ALL_FIELDS_ID));
        }
    }

    // 4
    #[test]
    fn zoom_in_bounds(size in -1.0e6f64..1.0e6) {
        let z = zoom_scale(size);
        prop_assert!((1..=100).contains(&z));
    }

    // 5
    #[test]
    fn zoom_monotonic(a in 0.0f64..64.0, b in 0.0f64..64.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(zoom_scale(lo) <= zoom_scale(hi));
    }
}
