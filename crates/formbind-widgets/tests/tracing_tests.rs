#![forbid(unsafe_code)]

//! Widget logging integration tests.
//!
//! Widget events enabled:
//!   cargo test -p formbind-widgets --features tracing --test tracing_tests
//!
//! Zero-overhead verification (no feature):
//!   cargo test -p formbind-widgets --test tracing_tests -- zero_overhead

use std::sync::{Arc, Mutex};

use formbind_core::{FieldKind, FieldModel, FormError, Value};
use formbind_widgets::{Editable, FieldWidget};
use tracing_subscriber::layer::SubscriberExt;

#[derive(Debug, Clone)]
#[allow(dead_code)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: Vec<(String, String)>,
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push((field.name().to_string(), format!("{value:?}")));
        }
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor {
            message: String::new(),
            fields: Vec::new(),
        };
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

fn capture<R>(f: impl FnOnce() -> R) -> (R, Vec<CapturedEvent>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(EventCapture {
        events: Arc::clone(&events),
    });
    let result = tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    (result, captured)
}

fn note() -> FieldWidget {
    FieldWidget::new(FieldModel::new("Note", FieldKind::Text).with_value(vec![Value::text("a")]))
}

#[cfg(feature = "tracing")]
#[test]
fn refused_input_is_logged() {
    let mut widget = note();
    let (result, events) = capture(|| widget.input(vec![Value::text("b")]));
    assert!(matches!(result, Err(FormError::ReadOnly(_))));

    let refused = events
        .iter()
        .find(|e| e.message == "input refused")
        .expect("input refused event");
    assert_eq!(refused.level, tracing::Level::DEBUG);
    assert!(refused.fields.iter().any(|(k, v)| k == "field" && v == "Note"));
    assert!(refused.fields.iter().any(|(k, v)| k == "editing" && v == "false"));
}

#[cfg(feature = "tracing")]
#[test]
fn accepted_write_is_logged() {
    let mut widget = note();
    widget.turn_on_editing();
    let (result, events) = capture(|| widget.input(vec![Value::text("b")]));
    assert!(result.is_ok());

    let written = events
        .iter()
        .find(|e| e.message == "value written")
        .expect("value written event");
    assert!(written.fields.iter().any(|(k, v)| k == "origin" && v == "User"));
}

#[test]
fn zero_overhead_without_feature() {
    let mut widget = note();
    let (_, events) = capture(|| {
        widget.set_value(vec![Value::text("b")]).unwrap();
        let _ = widget.input(vec![Value::text("c")]);
    });
    if formbind_core::logging::enabled() {
        assert!(!events.is_empty());
    } else {
        assert!(events.is_empty());
    }
}
