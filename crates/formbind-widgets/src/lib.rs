#![forbid(unsafe_code)]

//! Field widgets for formbind.
//!
//! A widget wraps one [`FieldModel`](formbind_core::FieldModel) and adds the
//! interactive state a form controller coordinates: edit mode, visibility,
//! and a queue of change notifications.

pub mod field_widget;
pub mod relative_time;

pub use field_widget::{ChangeEvent, ChangeOrigin, FieldWidget, LIMITED_WIDTH_COLUMNS};
pub use relative_time::{RelativeTime, RelativeTimeChange, RelativeTimeInput, RelativeUnit};

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A widget that renders itself as one line of text.
pub trait Widget {
    /// Render into at most `width` display columns.
    fn render_line(&self, width: usize) -> String;
}

/// A widget that can be switched between editable and read-only.
///
/// Implementations must be idempotent: turning editing on twice is the same
/// as turning it on once.
pub trait Editable {
    fn set_editing(&mut self, editing: bool);

    fn is_editing(&self) -> bool;

    fn turn_on_editing(&mut self) {
        self.set_editing(true);
    }

    fn turn_off_editing(&mut self) {
        self.set_editing(false);
    }
}

/// Truncate `text` to `max_width` columns, ending with `…` when cut.
///
/// Never splits a grapheme cluster.
#[must_use]
pub fn fit_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    const ELLIPSIS: &str = "…";
    let budget = max_width.saturating_sub(ELLIPSIS.width());
    let mut out = String::new();
    let mut used = 0;
    for g in text.graphemes(true) {
        let w = g.width();
        if used + w > budget {
            break;
        }
        out.push_str(g);
        used += w;
    }
    if max_width > 0 {
        out.push_str(ELLIPSIS);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_short_text_unchanged() {
        assert_eq!(fit_to_width("09", 4), "09");
    }

    #[test]
    fn fit_truncates_with_ellipsis() {
        assert_eq!(fit_to_width("Delivery Method", 6), "Deliv…");
        assert_eq!(fit_to_width("Delivery Method", 6).width(), 6);
    }

    #[test]
    fn fit_respects_wide_graphemes() {
        let out = fit_to_width("配信方法です", 6);
        assert!(out.width() <= 6);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn fit_zero_width_is_empty() {
        assert_eq!(fit_to_width("abc", 0), "");
    }
}
