#![forbid(unsafe_code)]

//! Feature-gated logging for field and validation code.
//!
//! With the `tracing` feature the `tracing` event macros are re-exported at the
//! crate root. Without it, macros with the same names expand to nothing, so
//! call sites such as `crate::warn!(field = %label, "write rejected")` compile
//! either way.

#[cfg(feature = "tracing")]
pub use tracing::{debug, info, trace, warn};

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// No-op `debug!` when tracing is disabled.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// No-op `info!` when tracing is disabled.
    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {};
    }

    /// No-op `trace!` when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// No-op `warn!` when tracing is disabled.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }
}

/// Whether field-level events are compiled in.
#[must_use]
pub const fn enabled() -> bool {
    cfg!(feature = "tracing")
}

#[cfg(test)]
mod tests {
    #[test]
    fn macros_accept_structured_fields() {
        let label = "Delivery Schedule";
        crate::debug!(field = %label, count = 3, "seeded");
        crate::trace!("plain message");
        crate::warn!(field = %label, "write rejected");
        crate::info!(?label);
    }

    #[test]
    fn enabled_matches_feature() {
        assert_eq!(super::enabled(), cfg!(feature = "tracing"));
    }
}
