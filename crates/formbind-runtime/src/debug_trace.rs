#![forbid(unsafe_code)]

//! Opt-in stderr tracing for form lifecycles.
//!
//! Set `FORMBIND_DEBUG_TRACE=1` (or `true`) to print timestamped lines for
//! show/extract/teardown and dependency dispatch. The flag is read once.
//!
//! ```ignore
//! use formbind_runtime::debug_trace;
//! debug_trace!("dispatch: region={}", region);
//! ```

use std::sync::LazyLock;
use std::time::Instant;

static ENABLED: LazyLock<bool> = LazyLock::new(|| {
    std::env::var("FORMBIND_DEBUG_TRACE")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
});

static START: LazyLock<Instant> = LazyLock::new(Instant::now);

#[inline]
pub fn is_enabled() -> bool {
    *ENABLED
}

/// Milliseconds since the first trace call.
#[inline]
pub fn elapsed_ms() -> u64 {
    START.elapsed().as_millis() as u64
}

/// Print a timestamped line to stderr when `FORMBIND_DEBUG_TRACE` is set.
#[macro_export]
macro_rules! debug_trace {
    ($($arg:tt)*) => {
        if $crate::debug_trace::is_enabled() {
            eprintln!(
                "[formbind {:>8}ms] {}",
                $crate::debug_trace::elapsed_ms(),
                format_args!($($arg)*)
            );
        }
    };
}
