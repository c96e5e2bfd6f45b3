//! Debug-only diagnostics.
//!
//! Narrowing conversions and kind-asserting accessors report through
//! `tracing` when `debug_assertions` are on. They never panic and release
//! builds compile the check away.

macro_rules! debug_diagnostic {
    ($($arg:tt)*) => {
        if cfg!(debug_assertions) {
            ::tracing::warn!(target: "attr_core::diagnostic", $($arg)*);
        }
    };
}
