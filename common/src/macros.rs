//! Logging shorthands.
//!
//! Every macro forwards to `tracing` under a `cfgmap::*` target so the CLI
//! formatter can pick the right status symbol.

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "cfgmap::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "cfgmap::info", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        ::tracing::warn!(target: "cfgmap::warn", $($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        ::tracing::error!(target: "cfgmap::error", $($arg)*)
    };
}
