//! Structured logging with invocation context.
//!
//! Provides logging macros and utilities that include the run id and the
//! target locator in every log message for easy correlation.

pub mod structured;

pub use structured::*;

/// Install `env_logger` as the `log` backend.
///
/// Only the binary calls this. The library itself never installs a
/// logger; repeated calls are harmless.
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .try_init();
}
