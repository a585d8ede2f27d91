//! Structured logging utilities.
//!
//! Provides context-aware logging with the run id and target locator
//! included in every log message.

use std::fmt;

/// Logging context for a single obfuscation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogContext {
    pub run_id: String,
    pub locator: Option<String>,
}

impl LogContext {
    pub fn new(run_id: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            locator: None,
        }
    }

    pub fn with_locator(&self, locator: &str) -> Self {
        Self {
            run_id: self.run_id.clone(),
            locator: Some(locator.to_string()),
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.locator {
            Some(locator) => write!(f, "[run={}] [file={}]", self.run_id, locator),
            None => write!(f, "[run={}]", self.run_id),
        }
    }
}

/// Log an info message with context.
#[macro_export]
macro_rules! log_info {
    ($ctx:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        log::info!(
            concat!("{} {}" $(, " ", stringify!($key), "={:?}")*),
            $ctx,
            $event
            $(, $value)*
        )
    };
}

/// Log a warning message with context.
#[macro_export]
macro_rules! log_warn {
    ($ctx:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        log::warn!(
            concat!("{} {}" $(, " ", stringify!($key), "={:?}")*),
            $ctx,
            $event
            $(, $value)*
        )
    };
}

/// Log an error message with context.
#[macro_export]
macro_rules! log_error {
    ($ctx:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        log::error!(
            concat!("{} {}" $(, " ", stringify!($key), "={:?}")*),
            $ctx,
            $event
            $(, $value)*
        )
    };
}

/// Log a debug message with context.
#[macro_export]
macro_rules! log_debug {
    ($ctx:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        log::debug!(
            concat!("{} {}" $(, " ", stringify!($key), "={:?}")*),
            $ctx,
            $event
            $(, $value)*
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_context_display() {
        let ctx = LogContext::new("run-123");
        assert_eq!(format!("{}", ctx), "[run=run-123]");

        let ctx_with_file = ctx.with_locator("s3://bucket/data.csv");
        assert_eq!(
            format!("{}", ctx_with_file),
            "[run=run-123] [file=s3://bucket/data.csv]"
        );
    }

    #[test]
    fn test_macros_expand_with_and_without_pairs() {
        let ctx = LogContext::new("run-macro");
        crate::log_info!(ctx, "EVENT_ONLY");
        crate::log_debug!(ctx, "EVENT_PAIRS", rows = 3, name = "id");
        crate::log_warn!(&ctx, "EVENT_TRAILING", missing = vec!["x"],);
        crate::log_error!(ctx, "EVENT_ERR", cause = "boom");
    }
}
