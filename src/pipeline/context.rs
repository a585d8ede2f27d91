//! Invocation context.
//!
//! Carries the run id and start time for one obfuscation call, for logging
//! and the audit summary.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::logging::structured::LogContext;

/// Context for a single obfuscation invocation.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
}

impl InvocationContext {
    pub fn new() -> Self {
        Self {
            run_id: format!("run-{}", &Uuid::new_v4().simple().to_string()[..8]),
            started_at: Utc::now(),
        }
    }

    /// Context with a caller-chosen id, for correlating with an outer
    /// request id.
    pub fn with_run_id(run_id: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            started_at: Utc::now(),
        }
    }

    pub fn log_context(&self) -> LogContext {
        LogContext::new(&self.run_id)
    }

    /// Milliseconds since the invocation started. Never negative.
    pub fn elapsed_ms(&self) -> u64 {
        (Utc::now() - self.started_at).num_milliseconds().max(0) as u64
    }
}

impl Default for InvocationContext {
    fn default() -> Self {
        Self::new()
    }
}
