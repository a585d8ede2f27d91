//! Obfuscation pipeline.
//!
//! Runs one request through five stages, stopping at the first failure:
//! 1. Format resolution (from the locator suffix)
//! 2. Fetch (locator parse + object read)
//! 3. Decode (bytes to table)
//! 4. Redact (mask PII columns)
//! 5. Encode (table back to bytes, same format)
//!
//! `Pipeline::run` returns the detailed result. `Pipeline::invoke` maps it to
//! the external response, where every stage failure is a status 400.

use std::fmt;
use std::io::Cursor;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{ConfigError, PipelineError};
use crate::format::resolver::resolve_format;
use crate::logging::structured::LogContext;
use crate::security::redactor::redact;
use crate::storage::fetcher::ObjectFetcher;
use crate::storage::locator::StorageLocator;
use crate::table::TableFormat;

use super::context::InvocationContext;
use super::request::ObfuscationRequest;

/// Pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    FormatResolution,
    Fetch,
    Decode,
    Redact,
    Encode,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::FormatResolution,
        Stage::Fetch,
        Stage::Decode,
        Stage::Redact,
        Stage::Encode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::FormatResolution => "format_resolution",
            Stage::Fetch => "fetch",
            Stage::Decode => "decode",
            Stage::Redact => "redact",
            Stage::Encode => "encode",
        }
    }

    /// Error line written when this stage fails. Log scrapers match on
    /// these exact strings. Redaction cannot fail, so it has none.
    pub fn failure_message(&self) -> Option<&'static str> {
        match self {
            Stage::FormatResolution => Some("Failed to retreive file format"),
            Stage::Fetch => Some("Failed to retreive file content"),
            Stage::Decode => Some("Failed to convert file content to df"),
            Stage::Redact => None,
            Stage::Encode => Some("Failed to convert file to byte stream"),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit record of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObfuscationSummary {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub format: String,
    pub rows: usize,
    pub columns: usize,
    pub redacted: Vec<String>,
    pub missing: Vec<String>,
    pub input_sha256: String,
    pub output_sha256: String,
    pub elapsed_ms: u64,
}

/// Encoded output of a successful run.
#[derive(Debug, Clone)]
pub struct Obfuscated {
    pub bytes: Vec<u8>,
    pub summary: ObfuscationSummary,
}

impl Obfuscated {
    /// Readable stream over the output, positioned at the start.
    pub fn into_cursor(self) -> Cursor<Vec<u8>> {
        Cursor::new(self.bytes)
    }
}

/// Failure body returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureResult {
    pub status: u16,
}

impl FailureResult {
    pub const BAD_REQUEST: u16 = 400;

    pub fn bad_request() -> Self {
        Self {
            status: Self::BAD_REQUEST,
        }
    }
}

/// External result of one invocation.
#[derive(Debug)]
pub enum ObfuscationResponse {
    Redacted(Cursor<Vec<u8>>),
    Failed(FailureResult),
}

impl ObfuscationResponse {
    pub fn is_redacted(&self) -> bool {
        matches!(self, ObfuscationResponse::Redacted(_))
    }

    pub fn failure(&self) -> Option<&FailureResult> {
        match self {
            ObfuscationResponse::Failed(result) => Some(result),
            ObfuscationResponse::Redacted(_) => None,
        }
    }
}

/// Receives pipeline progress. All methods but `stage_failed` default to
/// no-ops.
pub trait PipelineObserver {
    fn pipeline_started(&self, _ctx: &LogContext, _request: &ObfuscationRequest) {}

    fn stage_completed(&self, _ctx: &LogContext, _stage: Stage) {}

    fn stage_failed(&self, ctx: &LogContext, error: &PipelineError);

    fn pipeline_completed(&self, _ctx: &LogContext, _summary: &ObfuscationSummary) {}
}

/// Observer that writes through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl PipelineObserver for LogObserver {
    fn pipeline_started(&self, ctx: &LogContext, request: &ObfuscationRequest) {
        crate::log_info!(ctx, "PIPELINE_START", pii_fields = request.pii_fields);
    }

    fn stage_completed(&self, ctx: &LogContext, stage: Stage) {
        crate::log_debug!(ctx, "STAGE_COMPLETE", stage = stage.as_str());
    }

    fn stage_failed(&self, ctx: &LogContext, error: &PipelineError) {
        match error.stage.failure_message() {
            Some(message) => log::error!(
                "{} {} stage={} error={}",
                ctx,
                message,
                error.stage,
                error.source
            ),
            None => crate::log_error!(
                ctx,
                "PIPELINE_FAILED",
                stage = error.stage.as_str(),
                error = error.source
            ),
        }
    }

    fn pipeline_completed(&self, ctx: &LogContext, summary: &ObfuscationSummary) {
        crate::log_info!(
            ctx,
            "OBFUSCATION_COMPLETE",
            format = summary.format,
            rows = summary.rows,
            columns = summary.columns,
            redacted = summary.redacted,
            missing = summary.missing,
            input_sha256 = summary.input_sha256,
            output_sha256 = summary.output_sha256,
            elapsed_ms = summary.elapsed_ms,
        );
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// One fetcher and one observer, shared by any number of runs.
pub struct Pipeline<'a> {
    fetcher: &'a dyn ObjectFetcher,
    observer: &'a dyn PipelineObserver,
}

impl<'a> Pipeline<'a> {
    pub fn new(fetcher: &'a dyn ObjectFetcher) -> Self {
        Self {
            fetcher,
            observer: &LogObserver,
        }
    }

    pub fn with_observer(fetcher: &'a dyn ObjectFetcher, observer: &'a dyn PipelineObserver) -> Self {
        Self { fetcher, observer }
    }

    /// Parse the input JSON and run it.
    ///
    /// Invalid input is the only `Err`. Any stage failure is reported to the
    /// observer and returned as `ObfuscationResponse::Failed`.
    pub fn invoke(&self, input_json: &str) -> Result<ObfuscationResponse, ConfigError> {
        let invocation = InvocationContext::new();

        let request = match ObfuscationRequest::parse(input_json) {
            Ok(request) => request,
            Err(e) => {
                crate::log_warn!(invocation.log_context(), "INPUT_INVALID", error = e.to_string());
                return Err(e);
            }
        };

        let response = match self.run(&request, &invocation) {
            Ok(obfuscated) => ObfuscationResponse::Redacted(obfuscated.into_cursor()),
            Err(_) => ObfuscationResponse::Failed(FailureResult::bad_request()),
        };
        Ok(response)
    }

    pub fn run(
        &self,
        request: &ObfuscationRequest,
        invocation: &InvocationContext,
    ) -> Result<Obfuscated, PipelineError> {
        let ctx = invocation
            .log_context()
            .with_locator(&request.file_to_obfuscate);
        self.observer.pipeline_started(&ctx, request);

        match self.run_stages(request, invocation, &ctx) {
            Ok(obfuscated) => {
                self.observer.pipeline_completed(&ctx, &obfuscated.summary);
                Ok(obfuscated)
            }
            Err(e) => {
                self.observer.stage_failed(&ctx, &e);
                Err(e)
            }
        }
    }

    fn run_stages(
        &self,
        request: &ObfuscationRequest,
        invocation: &InvocationContext,
        ctx: &LogContext,
    ) -> Result<Obfuscated, PipelineError> {
        let tag = resolve_format(&request.file_to_obfuscate, ctx)
            .map_err(|e| PipelineError::new(Stage::FormatResolution, e))?;
        self.observer.stage_completed(ctx, Stage::FormatResolution);

        let input = StorageLocator::parse(&request.file_to_obfuscate)
            .and_then(|locator| self.fetcher.fetch(&locator))
            .map_err(|e| PipelineError::new(Stage::Fetch, e))?;
        self.observer.stage_completed(ctx, Stage::Fetch);
        let input_sha256 = sha256_hex(&input);

        // An unknown tag surfaces here, not at format resolution.
        let format = TableFormat::from_tag(&tag).map_err(|e| PipelineError::new(Stage::Decode, e))?;
        let table = format
            .decode(input)
            .map_err(|e| PipelineError::new(Stage::Decode, e))?;
        self.observer.stage_completed(ctx, Stage::Decode);

        let (redacted, report) = redact(&table, &request.pii_fields, ctx);
        self.observer.stage_completed(ctx, Stage::Redact);

        let bytes = format
            .encode(&redacted)
            .map_err(|e| PipelineError::new(Stage::Encode, e))?;
        self.observer.stage_completed(ctx, Stage::Encode);

        let summary = ObfuscationSummary {
            run_id: invocation.run_id.clone(),
            started_at: invocation.started_at,
            format: format.as_str().to_string(),
            rows: redacted.num_rows(),
            columns: redacted.num_columns(),
            redacted: report.redacted,
            missing: report.missing,
            input_sha256,
            output_sha256: sha256_hex(&bytes),
            elapsed_ms: invocation.elapsed_ms(),
        };

        Ok(Obfuscated { bytes, summary })
    }
}

/// Run one invocation with the default log observer.
pub fn obfuscate(
    input_json: &str,
    fetcher: &dyn ObjectFetcher,
) -> Result<ObfuscationResponse, ConfigError> {
    Pipeline::new(fetcher).invoke(input_json)
}
