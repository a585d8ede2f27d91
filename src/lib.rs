//! PII Obfuscator - column-level redaction for tabular files
//!
//! Given the location of a CSV, JSON or Parquet object and a list of column
//! names, this crate fetches the object, masks those columns with `***` and
//! returns the file re-encoded in its original format. The implementation
//! prioritizes:
//!
//! 1. **Safety** - The input table is never mutated; failures never panic
//! 2. **Logging** - Every stage logged with run and file context
//! 3. **Fidelity** - Unredacted columns keep their type and order
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `pipeline` - Request parsing and the five-stage orchestrator
//! - `format` - Format tag resolution from locators
//! - `storage` - Locator parsing and object fetchers (local, memory, S3)
//! - `table` - In-memory table model and the csv/json/parquet codecs
//! - `security` - Column redaction
//! - `config` - Runtime configuration from the environment
//! - `logging` - Structured logging with run context
//!
//! ## Example
//!
//! ```
//! use pii_obfuscator::{obfuscate, MemoryFetcher, ObfuscationResponse};
//!
//! let fetcher = MemoryFetcher::new()
//!     .with_object("s3://bucket/people.csv", "id,name\n1,James\n");
//! let response = obfuscate(
//!     r#"{"file_to_obfuscate": "s3://bucket/people.csv", "pii_fields": ["name"]}"#,
//!     &fetcher,
//! )
//! .unwrap();
//!
//! match response {
//!     ObfuscationResponse::Redacted(cursor) => {
//!         assert_eq!(cursor.into_inner(), b"id,name\n1,***\n");
//!     }
//!     ObfuscationResponse::Failed(failure) => panic!("status {}", failure.status),
//! }
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod pipeline;
pub mod security;
pub mod storage;
pub mod table;

pub use error::{
    CodecError, ConfigError, FetchError, FormatError, PipelineError, StageError, TableError,
};
pub use format::resolve_format;
pub use logging::structured::LogContext;
pub use pipeline::{
    obfuscate, FailureResult, InvocationContext, LogObserver, ObfuscationRequest,
    ObfuscationResponse, ObfuscationSummary, Obfuscated, Pipeline, PipelineObserver, Stage,
};
pub use security::{redact, RedactionReport, REDACTION_MARKER};
pub use storage::{LocalFetcher, MemoryFetcher, ObjectFetcher, SchemeFetcher, StorageLocator};
pub use table::{Column, Scalar, Table, TableFormat};
