//! Error types for the obfuscation pipeline.
//!
//! `ConfigError` is returned straight to the caller. The stage errors
//! (`FormatError`, `FetchError`, `CodecError`) are folded into a
//! `PipelineError` and recovered at the pipeline boundary.

use thiserror::Error;

use crate::pipeline::Stage;
use crate::table::TableFormat;

/// Boxed low-level cause carried by codec errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Malformed or incomplete invocation input.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid input JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Input JSON must be an object")]
    NotAnObject,

    #[error("Missing 'file_to_obfuscate' in input JSON")]
    MissingFileToObfuscate,

    #[error("Missing 'pii_fields' in input JSON")]
    MissingPiiFields,

    #[error("'file_to_obfuscate' must be a string")]
    InvalidFileToObfuscate,

    #[error("'pii_fields' must be an array of strings")]
    InvalidPiiFields,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormatError {
    #[error("no file format found in '{0}'")]
    NoFormatFound(String),
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid storage locator: {0}")]
    InvalidLocator(String),

    #[error("no fetcher registered for scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("object not found: {0}")]
    NotFound(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("transient storage failure: {0}")]
    Transient(String),
}

/// Violations of the table invariants, and value conversions that
/// cannot be represented.
#[derive(Error, Debug, PartialEq)]
pub enum TableError {
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("column '{column}' has {actual} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("input has no header row")]
    MissingHeader,

    #[error("expected a JSON array of records")]
    NotAnArray,

    #[error("record {0} is not a JSON object")]
    NotARecord(usize),

    #[error("column '{column}' holds a nested value in record {row}")]
    NestedValue { column: String, row: usize },

    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedType { column: String, data_type: String },

    #[error("column '{column}' value {value} does not fit {data_type}")]
    ValueOutOfRange {
        column: String,
        value: String,
        data_type: String,
    },
}

#[derive(Error, Debug)]
pub enum CodecError {
    /// The tag names no known format. A configuration problem, not a
    /// parse failure.
    #[error("unsupported file format '{0}'")]
    UnsupportedFormat(String),

    #[error("failed to decode {format} content: {source}")]
    Decode {
        format: TableFormat,
        #[source]
        source: BoxError,
    },

    #[error("failed to encode {format} content: {source}")]
    Encode {
        format: TableFormat,
        #[source]
        source: BoxError,
    },
}

impl CodecError {
    pub fn decode(format: TableFormat, source: impl Into<BoxError>) -> Self {
        CodecError::Decode {
            format,
            source: source.into(),
        }
    }

    pub fn encode(format: TableFormat, source: impl Into<BoxError>) -> Self {
        CodecError::Encode {
            format,
            source: source.into(),
        }
    }
}

/// Any failure a pipeline stage can produce.
#[derive(Error, Debug)]
pub enum StageError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

#[derive(Error, Debug)]
#[error("pipeline failed at stage '{stage}': {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: StageError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: impl Into<StageError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}
