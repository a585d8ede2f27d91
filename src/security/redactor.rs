//! Column redaction.
//!
//! Replaces every value of the requested columns with a fixed marker.
//! Field names the table does not have are reported and skipped.

use std::collections::HashSet;

use arrow::datatypes::DataType;

use crate::logging::structured::LogContext;
use crate::table::model::{Scalar, Table};

/// Value written into every cell of a redacted column.
pub const REDACTION_MARKER: &str = "***";

/// What a redaction pass did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RedactionReport {
    /// Columns that were masked, in request order, without duplicates.
    pub redacted: Vec<String>,
    /// Requested names the table does not have.
    pub missing: Vec<String>,
    pub cells_redacted: usize,
}

impl RedactionReport {
    pub fn all_found(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Return a copy of `table` with each column named in `fields` masked.
///
/// The input table is left untouched. A masked column becomes a text
/// column even if it was numeric, and keeps its position and nullability.
/// Unknown names are logged and recorded in the report; they never fail
/// the call.
pub fn redact(table: &Table, fields: &[String], ctx: &LogContext) -> (Table, RedactionReport) {
    log::debug!("{} PII_REDACT_START fields={:?}", ctx, fields);

    let mut report = RedactionReport::default();
    let rows = table.num_rows();

    for field in fields {
        if report.redacted.contains(field) || report.missing.contains(field) {
            continue;
        }

        if !table.has_column(field) {
            log::warn!("{} PII_FIELD_NOT_FOUND field={}", ctx, field);
            report.missing.push(field.clone());
            continue;
        }

        report.redacted.push(field.clone());
        report.cells_redacted += rows;
    }

    let targets: HashSet<&str> = report.redacted.iter().map(String::as_str).collect();
    let redacted = table.with_filled_columns(
        &targets,
        &DataType::Utf8,
        &Scalar::Str(REDACTION_MARKER.to_string()),
    );

    log::info!(
        "{} PII_REDACTED columns={:?} missing={:?} cells={}",
        ctx,
        report.redacted,
        report.missing,
        report.cells_redacted
    );

    (redacted, report)
}
