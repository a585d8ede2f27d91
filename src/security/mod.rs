//! Security module.
//!
//! Masks PII columns in decoded tables.

pub mod redactor;

pub use redactor::*;
