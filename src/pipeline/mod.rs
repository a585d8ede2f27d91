//! Pipeline orchestration module.
//!
//! Obfuscation pipeline that coordinates:
//! - Input parsing
//! - Format resolution
//! - Object fetch
//! - Table decode and encode
//! - PII redaction

pub mod context;
pub mod obfuscation;
pub mod request;

pub use context::*;
pub use obfuscation::*;
pub use request::*;
