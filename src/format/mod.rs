//! File format resolution.
//!
//! Derives the format tag of a target object from its locator.

pub mod resolver;

pub use resolver::*;
