//! Storage module.
//!
//! Locator parsing and the object fetcher boundary. Credentials, endpoints
//! and retry policy belong to the fetcher implementations, never to the
//! pipeline.

pub mod fetcher;
pub mod locator;
#[cfg(feature = "s3")]
pub mod s3;

pub use fetcher::*;
pub use locator::*;
#[cfg(feature = "s3")]
pub use s3::S3Fetcher;
