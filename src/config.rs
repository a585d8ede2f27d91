//! Runtime configuration.
//!
//! Read once from the environment by the binary. The library API takes
//! fetchers directly and never reads the environment itself.

use std::env;
use std::path::PathBuf;

use crate::storage::fetcher::{LocalFetcher, SchemeFetcher};

/// Root directory for `file://` locators.
pub const FILE_ROOT_VAR: &str = "OBFUSCATOR_FILE_ROOT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub file_root: PathBuf,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            file_root: PathBuf::from("."),
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source. Unset or empty values fall back to
    /// the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(root) = lookup(FILE_ROOT_VAR).filter(|v| !v.trim().is_empty()) {
            config.file_root = PathBuf::from(root);
        }
        config
    }

    /// Fetcher for every scheme this build supports.
    pub fn scheme_fetcher(&self) -> SchemeFetcher {
        let fetcher =
            SchemeFetcher::new().register(LocalFetcher::SCHEME, LocalFetcher::new(self.file_root.clone()));

        #[cfg(feature = "s3")]
        let fetcher = fetcher.register(
            crate::storage::s3::S3Fetcher::SCHEME,
            crate::storage::s3::S3Fetcher::new(),
        );

        log::debug!(
            "FETCHER_CONFIGURED file_root={} schemes={:?}",
            self.file_root.display(),
            fetcher.schemes()
        );
        fetcher
    }
}
