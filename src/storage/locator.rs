//! Storage locators of the form `scheme://container/key`.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::FetchError;

lazy_static! {
    /// Scheme in group 1, container in group 2, key in group 3.
    static ref LOCATOR_PATTERN: Regex =
        Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*)://([^/]+)/(.+)$").unwrap();
}

/// Address of one object in a storage system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLocator {
    pub scheme: String,
    pub container: String,
    pub key: String,
}

impl StorageLocator {
    /// Parse a locator. Fails before any I/O when the string does not
    /// match `scheme://container/key`.
    pub fn parse(locator: &str) -> Result<Self, FetchError> {
        let caps = LOCATOR_PATTERN
            .captures(locator)
            .ok_or_else(|| FetchError::InvalidLocator(locator.to_string()))?;

        Ok(Self {
            scheme: caps[1].to_ascii_lowercase(),
            container: caps[2].to_string(),
            key: caps[3].to_string(),
        })
    }
}

impl fmt::Display for StorageLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", self.scheme, self.container, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_s3() {
        let loc = StorageLocator::parse("s3://bucket/path/to/file.csv").unwrap();
        assert_eq!(loc.scheme, "s3");
        assert_eq!(loc.container, "bucket");
        assert_eq!(loc.key, "path/to/file.csv");
        assert_eq!(loc.to_string(), "s3://bucket/path/to/file.csv");
    }

    #[test]
    fn test_scheme_is_normalized() {
        let loc = StorageLocator::parse("S3://bucket/k").unwrap();
        assert_eq!(loc.scheme, "s3");
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in [
            "bucket/key.csv",
            "s3://bucket",
            "s3://bucket/",
            "s3:///key.csv",
            "://bucket/key",
            "",
        ] {
            assert!(
                matches!(StorageLocator::parse(bad), Err(FetchError::InvalidLocator(_))),
                "accepted {bad:?}"
            );
        }
    }
}
