//! Format tag extraction from storage locators.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::FormatError;
use crate::logging::structured::LogContext;

lazy_static! {
    /// Alphanumeric suffix after the last dot, anchored to end-of-string.
    static ref FORMAT_SUFFIX: Regex = Regex::new(r"\.([A-Za-z0-9]+)$").unwrap();
}

/// Extract the format tag (e.g. `csv`, `json`, `parquet`) from a locator.
///
/// Only the final suffix is returned, so `file.tar.gz` resolves to `gz`.
/// The tag is not checked against the supported formats here; that
/// happens when the codec is selected.
pub fn resolve_format(locator: &str, ctx: &LogContext) -> Result<String, FormatError> {
    match FORMAT_SUFFIX.captures(locator).and_then(|c| c.get(1)) {
        Some(tag) => {
            log::debug!("{} FORMAT_RESOLVED tag={}", ctx, tag.as_str());
            Ok(tag.as_str().to_string())
        }
        None => {
            log::error!("{} FORMAT_NOT_FOUND locator={}", ctx, locator);
            Err(FormatError::NoFormatFound(locator.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> LogContext {
        LogContext::new("test-run")
    }

    #[test]
    fn test_simple_extension() {
        assert_eq!(resolve_format("s3://b/k/file.csv", &ctx()).unwrap(), "csv");
        assert_eq!(resolve_format("s3://b/data.json", &ctx()).unwrap(), "json");
        assert_eq!(
            resolve_format("s3://b/x/y/z.parquet", &ctx()).unwrap(),
            "parquet"
        );
    }

    #[test]
    fn test_last_suffix_wins() {
        assert_eq!(resolve_format("s3://b/k/file.tar.gz", &ctx()).unwrap(), "gz");
    }

    #[test]
    fn test_no_extension() {
        assert_eq!(
            resolve_format("s3://b/k/noext", &ctx()),
            Err(FormatError::NoFormatFound("s3://b/k/noext".to_string()))
        );
    }

    #[test]
    fn test_dot_in_bucket_is_not_a_format() {
        assert!(resolve_format("s3://my.bucket/key", &ctx()).is_err());
    }

    #[test]
    fn test_trailing_dot_or_symbols() {
        assert!(resolve_format("s3://b/file.", &ctx()).is_err());
        assert!(resolve_format("s3://b/file.c-v", &ctx()).is_err());
    }

    #[test]
    fn test_case_is_preserved() {
        assert_eq!(resolve_format("file:///tmp/a.CSV", &ctx()).unwrap(), "CSV");
    }
}
