//! `s3://bucket/key` fetcher built on `object_store`.
//!
//! Region, credentials and endpoint come from the standard `AWS_*`
//! environment variables. The single `get` runs on a current-thread tokio
//! runtime so the rest of the pipeline stays synchronous.

use object_store::aws::AmazonS3Builder;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;

use crate::error::FetchError;

use super::fetcher::ObjectFetcher;
use super::locator::StorageLocator;

#[derive(Debug, Clone, Default)]
pub struct S3Fetcher {
    endpoint: Option<String>,
}

impl S3Fetcher {
    pub const SCHEME: &'static str = "s3";

    pub fn new() -> Self {
        Self::default()
    }

    /// Override the endpoint (S3-compatible stores, localstack).
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = Some(endpoint.to_string());
        self
    }

    fn store(&self, bucket: &str) -> Result<impl ObjectStore, FetchError> {
        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
        if let Some(endpoint) = &self.endpoint {
            builder = builder.with_endpoint(endpoint).with_allow_http(true);
        }
        builder
            .build()
            .map_err(|e| FetchError::Transient(format!("s3 client for '{}': {}", bucket, e)))
    }
}

fn map_store_error(locator: &StorageLocator, err: object_store::Error) -> FetchError {
    match err {
        object_store::Error::NotFound { .. } => FetchError::NotFound(locator.to_string()),
        object_store::Error::PermissionDenied { .. }
        | object_store::Error::Unauthenticated { .. } => {
            FetchError::AccessDenied(locator.to_string())
        }
        other => FetchError::Transient(format!("{}: {}", locator, other)),
    }
}

impl ObjectFetcher for S3Fetcher {
    fn fetch(&self, locator: &StorageLocator) -> Result<Vec<u8>, FetchError> {
        if locator.scheme != Self::SCHEME {
            return Err(FetchError::UnsupportedScheme(locator.scheme.clone()));
        }

        let store = self.store(&locator.container)?;
        let path = ObjectPath::from(locator.key.as_str());

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| FetchError::Transient(format!("runtime: {}", e)))?;

        log::debug!("S3_FETCH bucket={} key={}", locator.container, locator.key);

        let bytes = runtime
            .block_on(async {
                let result = store.get(&path).await?;
                result.bytes().await
            })
            .map_err(|e| map_store_error(locator, e))?;

        Ok(bytes.to_vec())
    }
}
