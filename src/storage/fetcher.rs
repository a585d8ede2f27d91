//! Object fetchers.
//!
//! The pipeline only sees the `ObjectFetcher` trait. Each implementation
//! maps its own failures onto `FetchError` so the pipeline can treat every
//! fetch failure the same way.

use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::FetchError;

use super::locator::StorageLocator;

/// Returns the raw bytes of the object a locator addresses.
pub trait ObjectFetcher {
    fn fetch(&self, locator: &StorageLocator) -> Result<Vec<u8>, FetchError>;
}

/// Map an I/O failure onto the fetch taxonomy.
pub fn fetch_error_from_io(locator: &StorageLocator, err: &io::Error) -> FetchError {
    match err.kind() {
        io::ErrorKind::NotFound => FetchError::NotFound(locator.to_string()),
        io::ErrorKind::PermissionDenied => FetchError::AccessDenied(locator.to_string()),
        _ => FetchError::Transient(format!("{}: {}", locator, err)),
    }
}

/// Reads `file://container/key` locators from `<root>/<container>/<key>`.
#[derive(Debug, Clone)]
pub struct LocalFetcher {
    root: PathBuf,
}

impl LocalFetcher {
    pub const SCHEME: &'static str = "file";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, locator: &StorageLocator) -> Result<PathBuf, FetchError> {
        let relative = Path::new(&locator.container).join(&locator.key);

        // Only plain path segments; no `..`, no absolute keys.
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(FetchError::AccessDenied(locator.to_string()));
        }

        Ok(self.root.join(relative))
    }
}

impl ObjectFetcher for LocalFetcher {
    fn fetch(&self, locator: &StorageLocator) -> Result<Vec<u8>, FetchError> {
        if locator.scheme != Self::SCHEME {
            return Err(FetchError::UnsupportedScheme(locator.scheme.clone()));
        }

        let path = self.resolve(locator)?;
        log::debug!("LOCAL_FETCH path={}", path.display());

        std::fs::read(&path).map_err(|e| fetch_error_from_io(locator, &e))
    }
}

/// In-memory objects keyed by their full locator string.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    objects: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, locator: &str, content: impl Into<Vec<u8>>) {
        self.objects.insert(locator.to_string(), content.into());
    }

    pub fn with_object(mut self, locator: &str, content: impl Into<Vec<u8>>) -> Self {
        self.insert(locator, content);
        self
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl ObjectFetcher for MemoryFetcher {
    fn fetch(&self, locator: &StorageLocator) -> Result<Vec<u8>, FetchError> {
        self.objects
            .get(&locator.to_string())
            .cloned()
            .ok_or_else(|| FetchError::NotFound(locator.to_string()))
    }
}

/// Dispatches to a registered fetcher by locator scheme.
#[derive(Default)]
pub struct SchemeFetcher {
    fetchers: HashMap<String, Box<dyn ObjectFetcher + Send + Sync>>,
}

impl SchemeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        mut self,
        scheme: &str,
        fetcher: impl ObjectFetcher + Send + Sync + 'static,
    ) -> Self {
        self.fetchers
            .insert(scheme.to_ascii_lowercase(), Box::new(fetcher));
        self
    }

    pub fn schemes(&self) -> Vec<String> {
        let mut schemes: Vec<String> = self.fetchers.keys().cloned().collect();
        schemes.sort();
        schemes
    }
}

impl ObjectFetcher for SchemeFetcher {
    fn fetch(&self, locator: &StorageLocator) -> Result<Vec<u8>, FetchError> {
        match self.fetchers.get(&locator.scheme) {
            Some(fetcher) => fetcher.fetch(locator),
            None => Err(FetchError::UnsupportedScheme(locator.scheme.clone())),
        }
    }
}
