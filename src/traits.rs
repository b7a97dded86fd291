use crate::model::{BundleNativeSnapshot, LocalManifest};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Failed to parse content: {0}")]
    InvalidContent(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serde_json::Error> for ProviderError {
    fn from(e: serde_json::Error) -> Self {
        ProviderError::InvalidContent(e.to_string())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("Package listed twice in snapshot: {0}")]
    DuplicatePackage(String),
}

#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// Returns an identifier for where snapshots come from (e.g., a store path).
    fn source_id(&self) -> &str;

    /// Fetches the native snapshot of the latest bundle on `channel`.
    async fn fetch_snapshot(&self, channel: &str) -> Result<BundleNativeSnapshot, ProviderError>;
}

#[async_trait]
pub trait ManifestProvider: Send + Sync {
    /// Returns an identifier for the manifest being read (e.g., "package.json").
    fn source_id(&self) -> &str;

    /// Reads the declared native dependency specifiers of the local project.
    async fn read_manifest(&self) -> Result<LocalManifest, ProviderError>;
}
