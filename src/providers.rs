//! File-backed snapshot and manifest providers.
//!
//! - [`PackageJsonManifest`] reads declared dependencies from a `package.json`
//! - [`BundleStore`] keeps the latest [`BundleRecord`] per channel in a JSON file

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::model::{BundleNativeSnapshot, BundleRecord, LocalManifest};
use crate::traits::{ManifestProvider, ProviderError, SnapshotProvider};

// ============================================================================
// package.json
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct PackageJson {
    #[serde(default)]
    dependencies: BTreeMap<String, String>,

    #[serde(default, rename = "devDependencies")]
    dev_dependencies: BTreeMap<String, String>,
}

/// Reads dependency specifiers from a `package.json` file.
///
/// `dependencies` and `devDependencies` are merged; on a name clash the
/// runtime entry wins. With `native_only` set, a package is kept only when
/// its directory under the sibling `node_modules/` has an `android/` or
/// `ios/` subdirectory.
#[derive(Debug, Clone)]
pub struct PackageJsonManifest {
    path: PathBuf,
    source_id: String,
    native_only: bool,
}

impl PackageJsonManifest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            source_id: path.display().to_string(),
            path,
            native_only: false,
        }
    }

    pub fn with_native_only(mut self, native_only: bool) -> Self {
        self.native_only = native_only;
        self
    }

    fn node_modules(&self) -> PathBuf {
        self.path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("node_modules")
    }

    async fn is_native(&self, name: &str) -> bool {
        let package_dir = self.node_modules().join(name);
        for platform in ["android", "ios"] {
            if let Ok(meta) = tokio::fs::metadata(package_dir.join(platform)).await {
                if meta.is_dir() {
                    return true;
                }
            }
        }
        false
    }
}

#[async_trait]
impl ManifestProvider for PackageJsonManifest {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn read_manifest(&self) -> Result<LocalManifest, ProviderError> {
        let content = tokio::fs::read(&self.path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => ProviderError::NotFound(self.source_id.clone()),
            _ => ProviderError::IoError(e),
        })?;
        let package: PackageJson = serde_json::from_slice(&content)?;

        let mut declared = package.dev_dependencies;
        declared.extend(package.dependencies);

        let mut manifest = LocalManifest::new();
        for (name, specifier) in declared {
            if self.native_only && !self.is_native(&name).await {
                debug!(package = %name, "Skipping non-native package");
                continue;
            }
            manifest.insert(name, specifier);
        }

        debug!(packages = manifest.len(), "Read local manifest");
        Ok(manifest)
    }
}

// ============================================================================
// Bundle store
// ============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    channels: BTreeMap<String, BundleRecord>,
}

/// JSON file holding the most recent bundle uploaded to each channel.
///
/// Clones share one write lock, so concurrent uploads through the same store
/// never drop each other's channels. The file is replaced atomically; readers
/// see either the old or the new content, never a partial write.
#[derive(Debug, Clone)]
pub struct BundleStore {
    path: PathBuf,
    source_id: String,
    write_lock: Arc<Mutex<()>>,
}

impl BundleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            source_id: path.display().to_string(),
            path,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    async fn load(&self) -> Result<StoreFile, ProviderError> {
        match tokio::fs::read(&self.path).await {
            Ok(content) => Ok(serde_json::from_slice(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(StoreFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Latest record for `channel`, if any bundle was uploaded to it.
    pub async fn latest(&self, channel: &str) -> Result<Option<BundleRecord>, ProviderError> {
        Ok(self.load().await?.channels.remove(channel))
    }

    /// Stores `record` as the latest bundle of its channel.
    #[instrument(skip(self, record), fields(bundle = %record.bundle, channel = %record.channel))]
    pub async fn record_upload(&self, record: BundleRecord) -> Result<(), ProviderError> {
        let _guard = self.write_lock.lock().await;

        let mut store = self.load().await?;
        store.channels.insert(record.channel.clone(), record);

        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent.to_path_buf(),
            None => PathBuf::from("."),
        };
        tokio::fs::create_dir_all(&dir).await?;
        let json = serde_json::to_vec_pretty(&store)?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || persist_atomically(&dir, &path, &json))
            .await
            .map_err(|e| std::io::Error::new(ErrorKind::Other, format!("Task join error: {}", e)))??;

        info!(path = %self.path.display(), "Bundle record stored");
        Ok(())
    }
}

/// Writes `content` to a temp file in `dir`, then renames it over `path`.
fn persist_atomically(dir: &Path, path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl SnapshotProvider for BundleStore {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    async fn fetch_snapshot(&self, channel: &str) -> Result<BundleNativeSnapshot, ProviderError> {
        self.latest(channel)
            .await?
            .map(|record| record.native_packages)
            .ok_or_else(|| ProviderError::NotFound(format!("no bundle on channel '{}'", channel)))
    }
}

// ============================================================================
// Tests
// ============================================================================
