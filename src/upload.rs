//! Bundle upload: records the native snapshot a bundle was built against.

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::compat::{normalize, parse_with, AliasTable};
use crate::model::{BundleNativeSnapshot, BundleRecord, LocalManifest, NativePackage};
use crate::providers::BundleStore;
use crate::traits::{ManifestProvider, ProviderError, SnapshotError};

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("Invalid snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub bundle: String,
    pub channel: String,

    /// Reuse the channel's last recorded snapshot instead of recomputing it
    /// from the local manifest
    pub ignore_metadata_check: bool,
}

/// Derives a snapshot from the local manifest.
///
/// Each declared package with a comparable version is recorded under that
/// version; aliases and unparseable specifiers cannot be pinned and are left
/// out.
pub fn capture_snapshot(
    manifest: &LocalManifest,
    aliases: &AliasTable,
) -> Result<BundleNativeSnapshot, SnapshotError> {
    let entries = manifest.iter().filter_map(|(name, declared)| {
        let parsed = parse_with(declared, aliases);
        match normalize(&parsed).comparable {
            Some(version) => Some(NativePackage::new(name.clone(), version)),
            None => {
                warn!(package = %name, specifier = %parsed.raw(), "No concrete version, not recorded in snapshot");
                None
            }
        }
    });
    BundleNativeSnapshot::from_entries(entries)
}

/// Records a new bundle on `request.channel` and returns the stored record.
///
/// With `ignore_metadata_check` the manifest is not read at all; the
/// snapshot of the previous bundle on the channel is carried over (empty if
/// the channel has none).
#[instrument(skip(store, manifest, aliases), fields(bundle = %request.bundle, channel = %request.channel))]
pub async fn upload<M>(
    store: &BundleStore,
    manifest: &M,
    request: UploadRequest,
    aliases: &AliasTable,
) -> Result<BundleRecord, UploadError>
where
    M: ManifestProvider + ?Sized,
{
    let snapshot = if request.ignore_metadata_check {
        let previous = store.latest(&request.channel).await?;
        info!(reused = previous.is_some(), "Metadata check skipped, keeping previous snapshot");
        previous.map(|r| r.native_packages).unwrap_or_default()
    } else {
        let local = manifest.read_manifest().await?;
        capture_snapshot(&local, aliases)?
    };

    info!(packages = snapshot.len(), "Bundle uploaded");
    let record = BundleRecord::new(request.bundle, request.channel, snapshot);
    store.record_upload(record.clone()).await?;
    Ok(record)
}
