use crate::compat::{build_with, AliasTable, CompatibilityReport};
use crate::traits::{ManifestProvider, ProviderError, SnapshotProvider};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{info, instrument};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Snapshot unavailable: {0}")]
    Snapshot(#[source] ProviderError),
    #[error("Manifest unavailable: {0}")]
    Manifest(#[source] ProviderError),
    #[error("Report I/O timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Runs compatibility reports, bounding how many are in flight at once.
///
/// Snapshot and manifest are fetched concurrently and must both arrive before
/// the builder runs; a failure on either side fails the whole report.
pub struct CompatExecutor {
    semaphore: Arc<Semaphore>,
    aliases: AliasTable,
    io_timeout: Option<Duration>,
}

impl CompatExecutor {
    pub fn new(concurrency_limit: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(concurrency_limit.max(1))),
            aliases: AliasTable::default(),
            io_timeout: None,
        }
    }

    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_timeout(mut self, io_timeout: Option<Duration>) -> Self {
        self.io_timeout = io_timeout;
        self
    }

    #[instrument(skip(self, snapshots, manifest))]
    pub async fn execute<S, M>(
        &self,
        snapshots: &S,
        manifest: &M,
        channel: &str,
    ) -> Result<CompatibilityReport, ReportError>
    where
        S: SnapshotProvider + ?Sized,
        M: ManifestProvider + ?Sized,
    {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| ReportError::Unknown(format!("Semaphore error: {}", e)))?;

        info!(
            snapshots = snapshots.source_id(),
            manifest = manifest.source_id(),
            "Fetching report inputs"
        );

        let fetch = async {
            tokio::join!(snapshots.fetch_snapshot(channel), manifest.read_manifest())
        };
        let (snapshot, local) = match self.io_timeout {
            Some(limit) => timeout(limit, fetch).await.map_err(|_| ReportError::Timeout {
                timeout_secs: limit.as_secs(),
            })?,
            None => fetch.await,
        };
        let snapshot = snapshot.map_err(ReportError::Snapshot)?;
        let local = local.map_err(ReportError::Manifest)?;

        let report = build_with(&snapshot, &local, &self.aliases);

        let summary = report.summary();
        info!(
            rows = report.rows.len(),
            compatible = summary.compatible,
            incompatible = summary.incompatible,
            unresolvable = summary.unresolvable,
            "Finished compatibility report"
        );
        Ok(report)
    }
}
