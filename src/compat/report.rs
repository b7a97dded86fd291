//! Joins a bundle snapshot with the local manifest into report rows.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::evaluate::{evaluate, Verdict};
use super::normalize::normalize;
use super::specifier::{parse_with, AliasTable};
use crate::model::{BundleNativeSnapshot, LocalManifest, PackageName};

/// One line of the compatibility report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityRow {
    pub package_name: PackageName,

    /// Reduced local version, the raw specifier for aliases, or empty when
    /// the package is not declared locally
    pub local_display: String,

    pub bundle_version: String,
    pub verdict: Verdict,
}

/// Counts per verdict.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub compatible: usize,
    pub incompatible: usize,
    pub unresolvable: usize,
}

/// Ordered report rows, one per snapshot package.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityReport {
    pub rows: Vec<CompatibilityRow>,

    /// Locally declared packages the bundle never shipped with. Listed for
    /// diagnostics only; they never produce rows.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub untracked: Vec<PackageName>,
}

impl CompatibilityReport {
    pub fn summary(&self) -> ReportSummary {
        self.rows
            .iter()
            .fold(ReportSummary::default(), |mut acc, row| {
                match row.verdict {
                    Verdict::Compatible => acc.compatible += 1,
                    Verdict::Incompatible => acc.incompatible += 1,
                    Verdict::Unresolvable => acc.unresolvable += 1,
                }
                acc
            })
    }

    pub fn all_compatible(&self) -> bool {
        self.rows.iter().all(|r| r.verdict.is_compatible())
    }

    pub fn row(&self, package_name: &str) -> Option<&CompatibilityRow> {
        self.rows.iter().find(|r| r.package_name == package_name)
    }
}

/// Builds the report with the default alias table.
pub fn build(snapshot: &BundleNativeSnapshot, manifest: &LocalManifest) -> CompatibilityReport {
    build_with(snapshot, manifest, &AliasTable::default())
}

/// Builds the report in snapshot order. The snapshot alone defines the row
/// set; every row is evaluated independently.
pub fn build_with(
    snapshot: &BundleNativeSnapshot,
    manifest: &LocalManifest,
    aliases: &AliasTable,
) -> CompatibilityReport {
    let rows: Vec<CompatibilityRow> = snapshot
        .iter()
        .map(|package| {
            let local = manifest
                .get(&package.name)
                .map(|raw| normalize(&parse_with(raw, aliases)));
            let verdict = evaluate(&package.version, local.as_ref());

            CompatibilityRow {
                package_name: package.name.clone(),
                local_display: local.map(|l| l.display).unwrap_or_default(),
                bundle_version: package.version.clone(),
                verdict,
            }
        })
        .collect();

    let untracked: Vec<PackageName> = manifest
        .iter()
        .filter(|(name, _)| snapshot.get(name).is_none())
        .map(|(name, _)| name.clone())
        .collect();

    if !untracked.is_empty() {
        debug!(count = untracked.len(), packages = ?untracked, "Local packages absent from bundle snapshot");
    }

    CompatibilityReport { rows, untracked }
}
