//! Runtime configuration.
//!
//! Loaded from an optional JSON file; every field has a default so an empty
//! object (or no file at all) is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::compat::{AliasKind, AliasTable};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config '{path}': {source}")]
    Invalid {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Extra alias prefix registered on top of the built-in ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasPrefix {
    pub prefix: String,
    pub kind: AliasKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatConfig {
    /// Path to the local `package.json`
    pub manifest_path: PathBuf,

    /// Path to the JSON bundle store
    pub store_path: PathBuf,

    /// Only consider packages shipping `android/` or `ios/` sources
    pub native_only: bool,

    /// Prefixes appended to the default alias table
    pub alias_prefixes: Vec<AliasPrefix>,

    /// Limit on snapshot + manifest I/O per report (0 disables it)
    pub io_timeout_secs: u64,

    /// Maximum number of reports computed at once
    pub concurrency_limit: usize,
}

impl Default for CompatConfig {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from("package.json"),
            store_path: PathBuf::from(".native-compat/bundles.json"),
            native_only: false,
            alias_prefixes: Vec::new(),
            io_timeout_secs: 30,
            concurrency_limit: 4,
        }
    }
}

impl CompatConfig {
    /// Reads a config file, falling back to defaults for missing fields.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read(path).await.map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_slice(&content).map_err(|source| ConfigError::Invalid {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = path.into();
        self
    }

    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }

    pub fn with_native_only(mut self, native_only: bool) -> Self {
        self.native_only = native_only;
        self
    }

    pub fn with_alias_prefix(mut self, prefix: impl Into<String>, kind: AliasKind) -> Self {
        self.alias_prefixes.push(AliasPrefix {
            prefix: prefix.into(),
            kind,
        });
        self
    }

    /// Default alias table extended with the configured prefixes.
    pub fn alias_table(&self) -> AliasTable {
        self.alias_prefixes
            .iter()
            .fold(AliasTable::default(), |table, p| {
                table.with_prefix(p.prefix.clone(), p.kind)
            })
    }

    pub fn io_timeout(&self) -> Option<Duration> {
        (self.io_timeout_secs > 0).then(|| Duration::from_secs(self.io_timeout_secs))
    }
}
