use serde::{Deserialize, Serialize};
use std::collections::{btree_map, BTreeMap, HashSet};

use crate::traits::SnapshotError;

pub type PackageName = String;

/// One native package recorded against a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativePackage {
    pub name: PackageName,
    pub version: String, // exact semver, already validated by the uploader
}

impl NativePackage {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Native versions captured when a bundle was uploaded.
///
/// Entries keep their insertion order and package names are unique. The
/// persisted form is a plain list of `{ "name", "version" }` objects so the
/// order survives a round trip through JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<NativePackage>", into = "Vec<NativePackage>")]
pub struct BundleNativeSnapshot {
    packages: Vec<NativePackage>,
}

impl BundleNativeSnapshot {
    pub fn from_entries<I>(entries: I) -> Result<Self, SnapshotError>
    where
        I: IntoIterator<Item = NativePackage>,
    {
        let mut seen = HashSet::new();
        let mut packages = Vec::new();
        for entry in entries {
            if !seen.insert(entry.name.clone()) {
                return Err(SnapshotError::DuplicatePackage(entry.name));
            }
            packages.push(entry);
        }
        Ok(Self { packages })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NativePackage> {
        self.packages.iter()
    }

    pub fn get(&self, name: &str) -> Option<&NativePackage> {
        self.packages.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl TryFrom<Vec<NativePackage>> for BundleNativeSnapshot {
    type Error = SnapshotError;

    fn try_from(entries: Vec<NativePackage>) -> Result<Self, Self::Error> {
        Self::from_entries(entries)
    }
}

impl From<BundleNativeSnapshot> for Vec<NativePackage> {
    fn from(snapshot: BundleNativeSnapshot) -> Self {
        snapshot.packages
    }
}

impl<'a> IntoIterator for &'a BundleNativeSnapshot {
    type Item = &'a NativePackage;
    type IntoIter = std::slice::Iter<'a, NativePackage>;

    fn into_iter(self) -> Self::IntoIter {
        self.packages.iter()
    }
}

/// Dependency specifiers declared by the local project, keyed by package name.
///
/// Values are the raw strings from the manifest; nothing is pre-parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalManifest {
    dependencies: BTreeMap<PackageName, String>,
}

impl LocalManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.dependencies.get(name).map(String::as_str)
    }

    /// Inserts a specifier, returning the one it replaced.
    pub fn insert(&mut self, name: impl Into<String>, specifier: impl Into<String>) -> Option<String> {
        self.dependencies.insert(name.into(), specifier.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.dependencies.contains_key(name)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, PackageName, String> {
        self.dependencies.iter()
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for LocalManifest
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            dependencies: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Persisted bundle row owning its native snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleRecord {
    pub bundle: String,
    pub channel: String,
    pub native_packages: BundleNativeSnapshot,
    pub uploaded_at: i64, // seconds since epoch
}

impl BundleRecord {
    pub fn new(
        bundle: impl Into<String>,
        channel: impl Into<String>,
        native_packages: BundleNativeSnapshot,
    ) -> Self {
        Self {
            bundle: bundle.into(),
            channel: channel.into(),
            native_packages,
            uploaded_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs() as i64)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_rejects_duplicate_names() {
        let result = BundleNativeSnapshot::from_entries(vec![
            NativePackage::new("@capacitor/android", "7.0.0"),
            NativePackage::new("@capacitor/android", "7.0.1"),
        ]);

        match result {
            Err(SnapshotError::DuplicatePackage(name)) => assert_eq!(name, "@capacitor/android"),
            other => panic!("expected duplicate error, got {:?}", other),
        }
    }

    #[test]
    fn test_snapshot_preserves_insertion_order_through_json() {
        let snapshot = BundleNativeSnapshot::from_entries(vec![
            NativePackage::new("@capacitor/ios", "7.0.0"),
            NativePackage::new("@capacitor/android", "7.0.0"),
            NativePackage::new("@capacitor/app", "6.0.1"),
        ])
        .unwrap();

        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: BundleNativeSnapshot = serde_json::from_str(&json).unwrap();

        let names: Vec<_> = restored.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["@capacitor/ios", "@capacitor/android", "@capacitor/app"]);
        assert_eq!(restored.get("@capacitor/app").unwrap().version, "6.0.1");
    }

    #[test]
    fn test_snapshot_deserialization_enforces_uniqueness() {
        let json = r#"[
            {"name": "@capacitor/android", "version": "7.0.0"},
            {"name": "@capacitor/android", "version": "7.0.0"}
        ]"#;

        assert!(serde_json::from_str::<BundleNativeSnapshot>(json).is_err());
    }

    #[test]
    fn test_manifest_from_iter() {
        let manifest: LocalManifest =
            [("@capacitor/android", "^7.0.0"), ("@capacitor/core", "7.0.0")]
                .into_iter()
                .collect();

        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.get("@capacitor/android"), Some("^7.0.0"));
        assert!(manifest.get("@capacitor/ios").is_none());
    }
}
