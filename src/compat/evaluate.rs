//! Per-package compatibility verdict.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::normalize::NormalizedSpecifier;

/// Outcome of comparing a local specifier with the bundle's recorded version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Local version equals the bundle version
    Compatible,

    /// Package is missing locally, or declares a different version
    Incompatible,

    /// Package is declared locally but its specifier names a source rather
    /// than a version (alias, unparseable), so it cannot be confirmed
    Unresolvable,
}

impl Verdict {
    pub fn is_compatible(&self) -> bool {
        matches!(self, Verdict::Compatible)
    }

    /// Glyph used in rendered reports. `Unresolvable` shares the mismatch glyph.
    pub fn symbol(&self) -> &'static str {
        match self {
            Verdict::Compatible => "✅",
            Verdict::Incompatible | Verdict::Unresolvable => "❌",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Compares a bundle version with the normalized local specifier.
///
/// `local` is `None` when the package is not declared in the local manifest.
/// Equality is exact and case-sensitive on the normalized string, pre-release
/// tag included.
pub fn evaluate(bundle_version: &str, local: Option<&NormalizedSpecifier>) -> Verdict {
    let Some(local) = local else {
        return Verdict::Incompatible;
    };

    match local.comparable.as_deref() {
        None => Verdict::Unresolvable,
        Some(v) if v == bundle_version => Verdict::Compatible,
        Some(_) => Verdict::Incompatible,
    }
}
