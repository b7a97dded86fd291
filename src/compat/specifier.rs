//! Dependency specifier grammar.
//!
//! A specifier is the raw string a project declares for a dependency, e.g.
//! `"7.0.0"`, `"^7.0.0"` or `"jsr:@capacitor/android@7.0.0"`. This module
//! classifies such strings into a closed [`ParsedSpecifier`] variant:
//! - Exact semantic versions (optionally with a pre-release tag)
//! - Caret/tilde ranges over an exact version
//! - Non-registry aliases, detected from an injectable [`AliasTable`]
//! - Everything else, kept verbatim as [`ParsedSpecifier::Unparseable`]
//!
//! Parsing is total: every input maps to exactly one variant.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Alias Prefixes
// ============================================================================

/// Source kind named by a non-registry alias specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasKind {
    /// `npm:<name>@<range>` registry alias
    Npm,

    /// `jsr:<name>@<range>` JSR registry alias
    Jsr,

    /// `github:<owner>/<repo>[#ref]` shorthand
    Github,

    /// `git+<url>[#ref]` repository URL
    Git,

    /// `file:<path>` local directory or tarball
    File,
}

impl AliasKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AliasKind::Npm => "npm",
            AliasKind::Jsr => "jsr",
            AliasKind::Github => "github",
            AliasKind::Git => "git",
            AliasKind::File => "file",
        }
    }
}

impl fmt::Display for AliasKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prefix → kind table used to recognize alias specifiers.
///
/// Matching is purely lexical and checks entries in insertion order, so the
/// first registered prefix that matches wins. The default table covers
/// `npm:`, `jsr:`, `github:`, `git+` and `file:`; additional prefixes can be
/// registered with [`AliasTable::with_prefix`] without touching the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    entries: Vec<(String, AliasKind)>,
}

impl AliasTable {
    /// Creates a table with no prefixes. Every alias would then be unparseable.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers an additional prefix. Empty prefixes are ignored since they
    /// would swallow every specifier.
    pub fn with_prefix(mut self, prefix: impl Into<String>, kind: AliasKind) -> Self {
        let prefix = prefix.into();
        if !prefix.is_empty() && !self.entries.iter().any(|(p, _)| *p == prefix) {
            self.entries.push((prefix, kind));
        }
        self
    }

    /// Returns the kind of the first prefix `raw` starts with.
    pub fn match_prefix(&self, raw: &str) -> Option<AliasKind> {
        self.entries
            .iter()
            .find(|(prefix, _)| raw.starts_with(prefix.as_str()))
            .map(|(_, kind)| *kind)
    }

    pub fn prefixes(&self) -> impl Iterator<Item = (&str, AliasKind)> {
        self.entries.iter().map(|(p, k)| (p.as_str(), *k))
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::empty()
            .with_prefix("npm:", AliasKind::Npm)
            .with_prefix("jsr:", AliasKind::Jsr)
            .with_prefix("github:", AliasKind::Github)
            .with_prefix("git+", AliasKind::Git)
            .with_prefix("file:", AliasKind::File)
    }
}

// ============================================================================
// Parsed Specifier
// ============================================================================

/// Range operator applied to a base version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeOperator {
    /// `^1.2.3`
    Caret,

    /// `~1.2.3`
    Tilde,
}

impl RangeOperator {
    pub fn symbol(&self) -> char {
        match self {
            RangeOperator::Caret => '^',
            RangeOperator::Tilde => '~',
        }
    }

    fn from_symbol(c: char) -> Option<Self> {
        match c {
            '^' => Some(RangeOperator::Caret),
            '~' => Some(RangeOperator::Tilde),
            _ => None,
        }
    }
}

/// Classified dependency specifier.
///
/// Version payloads are kept exactly as written (minus the range operator),
/// so a pre-release tag such as `-beta.1` stays significant for comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ParsedSpecifier {
    /// Literal semantic version, e.g. `7.0.0` or `7.0.0-beta.1`
    Exact(String),

    /// Caret or tilde range over a semantic version
    Range(RangeOperator, String),

    /// Non-registry source; holds the original string
    Alias(AliasKind, String),

    /// Anything the grammar does not recognize; holds the original string
    Unparseable(String),
}

impl ParsedSpecifier {
    /// The string as it was declared in the manifest.
    pub fn raw(&self) -> String {
        match self {
            ParsedSpecifier::Exact(v) => v.clone(),
            ParsedSpecifier::Range(op, v) => format!("{}{}", op.symbol(), v),
            ParsedSpecifier::Alias(_, raw) | ParsedSpecifier::Unparseable(raw) => raw.clone(),
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parses `raw` using the default alias table.
pub fn parse(raw: &str) -> ParsedSpecifier {
    parse_with(raw, &AliasTable::default())
}

/// Parses `raw`, recognizing aliases from `aliases`.
///
/// Classification order, first match wins:
/// 1. alias prefix
/// 2. `^`/`~` followed by a semantic version
/// 3. semantic version
/// 4. unparseable
pub fn parse_with(raw: &str, aliases: &AliasTable) -> ParsedSpecifier {
    if let Some(kind) = aliases.match_prefix(raw) {
        return ParsedSpecifier::Alias(kind, raw.to_string());
    }

    let mut chars = raw.chars();
    if let Some(op) = chars.next().and_then(RangeOperator::from_symbol) {
        let rest = chars.as_str();
        if is_plain_semver(rest) {
            return ParsedSpecifier::Range(op, rest.to_string());
        }
        return ParsedSpecifier::Unparseable(raw.to_string());
    }

    if is_plain_semver(raw) {
        return ParsedSpecifier::Exact(raw.to_string());
    }

    ParsedSpecifier::Unparseable(raw.to_string())
}

/// `major.minor.patch` with an optional pre-release tag and no build metadata.
fn is_plain_semver(s: &str) -> bool {
    semver::Version::parse(s)
        .map(|v| v.build.is_empty())
        .unwrap_or(false)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_versions() {
        for v in ["7.0.0", "0.1.2", "10.20.30", "7.0.0-beta.1", "1.0.0-rc.1.2"] {
            assert_eq!(parse(v), ParsedSpecifier::Exact(v.to_string()), "{}", v);
        }
    }

    #[test]
    fn test_parse_ranges_strip_operator() {
        assert_eq!(
            parse("^7.0.0"),
            ParsedSpecifier::Range(RangeOperator::Caret, "7.0.0".to_string())
        );
        assert_eq!(
            parse("~7.0.0"),
            ParsedSpecifier::Range(RangeOperator::Tilde, "7.0.0".to_string())
        );
        assert_eq!(
            parse("^6.1.0-alpha.3"),
            ParsedSpecifier::Range(RangeOperator::Caret, "6.1.0-alpha.3".to_string())
        );
    }

    #[test]
    fn test_parse_aliases_are_lexical() {
        let cases = [
            ("npm:@capacitor/android@7.0.0", AliasKind::Npm),
            ("jsr:@capacitor/android@7.0.0", AliasKind::Jsr),
            ("github:capacitorjs/capacitor#main", AliasKind::Github),
            ("git+https://github.com/capacitorjs/capacitor.git#main", AliasKind::Git),
            ("file:../capacitor-android", AliasKind::File),
            // remainder is never interpreted
            ("npm:", AliasKind::Npm),
        ];

        for (raw, kind) in cases {
            assert_eq!(parse(raw), ParsedSpecifier::Alias(kind, raw.to_string()), "{}", raw);
        }
    }

    #[test]
    fn test_parse_unparseable_inputs() {
        for raw in [
            "",
            "latest",
            "7.0",
            "v7.0.0",
            "7.0.0+build.5",
            ">=7.0.0",
            "^",
            "^7",
            "~>7.0.0",
            "^ 7.0.0",
            " 7.0.0",
            "7.0.0 || 8.0.0",
            "workspace:*",
            "Npm:foo@1.0.0",
        ] {
            assert_eq!(parse(raw), ParsedSpecifier::Unparseable(raw.to_string()), "{:?}", raw);
        }
    }

    #[test]
    fn test_alias_prefix_wins_over_version_grammar() {
        let table = AliasTable::default().with_prefix("^", AliasKind::File);
        assert_eq!(
            parse_with("^7.0.0", &table),
            ParsedSpecifier::Alias(AliasKind::File, "^7.0.0".to_string())
        );
    }

    #[test]
    fn test_custom_alias_table() {
        let table = AliasTable::default().with_prefix("link:", AliasKind::File);
        assert_eq!(
            parse_with("link:../plugin", &table),
            ParsedSpecifier::Alias(AliasKind::File, "link:../plugin".to_string())
        );
        // Unknown to the default table
        assert_eq!(
            parse("link:../plugin"),
            ParsedSpecifier::Unparseable("link:../plugin".to_string())
        );
        // Empty table falls through to the version grammar
        assert_eq!(
            parse_with("npm:foo@1.0.0", &AliasTable::empty()),
            ParsedSpecifier::Unparseable("npm:foo@1.0.0".to_string())
        );
    }

    #[test]
    fn test_alias_table_ignores_empty_and_duplicate_prefixes() {
        let table = AliasTable::default()
            .with_prefix("", AliasKind::Npm)
            .with_prefix("npm:", AliasKind::File);
        assert_eq!(table.prefixes().count(), 5);
        assert_eq!(table.match_prefix("npm:x"), Some(AliasKind::Npm));
    }

    #[test]
    fn test_raw_reconstructs_declared_string() {
        for raw in ["7.0.0", "^7.0.0", "~7.0.0-beta.1", "file:../x", "latest"] {
            assert_eq!(parse(raw).raw(), raw);
        }
    }

    mod properties {
        use super::*;
        use crate::compat::strategies::{alias_specifier, semver_string};
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_semver_parses_as_exact(v in semver_string()) {
                prop_assert_eq!(parse(&v), ParsedSpecifier::Exact(v.clone()));
            }

            #[test]
            fn test_operator_prefix_parses_as_range(
                v in semver_string(),
                op in prop::sample::select(vec![RangeOperator::Caret, RangeOperator::Tilde])
            ) {
                let raw = format!("{}{}", op.symbol(), v);
                prop_assert_eq!(parse(&raw), ParsedSpecifier::Range(op, v));
            }

            #[test]
            fn test_alias_prefix_is_never_read_as_version(raw in alias_specifier()) {
                prop_assert!(matches!(parse(&raw), ParsedSpecifier::Alias(_, ref s) if *s == raw));
            }

            #[test]
            fn test_build_metadata_is_unparseable(v in semver_string(), build in "[a-z0-9]{1,8}") {
                let raw = format!("{}+{}", v, build);
                prop_assert_eq!(parse(&raw), ParsedSpecifier::Unparseable(raw.clone()));
            }

            #[test]
            fn test_parse_is_total(raw in ".{0,40}") {
                // raw() gives back the declared string for every variant
                prop_assert_eq!(parse(&raw).raw(), raw);
            }
        }
    }
}
