//! Reduction of parsed specifiers to a comparable version.

use serde::{Deserialize, Serialize};

use super::specifier::ParsedSpecifier;

/// A specifier reduced to what the report needs.
///
/// `comparable` is the concrete version to compare against a bundle, when one
/// can be derived without contacting a registry. `display` is what the report
/// shows in the local column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedSpecifier {
    pub comparable: Option<String>,
    pub display: String,
}

/// Ranges resolve to their base version (the operator is dropped, nothing is
/// evaluated against a registry). Aliases and unparseable strings have no
/// comparable version and are displayed verbatim.
pub fn normalize(parsed: &ParsedSpecifier) -> NormalizedSpecifier {
    match parsed {
        ParsedSpecifier::Exact(v) | ParsedSpecifier::Range(_, v) => NormalizedSpecifier {
            comparable: Some(v.clone()),
            display: v.clone(),
        },
        ParsedSpecifier::Alias(_, raw) | ParsedSpecifier::Unparseable(raw) => NormalizedSpecifier {
            comparable: None,
            display: raw.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::specifier::parse;

    #[test]
    fn test_exact_and_range_share_comparable() {
        for raw in ["7.0.0", "^7.0.0", "~7.0.0"] {
            let n = normalize(&parse(raw));
            assert_eq!(n.comparable.as_deref(), Some("7.0.0"));
            assert_eq!(n.display, "7.0.0");
        }
    }

    #[test]
    fn test_prerelease_is_kept() {
        let n = normalize(&parse("~7.0.0-beta.1"));
        assert_eq!(n.comparable.as_deref(), Some("7.0.0-beta.1"));
        assert_eq!(n.display, "7.0.0-beta.1");
    }

    #[test]
    fn test_aliases_have_no_comparable() {
        for raw in [
            "npm:@capacitor/android@7.0.0",
            "jsr:@capacitor/android@7.0.0",
            "github:capacitorjs/capacitor#main",
            "git+https://github.com/capacitorjs/capacitor.git#main",
            "file:../capacitor-android",
        ] {
            let n = normalize(&parse(raw));
            assert!(n.comparable.is_none(), "{}", raw);
            assert_eq!(n.display, raw);
        }
    }

    #[test]
    fn test_unparseable_is_displayed_verbatim() {
        let n = normalize(&parse(">=7.0.0 <8"));
        assert!(n.comparable.is_none());
        assert_eq!(n.display, ">=7.0.0 <8");

        let empty = normalize(&parse(""));
        assert!(empty.comparable.is_none());
        assert_eq!(empty.display, "");
    }

    mod properties {
        use super::*;
        use crate::compat::strategies::{alias_specifier, semver_string};
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_exact_comparable_is_the_version(v in semver_string()) {
                let n = normalize(&parse(&v));
                prop_assert_eq!(n.comparable.as_deref(), Some(v.as_str()));
                prop_assert_eq!(n.display, v);
            }

            #[test]
            fn test_range_comparable_drops_operator(
                v in semver_string(),
                op in prop::sample::select(vec!['^', '~'])
            ) {
                let n = normalize(&parse(&format!("{}{}", op, v)));
                prop_assert_eq!(n.comparable.as_deref(), Some(v.as_str()));
                prop_assert_eq!(n.display, v);
            }

            #[test]
            fn test_alias_display_is_unchanged(raw in alias_specifier()) {
                let n = normalize(&parse(&raw));
                prop_assert!(n.comparable.is_none());
                prop_assert_eq!(n.display, raw);
            }
        }
    }
}
