//! Generators for version and specifier strings used by property tests.

use proptest::prelude::*;

/// `major.minor.patch` without a pre-release tag.
pub fn release_version() -> impl Strategy<Value = String> {
    (0u64..1000, 0u64..1000, 0u64..1000).prop_map(|(major, minor, patch)| {
        format!("{}.{}.{}", major, minor, patch)
    })
}

/// Dot-separated pre-release tag; numeric identifiers have no leading zeros.
pub fn prerelease_tag() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,7}(\\.(0|[1-9][0-9]{0,3}|[a-z][a-z0-9]{0,5})){0,2}"
}

/// `major.minor.patch[-pre]`
pub fn semver_string() -> impl Strategy<Value = String> {
    (release_version(), proptest::option::of(prerelease_tag())).prop_map(|(release, pre)| {
        match pre {
            Some(pre) => format!("{}-{}", release, pre),
            None => release,
        }
    })
}

/// A string starting with one of the built-in alias prefixes.
pub fn alias_specifier() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["npm:", "jsr:", "github:", "git+", "file:"]),
        ".{0,40}",
    )
        .prop_map(|(prefix, rest)| format!("{}{}", prefix, rest))
}
