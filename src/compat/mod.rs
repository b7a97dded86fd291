//! Compat module - native dependency compatibility between a bundle and the
//! local project.
//!
//! Components, leaf first:
//! - **Specifier**: [`parse`] classifies raw manifest strings into [`ParsedSpecifier`]
//! - **Normalize**: [`normalize`] reduces a specifier to a comparable version
//! - **Evaluate**: [`evaluate`] produces a [`Verdict`] per package
//! - **Report**: [`build`] joins a snapshot with a manifest into ordered rows
//! - **Render**: [`render_table`] draws the rows as a text table
//!
//! Everything here is pure and synchronous.

pub mod evaluate;
pub mod normalize;
pub mod render;
pub mod report;
pub mod specifier;

#[cfg(test)]
pub(crate) mod strategies;

pub use evaluate::{evaluate, Verdict};
pub use normalize::{normalize, NormalizedSpecifier};
pub use render::render_table;
pub use report::{build, build_with, CompatibilityReport, CompatibilityRow, ReportSummary};
pub use specifier::{parse, parse_with, AliasKind, AliasTable, ParsedSpecifier, RangeOperator};
