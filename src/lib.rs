pub mod compat;
pub mod config;
pub mod executor;
pub mod model;
pub mod providers;
pub mod traits;
pub mod upload;

// Re-export common types for convenience
pub use compat::{
    build, evaluate, normalize, parse, render_table, CompatibilityReport, CompatibilityRow,
    ParsedSpecifier, Verdict,
};
pub use config::CompatConfig;
pub use executor::*;
pub use model::*;
pub use traits::*;
