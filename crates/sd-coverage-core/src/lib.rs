//! # sd-coverage-core
//!
//! Foundation crate for Screwdriver coverage providers.
//! Defines the build identity and result models, the provider trait,
//! errors, config, and tracing setup. Provider crates depend on this.

pub mod config;
pub mod errors;
pub mod models;
pub mod tracing;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::SonarConfig;
pub use errors::{CoverageError, CoverageResult};
pub use models::{
    BuildIdentity, CoverageInfo, CoverageMetrics, EnvVars, ProjectDescriptor, ProjectScope,
};
pub use traits::ICoverageProvider;
