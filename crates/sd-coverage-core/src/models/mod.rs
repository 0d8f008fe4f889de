//! Request and result models shared by coverage providers.

pub mod build_identity;
pub mod coverage_info;
pub mod project_descriptor;

pub use build_identity::{BuildIdentity, COVERAGE_SCOPE_ANNOTATION, MISSING};
pub use coverage_info::{CoverageInfo, CoverageMetrics, EnvVars, NOT_AVAILABLE};
pub use project_descriptor::{ProjectDescriptor, ProjectScope};
