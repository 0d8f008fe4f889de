use crate::errors::CoverageResult;
use crate::models::{BuildIdentity, CoverageInfo};

/// A pluggable coverage backend for the CI job system.
pub trait ICoverageProvider: Send + Sync {
    /// Issue a token the build uses to upload coverage for its project.
    fn get_access_token(&self, identity: &BuildIdentity) -> CoverageResult<String>;

    /// Upload destination for a running build, plus coverage results once
    /// the build has a start and end time.
    fn get_info(&self, identity: &BuildIdentity) -> CoverageResult<CoverageInfo>;

    /// Shell command the build runs to upload its coverage.
    fn get_upload_coverage_cmd(&self, identity: &BuildIdentity) -> CoverageResult<String>;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}
