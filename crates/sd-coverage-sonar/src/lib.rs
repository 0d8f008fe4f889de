//! # sd-coverage-sonar
//!
//! SonarQube coverage provider for Screwdriver. Resolves a build's
//! pipeline/job/PR identity onto a SonarQube project, provisions the project,
//! a scan-only user and a token for it, renders the upload command, and reads
//! coverage and test results back after the job finishes.
//!
//! No retries and no local state: every call either succeeds, is an
//! idempotent "already exists", or fails immediately.

pub mod api;
pub mod engine;
pub mod metrics;
pub mod project;
pub mod provision;
pub mod transport;
pub mod upload;

pub use engine::SonarCoverage;
pub use metrics::{get_metrics, MetricsQuery};
pub use project::ProjectResolver;
pub use provision::{ProvisionTarget, Provisioner};
pub use transport::{HttpClient, HttpClientConfig, ISonarTransport, Method, SonarRequest};
pub use upload::{render_upload_command, UPLOAD_TEMPLATE};
