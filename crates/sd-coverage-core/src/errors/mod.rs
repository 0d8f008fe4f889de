//! Error handling for coverage providers.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod http_error;
pub mod provision_error;

pub use config_error::ConfigError;
pub use http_error::HttpError;
pub use provision_error::ProvisionError;

/// Top-level error for every coverage provider operation.
#[derive(Debug, thiserror::Error)]
pub enum CoverageError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Provision(#[from] ProvisionError),

    #[error(transparent)]
    Http(#[from] HttpError),
}

pub type CoverageResult<T> = Result<T, CoverageError>;
