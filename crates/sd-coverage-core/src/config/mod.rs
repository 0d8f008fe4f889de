//! Provider configuration.

pub mod defaults;
pub mod sonar_config;

pub use sonar_config::SonarConfig;
