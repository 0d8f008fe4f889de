//! Mapping of build identity onto SonarQube project naming.

pub mod resolver;

pub use resolver::ProjectResolver;
