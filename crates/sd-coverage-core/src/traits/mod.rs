pub mod coverage_provider;

pub use coverage_provider::ICoverageProvider;
