//! Configuration merging and validation (spec §4.7).

mod config;
mod error;
mod validated;

pub use config::{Config, FileDiscoveryConfig, MemoryConfig, Options, TestingConfig, DEFAULT_MAX_DEPTH};
pub use error::ConfigurationError;
pub use validated::{validate, ValidatedConfig};
