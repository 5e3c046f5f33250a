//! Simulator error types.

use flocc_core::ConfigurationError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or assembling a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Scenario parse failed: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Scenario render failed: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("Invalid per-action timeout {value:?}: {source}")]
    InvalidTimeout {
        value: String,
        #[source]
        source: humantime::DurationError,
    },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}
