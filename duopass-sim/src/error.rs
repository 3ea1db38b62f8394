//! Simulator errors

use std::path::PathBuf;

use duopass_core::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid controller configuration: {0:?}")]
    Controller(ConfigError),

    #[error("invalid plant configuration: {0}")]
    Plant(&'static str),

    #[error("invalid run configuration: {0}")]
    Run(&'static str),
}

impl From<ConfigError> for SimError {
    fn from(err: ConfigError) -> Self {
        SimError::Controller(err)
    }
}
