use std::path::PathBuf;

use thiserror::Error;

use crate::env::MissingEnvVarError;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    MissingEnvVar(#[from] MissingEnvVarError),

    #[error("invalid config at '{path}': {message}")]
    Invalid { path: String, message: String },
}
