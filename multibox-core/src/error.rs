use std::path::PathBuf;

use thiserror::Error;

/// Rejections at the configuration boundary. Stepping and parsing never fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumberBoxError {
    #[error("minimum {minimum} is greater than maximum {maximum}")]
    InvertedRange { minimum: f64, maximum: f64 },

    #[error("range bounds must be numbers, got NaN")]
    NanBound,

    #[error("tick frequency must be a positive finite number, got {0}")]
    InvalidTickFrequency(f64),

    #[error("number box engine has stopped")]
    EngineStopped,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(#[from] NumberBoxError),
}
