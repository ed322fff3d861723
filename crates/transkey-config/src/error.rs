//! Failures while reading, merging or checking resolver options.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// An option layer could not be read from disk.
    #[error("cannot read option layer {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// An option layer is not a JSON5 document.
    #[error("option layer {layer} is not valid JSON5: {source}")]
    ParseFailed { layer: String, source: json5::Error },
    /// The merged document passed the field table but does not decode.
    #[error("options do not decode: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// One option holds an unusable value. `path` is `layer:field` for
    /// structural checks and the bare field name for semantic ones.
    #[error("option {path} rejected: {message}")]
    InvalidField { path: String, message: String },
    /// Options that are fine one by one but conflict as a whole.
    #[error("inconsistent options: {0}")]
    Invalid(String),
}
