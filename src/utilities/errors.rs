//! Error types for Muza.
//!
//! The HyperBit operations themselves never fail; these cover the edges:
//! export, table loading and configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MuzaError {
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A label that is not one of the known emotions.
    #[error("Unknown emotion label: {0}")]
    UnknownEmotion(String),

    /// The web page template failed to parse or render.
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    /// An environment or CLI setting could not be parsed.
    #[error("Invalid configuration value for {key}: {message}")]
    Config { key: String, message: String },
}
