//! Error types for storage and configuration.
//!
//! Storage errors are recovered inside [`Persistence`](crate::persistence::Persistence):
//! reads fall back to defaults and writes are dropped, both with a warning.
//! They only surface through the [`StorageBackend`](crate::persistence::StorageBackend)
//! trait so custom backends can report what went wrong.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Errors raised by a key-value storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage corruption: {0}")]
    Corruption(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while loading or validating an [`EditorConfig`](crate::config::EditorConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("at least one column label is required")]
    NoColumns,

    #[error("invalid {name} bounds: min {min} > max {max}")]
    InvertedBounds {
        name: &'static str,
        min: f32,
        max: f32,
    },

    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidValue { name: &'static str, value: f32 },
}
