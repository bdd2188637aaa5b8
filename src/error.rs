//! Error types for gkecc
//!
//! Library code uses `crate::error::Result<T>` which returns `GkeccError`.
//! The CLI boundary in `main.rs` prints errors as `Error: <message>` and
//! exits nonzero.
//!
//! Two conditions are deliberately NOT errors:
//! - a stale or corrupted SKU cache (logged, falls back to a fresh fetch)
//! - an empty result after filtering (logged as a warning, exit code zero)

use thiserror::Error;

/// Main error type for gkecc
#[derive(Error, Debug)]
pub enum GkeccError {
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Catalog error: {message}")]
    Catalog {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GkeccError {
    /// Transport or remote-catalog failure with an underlying cause.
    pub fn catalog(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        GkeccError::Catalog {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, GkeccError>;
