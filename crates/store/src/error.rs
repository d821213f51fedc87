//! Error types for the review-store crate.
//!
//! Rust error handling concepts demonstrated:
//! - thiserror for defining custom error types
//! - Enum variants for different error cases
//! - Automatic `Display` and `Error` trait implementations

use thiserror::Error;

/// Errors that can occur while reading or writing reviews.
///
/// Individual malformed rows are not errors: they are dropped during
/// loading. These variants cover total failures only, which must reach
/// the caller rather than degrade into a silent empty result.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error occurred while reading the backing data
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The dataset as a whole could not be decoded
    #[error("Malformed review dataset: {0}")]
    Malformed(String),

    /// The store itself is unreachable or in an unusable state
    #[error("Review store unavailable: {0}")]
    Unavailable(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, StoreError>;
