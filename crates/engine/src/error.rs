//! Error types for the recommendation engine.

use thiserror::Error;

/// Errors the engine can surface to its caller.
///
/// Degenerate rating sets are reported explicitly instead of letting
/// the factorization fail with an opaque numeric error; the
/// orchestrator treats this as a signal to fall back to popularity
/// ranking.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The rating set is too small to fit a latent-factor model
    #[error(
        "Insufficient data to fit a model: {users} distinct user(s), {programs} distinct program(s)"
    )]
    InsufficientData { users: usize, programs: usize },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, EngineError>;
