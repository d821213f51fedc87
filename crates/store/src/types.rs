//! Core domain types for the review store.
//!
//! This module defines the records the rest of the system operates on.
//! Key Rust concepts demonstrated here:
//! - Type aliases for domain clarity (UserId, ProgramId)
//! - Structs with public fields
//! - Derive macros for common traits

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================
// Identifiers are opaque strings assigned by whatever system authenticated the
// user or catalogued the program. The engine never inspects their contents.

/// Unique identifier for a user
pub type UserId = String;

/// Unique identifier for a program (a broadcast/show)
pub type ProgramId = String;

// =============================================================================
// Review Record
// =============================================================================

/// A single stored review: one user's rating of one program.
///
/// Records are immutable once written and are never deleted. The
/// recommendation engine only ever reads them; writes happen on the
/// review-submission path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub review_id: String,
    pub program_id: ProgramId,
    /// Title as entered at review time. The same program can carry
    /// different titles across records.
    pub program_title: String,
    pub user_id: UserId,
    /// Rating on a 1-5 scale. Stored as written; range is enforced when
    /// the engine projects records into rating triples.
    pub rating: i32,
    pub review_text: String,
    /// Unix timestamp (seconds) when the review was written
    pub created_at: i64,
}

impl ReviewRecord {
    /// Convenience constructor for the common fields; `review_id` and
    /// `created_at` are left for the caller that owns those concerns.
    pub fn new(
        user_id: impl Into<UserId>,
        program_id: impl Into<ProgramId>,
        program_title: impl Into<String>,
        rating: i32,
    ) -> Self {
        Self {
            review_id: String::new(),
            program_id: program_id.into(),
            program_title: program_title.into(),
            user_id: user_id.into(),
            rating,
            review_text: String::new(),
            created_at: 0,
        }
    }
}
