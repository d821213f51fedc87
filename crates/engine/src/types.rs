//! Working types for the recommendation engine.

use review_store::{ProgramId, UserId};
use serde::{Deserialize, Serialize};

/// The engine's projection of a stored review: who rated what, and how.
///
/// Titles, review text, and timestamps are dropped; this is the unit
/// both rankers operate on. Triples are derived freshly from the store
/// on every request and live only for that request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingTriple {
    pub user_id: UserId,
    pub program_id: ProgramId,
    pub rating: f32,
}

impl RatingTriple {
    pub fn new(user_id: impl Into<UserId>, program_id: impl Into<ProgramId>, rating: f32) -> Self {
        Self {
            user_id: user_id.into(),
            program_id: program_id.into(),
            rating,
        }
    }
}

/// One entry in a popularity ranking.
///
/// `support_count` is the number of reviews the program has received
/// across all users; rating values do not contribute. `display_title`
/// is whichever title was scanned last for that program, which need not
/// be canonical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularityEntry {
    pub program_id: ProgramId,
    pub support_count: usize,
    pub display_title: String,
}
