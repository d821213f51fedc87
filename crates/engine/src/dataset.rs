//! Rating dataset accessor.
//!
//! Normalizes raw stored records into the clean `(user, program,
//! rating)` triples the rankers consume. Validity is checked
//! explicitly (empty-string ids, out-of-range ratings) rather than by
//! truthiness, so a rating of 0 is rejected by the range check and not
//! conflated with "missing".

use crate::types::RatingTriple;
use review_store::ReviewRecord;
use tracing::debug;

/// Declared rating scale, inclusive.
pub const RATING_SCALE: (i32, i32) = (1, 5);

/// Project review records into rating triples, dropping invalid ones.
///
/// A record is excluded when `user_id` or `program_id` is empty or the
/// rating falls outside the declared scale. Ratings are coerced to
/// `f32`. No ordering beyond the input order is guaranteed.
pub fn rating_triples(records: &[ReviewRecord]) -> Vec<RatingTriple> {
    let triples: Vec<RatingTriple> = records
        .iter()
        .filter(|r| {
            !r.user_id.is_empty()
                && !r.program_id.is_empty()
                && r.rating >= RATING_SCALE.0
                && r.rating <= RATING_SCALE.1
        })
        .map(|r| RatingTriple {
            user_id: r.user_id.clone(),
            program_id: r.program_id.clone(),
            rating: r.rating as f32,
        })
        .collect();

    if triples.len() < records.len() {
        debug!(
            dropped = records.len() - triples.len(),
            kept = triples.len(),
            "excluded invalid review records from rating set"
        );
    }

    triples
}

/// Number of ratings a user contributed to the given set.
pub fn user_rating_count(triples: &[RatingTriple], user_id: &str) -> usize {
    triples.iter().filter(|t| t.user_id == user_id).count()
}
