//! Popularity ranker.
//!
//! Ranks programs by how many reviews they have received ("support
//! count") regardless of rating value. This is both the cold-start
//! serving path and the building block for catalog-wide statistics.
//!
//! ## Algorithm
//! 1. Group records by program, counting occurrences
//! 2. Remember the last title scanned for each program
//! 3. Sort by count descending, program id ascending on ties
//! 4. Truncate to the first `n`
//!
//! The lexical tie-break makes the ordering a total order, so two
//! successive calls over an unchanged record set return identical
//! lists.

use crate::types::PopularityEntry;
use review_store::{ProgramId, ReviewRecord};
use std::collections::HashMap;
use tracing::debug;

/// Return the `n` most-reviewed programs, most popular first.
///
/// Operates on the full, unfiltered record set: when used as the
/// cold-start fallback it may re-surface programs the requesting user
/// has already reviewed. The attached title is the last one seen while
/// scanning, which need not be the most recent or canonical title.
pub fn top_popular(records: &[ReviewRecord], n: usize) -> Vec<PopularityEntry> {
    let mut counts: HashMap<&ProgramId, usize> = HashMap::new();
    let mut titles: HashMap<&ProgramId, &str> = HashMap::new();

    for record in records {
        if record.program_id.is_empty() {
            continue;
        }
        *counts.entry(&record.program_id).or_insert(0) += 1;
        titles.insert(&record.program_id, &record.program_title);
    }

    let mut ranked: Vec<(&ProgramId, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(n);

    debug!(programs = ranked.len(), limit = n, "ranked programs by review count");

    ranked
        .into_iter()
        .map(|(program_id, support_count)| PopularityEntry {
            program_id: program_id.clone(),
            support_count,
            display_title: titles
                .get(program_id)
                .map(|t| t.to_string())
                .unwrap_or_else(|| format!("Program {program_id}")),
        })
        .collect()
}
