//! Loader for JSON review datasets.
//!
//! The CLI seeds a `MemoryStore` from a JSON array of review objects.
//! Loading is deliberately lenient at the row level: a row missing its
//! user, program, or rating is skipped (and counted), matching how the
//! serving path treats incomplete records. A file that cannot be read
//! or decoded at all is a hard error.
//!
//! Rust concepts you'll learn here:
//! - Lenient deserialization through an intermediate "raw" struct
//! - Error handling with the `?` operator
//! - Data-parallel transformation with Rayon

use crate::error::{Result, StoreError};
use crate::types::ReviewRecord;
use rayon::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Row shape as it appears on disk. Every field is optional so a single
/// bad row cannot fail the whole dataset.
#[derive(Debug, Deserialize)]
struct RawReview {
    review_id: Option<String>,
    program_id: Option<String>,
    program_title: Option<String>,
    user_id: Option<String>,
    rating: Option<i32>,
    review_text: Option<String>,
    created_at: Option<i64>,
}

impl RawReview {
    /// Promote a raw row to a full record. `None` means the row lacked a
    /// required field and must be dropped. Presence is checked
    /// explicitly; a stored rating of 0 survives to this point and is
    /// rejected later by the range check in the engine, not by a
    /// truthiness test here.
    fn into_record(self) -> Option<ReviewRecord> {
        let program_id = self.program_id?;
        let user_id = self.user_id?;
        let rating = self.rating?;
        if program_id.is_empty() || user_id.is_empty() {
            return None;
        }
        Some(ReviewRecord {
            review_id: self.review_id.unwrap_or_default(),
            program_id,
            program_title: self.program_title.unwrap_or_else(|| "No Title".to_string()),
            user_id,
            rating,
            review_text: self.review_text.unwrap_or_default(),
            created_at: self.created_at.unwrap_or(0),
        })
    }
}

/// Load review records from a JSON file.
///
/// Returns `StoreError::Io` if the file cannot be read and
/// `StoreError::Malformed` if it is not a JSON array of review objects.
pub fn load_records(path: &Path) -> Result<Vec<ReviewRecord>> {
    let data = fs::read_to_string(path)?;
    records_from_str(&data)
}

/// Decode review records from a JSON string.
pub fn records_from_str(data: &str) -> Result<Vec<ReviewRecord>> {
    let raw: Vec<RawReview> =
        serde_json::from_str(data).map_err(|e| StoreError::Malformed(e.to_string()))?;

    let total = raw.len();
    let records: Vec<ReviewRecord> = raw
        .into_par_iter()
        .filter_map(RawReview::into_record)
        .collect();

    if records.len() < total {
        warn!(
            skipped = total - records.len(),
            kept = records.len(),
            "dropped incomplete review rows"
        );
    }

    Ok(records)
}
