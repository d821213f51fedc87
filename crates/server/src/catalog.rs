//! Detail enrichment boundary.
//!
//! Given a program id, a catalog returns display metadata (title plus a
//! supplementary line) or nothing at all. The orchestrator substitutes
//! deterministic placeholders on a miss, so a sparse catalog never
//! fails a recommendation call.

use review_store::ProgramId;
use std::collections::HashMap;
use std::future::Future;

/// Display metadata for one program.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramDetails {
    pub title: String,
    pub supplement: String,
}

/// Lookup interface for program display metadata.
///
/// Implementations may be backed by a database, a remote service, or a
/// plain map; per-item misses are expressed as `None`, never as errors.
pub trait ProgramCatalog {
    fn lookup(&self, program_id: &str) -> impl Future<Output = Option<ProgramDetails>> + Send;
}

/// Catalog backed by an in-memory map. Used by the CLI and tests.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    entries: HashMap<ProgramId, ProgramDetails>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        program_id: impl Into<ProgramId>,
        title: impl Into<String>,
        supplement: impl Into<String>,
    ) {
        self.entries.insert(
            program_id.into(),
            ProgramDetails {
                title: title.into(),
                supplement: supplement.into(),
            },
        );
    }
}

impl ProgramCatalog for StaticCatalog {
    async fn lookup(&self, program_id: &str) -> Option<ProgramDetails> {
        self.entries.get(program_id).cloned()
    }
}

/// Catalog that knows nothing; every lookup misses.
///
/// Mirrors a deployment where no program metadata has been ingested
/// yet: the orchestrator's placeholders carry the response.
#[derive(Debug, Default)]
pub struct PlaceholderCatalog;

impl ProgramCatalog for PlaceholderCatalog {
    async fn lookup(&self, _program_id: &str) -> Option<ProgramDetails> {
        None
    }
}
