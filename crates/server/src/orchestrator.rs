//! # Recommendation Orchestrator
//!
//! The single entry point of the system. Per call it:
//! 1. Reads the full review set from the injected store
//! 2. Classifies the user: fewer than 5 ratings means cold start
//! 3. Cold start → popularity ranking over the whole store
//! 4. Otherwise → latent-factor fit + scoring under `spawn_blocking`
//! 5. Enriches personalized results through the program catalog,
//!    substituting placeholders for catalog misses
//!
//! The branch is chosen once per call; nothing is cached between
//! calls, so two concurrent requests simply do their own full read and
//! fit against an effectively read-only store.

use std::time::Instant;

use rec_engine::{
    rating_triples, recommend_personalized, top_popular, user_rating_count, EngineError,
    FactorConfig,
};
use review_store::{ProgramId, ReviewRecord, ReviewStore, StoreError};
use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::ProgramCatalog;

/// Users with fewer ratings than this are served popularity results.
pub const COLD_START_THRESHOLD: usize = 5;

/// Number of recommendations returned when the caller does not ask for
/// a specific count.
pub const DEFAULT_LIMIT: usize = 10;

/// Final recommendation returned to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub program_id: ProgramId,
    pub title: String,
    pub supplement: String,
}

/// Errors that fail a recommendation call outright.
///
/// Per-item enrichment misses and insufficient-data fits are recovered
/// internally and never surface here.
#[derive(Error, Debug)]
pub enum RecommendError {
    /// The review store could not be read at all
    #[error("failed to read review store: {0}")]
    Store(#[from] StoreError),

    /// The blocking scoring task panicked
    #[error("personalized scoring task failed: {0}")]
    Task(String),
}

/// Main orchestrator, generic over its two injected collaborators.
pub struct Recommender<S, C> {
    store: S,
    catalog: C,
    cold_start_threshold: usize,
    factor_config: FactorConfig,
}

impl<S, C> Recommender<S, C>
where
    S: ReviewStore + Send + Sync,
    C: ProgramCatalog + Send + Sync,
{
    pub fn new(store: S, catalog: C) -> Self {
        Self {
            store,
            catalog,
            cold_start_threshold: COLD_START_THRESHOLD,
            factor_config: FactorConfig::default(),
        }
    }

    /// Override the cold-start policy constant.
    pub fn with_cold_start_threshold(mut self, threshold: usize) -> Self {
        self.cold_start_threshold = threshold;
        self
    }

    /// Override the factorization hyperparameters.
    pub fn with_factor_config(mut self, config: FactorConfig) -> Self {
        self.factor_config = config;
        self
    }

    /// Get up to `limit` recommendations for a user.
    ///
    /// Returns fewer than `limit` items when fewer eligible candidates
    /// exist; that is not an error. A user unknown to the store simply
    /// has zero ratings and lands on the cold-start branch.
    pub async fn recommend(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Recommendation>, RecommendError> {
        let start_time = Instant::now();

        let records = self.store.read_all().await?;
        let triples = rating_triples(&records);
        let history = user_rating_count(&triples, user_id);

        info!(
            user_id,
            records = records.len(),
            ratings = triples.len(),
            history,
            "loaded rating set"
        );

        if history < self.cold_start_threshold {
            let recommendations = self.popularity_recommendations(&records, limit);
            info!(
                user_id,
                count = recommendations.len(),
                elapsed = ?start_time.elapsed(),
                "served cold-start recommendations"
            );
            return Ok(recommendations);
        }

        // CPU-bound fit + scoring; keep it off the async threads
        let owned_triples = triples;
        let owned_user = user_id.to_string();
        let config = self.factor_config.clone();
        let result = tokio::task::spawn_blocking(move || {
            recommend_personalized(&owned_triples, &owned_user, limit, &config)
        })
        .await
        .map_err(|e| RecommendError::Task(e.to_string()))?;

        let program_ids = match result {
            Ok(ids) => ids,
            Err(EngineError::InsufficientData { users, programs }) => {
                warn!(
                    user_id,
                    users, programs, "rating set too thin to fit; falling back to popularity"
                );
                return Ok(self.popularity_recommendations(&records, limit));
            }
        };

        let recommendations = self.enrich(program_ids).await;
        info!(
            user_id,
            count = recommendations.len(),
            elapsed = ?start_time.elapsed(),
            "served personalized recommendations"
        );
        Ok(recommendations)
    }

    /// Map a popularity ranking straight into recommendations. The
    /// entry's own title and review count stand in for enrichment; no
    /// catalog lookups happen on this path.
    fn popularity_recommendations(
        &self,
        records: &[ReviewRecord],
        limit: usize,
    ) -> Vec<Recommendation> {
        top_popular(records, limit)
            .into_iter()
            .map(|entry| Recommendation {
                title: entry.display_title,
                supplement: format!("Popular program ({} reviews)", entry.support_count),
                program_id: entry.program_id,
            })
            .collect()
    }

    /// Look up display metadata for each program id, in order. A miss
    /// for one program never aborts the batch; that program gets the
    /// deterministic placeholder strings.
    async fn enrich(&self, program_ids: Vec<ProgramId>) -> Vec<Recommendation> {
        let mut recommendations = Vec::with_capacity(program_ids.len());
        for program_id in program_ids {
            let recommendation = match self.catalog.lookup(&program_id).await {
                Some(details) => Recommendation {
                    program_id,
                    title: details.title,
                    supplement: details.supplement,
                },
                None => Recommendation {
                    title: format!("Program {program_id}"),
                    supplement: format!("Details of Program {program_id}"),
                    program_id,
                },
            };
            recommendations.push(recommendation);
        }
        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PlaceholderCatalog, StaticCatalog};
    use review_store::{MemoryStore, Result as StoreResult};

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    fn record(user: &str, program: &str, title: &str, rating: i32) -> ReviewRecord {
        ReviewRecord::new(user, program, title, rating)
    }

    /// Small but fast factorization settings for tests.
    fn test_config() -> FactorConfig {
        FactorConfig::default().with_factors(8).with_epochs(20)
    }

    fn recommender(records: Vec<ReviewRecord>) -> Recommender<MemoryStore, PlaceholderCatalog> {
        Recommender::new(MemoryStore::with_records(records), PlaceholderCatalog)
            .with_factor_config(test_config())
    }

    /// A community where "u1" has enough history to personalize:
    /// 6 ratings, with several other users spread over 12 programs.
    fn established_community() -> Vec<ReviewRecord> {
        let mut records = Vec::new();
        for p in 1..=6 {
            records.push(record("u1", &format!("p{p}"), &format!("Show {p}"), 4));
        }
        for u in 2..=5 {
            let user = format!("u{u}");
            for p in 1..=12 {
                if (p + u) % 2 == 0 {
                    let rating = (p % 5 + 1) as i32;
                    records.push(record(&user, &format!("p{p}"), &format!("Show {p}"), rating));
                }
            }
        }
        records
    }

    /// Store that always fails, for propagation tests.
    struct FailingStore;

    impl ReviewStore for FailingStore {
        async fn read_all(&self) -> StoreResult<Vec<ReviewRecord>> {
            Err(StoreError::Unavailable("connection refused".into()))
        }

        async fn append(&self, _record: ReviewRecord) -> StoreResult<()> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
    }

    // ============================================================================
    // Cold-start path
    // ============================================================================

    #[tokio::test]
    async fn test_empty_store_returns_empty_list() {
        let recommender = recommender(Vec::new());
        let recs = recommender.recommend("u1", 5).await.unwrap();
        assert!(recs.is_empty());
    }

    #[tokio::test]
    async fn test_thin_history_gets_popularity_ranking() {
        // u1 has only 2 ratings; everything comes back ranked by
        // review count over the entire store, own reviews included
        let records = vec![
            record("u1", "p1", "Show 1", 5),
            record("u1", "p2", "Show 2", 4),
            record("u2", "p1", "Show 1", 3),
            record("u3", "p1", "Show 1", 4),
            record("u2", "p3", "Show 3", 5),
            record("u3", "p3", "Show 3", 2),
        ];
        let expected = top_popular(&records, 5);

        let recommender = recommender(records);
        let recs = recommender.recommend("u1", 5).await.unwrap();

        assert_eq!(recs.len(), 3);
        for (rec, entry) in recs.iter().zip(&expected) {
            assert_eq!(rec.program_id, entry.program_id);
            assert_eq!(rec.title, entry.display_title);
            assert_eq!(
                rec.supplement,
                format!("Popular program ({} reviews)", entry.support_count)
            );
        }
        // p1 has 3 reviews, p3 has 2, p2 has 1
        assert_eq!(recs[0].program_id, "p1");
        assert_eq!(recs[1].program_id, "p3");
        assert_eq!(recs[2].program_id, "p2");
    }

    #[tokio::test]
    async fn test_cold_start_may_resurface_rated_programs() {
        let records = vec![
            record("u1", "p1", "Show 1", 5),
            record("u2", "p1", "Show 1", 4),
        ];
        let recommender = recommender(records);

        let recs = recommender.recommend("u1", 5).await.unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].program_id, "p1");
    }

    #[tokio::test]
    async fn test_cold_start_is_idempotent() {
        let recommender = recommender(vec![
            record("u1", "p2", "Show 2", 3),
            record("u2", "p1", "Show 1", 4),
            record("u3", "p1", "Show 1", 4),
            record("u4", "p3", "Show 3", 4),
        ]);

        let first = recommender.recommend("u1", 10).await.unwrap();
        let second = recommender.recommend("u1", 10).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_four_ratings_is_still_cold_start() {
        let mut records = Vec::new();
        for p in 1..=4 {
            records.push(record("u1", &format!("p{p}"), &format!("Show {p}"), 5));
        }
        // Make u1's own programs the most popular ones
        for u in 2..=4 {
            for p in 1..=4 {
                records.push(record(
                    &format!("u{u}"),
                    &format!("p{p}"),
                    &format!("Show {p}"),
                    3,
                ));
            }
        }
        records.push(record("u2", "p9", "Show 9", 5));

        let recommender = recommender(records);
        let recs = recommender.recommend("u1", 4).await.unwrap();

        // Cold start re-surfaces u1's own programs; the personalized
        // path could never return them
        assert!(recs.iter().any(|r| r.program_id == "p1"));
    }

    // ============================================================================
    // Personalized path
    // ============================================================================

    #[tokio::test]
    async fn test_personalized_excludes_rated_programs() {
        let recommender = recommender(established_community());
        let recs = recommender.recommend("u1", 10).await.unwrap();

        assert!(!recs.is_empty());
        assert!(recs.len() <= 10);
        for p in 1..=6 {
            assert!(
                !recs.iter().any(|r| r.program_id == format!("p{p}")),
                "p{p} was already rated by u1"
            );
        }
    }

    #[tokio::test]
    async fn test_personalized_respects_limit() {
        let recommender = recommender(established_community());
        let recs = recommender.recommend("u1", 2).await.unwrap();
        assert_eq!(recs.len(), 2);
    }

    #[tokio::test]
    async fn test_catalog_miss_gets_placeholder_details() {
        let recommender = recommender(established_community());
        let recs = recommender.recommend("u1", 10).await.unwrap();

        assert!(!recs.is_empty());
        for rec in &recs {
            assert_eq!(rec.title, format!("Program {}", rec.program_id));
            assert_eq!(
                rec.supplement,
                format!("Details of Program {}", rec.program_id)
            );
        }
    }

    #[tokio::test]
    async fn test_catalog_hit_uses_real_details() {
        let mut catalog = StaticCatalog::new();
        for p in 7..=12 {
            catalog.insert(
                format!("p{p}"),
                format!("Catalog Show {p}"),
                format!("Airs nightly, channel {p}"),
            );
        }
        let recommender =
            Recommender::new(MemoryStore::with_records(established_community()), catalog)
                .with_factor_config(test_config());

        let recs = recommender.recommend("u1", 10).await.unwrap();
        assert!(!recs.is_empty());
        for rec in &recs {
            let number: u32 = rec.program_id.trim_start_matches('p').parse().unwrap();
            assert_eq!(rec.title, format!("Catalog Show {number}"));
            assert_eq!(rec.supplement, format!("Airs nightly, channel {number}"));
        }
    }

    #[tokio::test]
    async fn test_single_user_store_falls_back_to_popularity() {
        // u1 has plenty of history but is the only reviewer; the fit
        // is impossible, so popularity (including own programs) serves
        let mut records = Vec::new();
        for p in 1..=6 {
            records.push(record("u1", &format!("p{p}"), &format!("Show {p}"), 4));
        }
        let recommender = recommender(records);

        let recs = recommender.recommend("u1", 10).await.unwrap();
        assert_eq!(recs.len(), 6);
        assert!(recs.iter().any(|r| r.program_id == "p1"));
        assert!(recs[0].supplement.starts_with("Popular program"));
    }

    // ============================================================================
    // Failure propagation
    // ============================================================================

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let recommender = Recommender::new(FailingStore, PlaceholderCatalog);
        let result = recommender.recommend("u1", 5).await;
        assert!(matches!(result, Err(RecommendError::Store(_))));
    }
}
