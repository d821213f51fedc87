//! # Recommendation Engine Crate
//!
//! The decision core of the system: given the stored rating set, pick
//! programs for a user.
//!
//! ## Components
//!
//! ### Rating Dataset Accessor (`dataset`)
//! Projects raw review records into clean `(user, program, rating)`
//! triples, dropping records with empty ids or out-of-scale ratings.
//!
//! ### Popularity Ranker (`popularity`)
//! Counts reviews per program and produces a deterministic top-N
//! ordering. Serves the cold-start path and catalog-wide statistics.
//!
//! ### Latent-Factor Recommender (`latent`)
//! Biased matrix factorization over the user×program rating matrix,
//! trained by SGD with a seeded initialization, scoring every program
//! the user has not yet reviewed.
//!
//! ## Example Usage
//!
//! ```ignore
//! use rec_engine::{rating_triples, recommend_personalized, top_popular, FactorConfig};
//!
//! let triples = rating_triples(&records);
//! let recs = recommend_personalized(&triples, "u1", 10, &FactorConfig::default())?;
//! let popular = top_popular(&records, 10);
//! ```
//!
//! The engine is synchronous and holds no state across calls: every
//! invocation derives its triples and (on the personalized path) fits
//! its model from scratch. Nothing here suspends or caches; latency is
//! paid in full per call and mutual exclusion is never needed.

// Public modules
pub mod dataset;
pub mod error;
pub mod latent;
pub mod popularity;
pub mod types;

// Re-export commonly used items for convenience
pub use dataset::{rating_triples, user_rating_count, RATING_SCALE};
pub use error::{EngineError, Result};
pub use latent::{recommend_personalized, FactorConfig, LatentFactorModel};
pub use popularity::top_popular;
pub use types::{PopularityEntry, RatingTriple};
