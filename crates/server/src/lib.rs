//! Server crate for the program recommendation engine.
//!
//! Contains the orchestrator that ties the review store, the rankers,
//! and the program catalog together behind one `recommend` entry point.

pub mod catalog;
pub mod orchestrator;

pub use catalog::{PlaceholderCatalog, ProgramCatalog, ProgramDetails, StaticCatalog};
pub use orchestrator::{
    Recommendation, RecommendError, Recommender, COLD_START_THRESHOLD, DEFAULT_LIMIT,
};
