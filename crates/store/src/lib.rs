//! # Review Store Crate
//!
//! Durable persistence boundary for user reviews of programs.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (ReviewRecord, UserId, ProgramId)
//! - **memory**: The ReviewStore trait and an in-memory implementation
//! - **json**: Load review datasets from JSON files
//! - **error**: Error types for store access
//!
//! ## Example Usage
//!
//! ```ignore
//! use review_store::{MemoryStore, ReviewStore, json};
//! use std::path::Path;
//!
//! let records = json::load_records(Path::new("data/reviews.json"))?;
//! let store = MemoryStore::with_records(records);
//!
//! let all = store.read_all().await?;
//! println!("store holds {} reviews", all.len());
//! ```
//!
//! The store is injected into the recommendation engine rather than
//! held as a process-wide global; everything downstream sees only the
//! `ReviewStore` trait.

// Public modules
pub mod error;
pub mod json;
pub mod memory;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{Result, StoreError};
pub use memory::{MemoryStore, ReviewStore};
pub use types::{ProgramId, ReviewRecord, UserId};
