//! Simple test harness for the recommendation orchestrator.
//!
//! Seeds an in-memory store with a small synthetic community and prints
//! recommendations for a cold user and an established one.

use anyhow::Result;
use review_store::{MemoryStore, ReviewRecord};
use server::{Recommender, StaticCatalog, DEFAULT_LIMIT};
use tracing::info;

fn seed_records() -> Vec<ReviewRecord> {
    let mut records = Vec::new();
    for p in 1..=8 {
        records.push(ReviewRecord::new(
            "alice",
            format!("p{p}"),
            format!("Show {p}"),
            ((p % 5) + 1) as i32,
        ));
    }
    for (user, offset) in [("bob", 2), ("carol", 3), ("dave", 4)] {
        for p in 1..=10 {
            if p % offset == 0 {
                records.push(ReviewRecord::new(
                    user,
                    format!("p{p}"),
                    format!("Show {p}"),
                    (((p + offset) % 5) + 1) as i32,
                ));
            }
        }
    }
    // newcomer has a single review
    records.push(ReviewRecord::new("erin", "p1", "Show 1", 5));
    records
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info,server=debug,rec_engine=debug")
        .init();

    info!("Starting recommendation test harness");

    let store = MemoryStore::with_records(seed_records());
    let mut catalog = StaticCatalog::new();
    catalog.insert("p9", "Show 9", "Documentary strand");
    catalog.insert("p10", "Show 10", "Late-night film slot");

    let recommender = Recommender::new(store, catalog);

    for user in ["alice", "erin"] {
        let recommendations = recommender.recommend(user, DEFAULT_LIMIT).await?;
        info!("Recommendations for {user}:");
        for (i, rec) in recommendations.iter().enumerate() {
            info!(
                "{}. {} [{}] - {}",
                i + 1,
                rec.title,
                rec.program_id,
                rec.supplement
            );
        }
    }

    Ok(())
}
