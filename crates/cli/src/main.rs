use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rec_engine::top_popular;
use review_store::{json, MemoryStore, ReviewRecord};
use server::{Recommender, StaticCatalog, DEFAULT_LIMIT};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

/// telerec - Program Recommendation Engine
#[derive(Parser)]
#[command(name = "telerec")]
#[command(about = "Program recommendation engine over user reviews", long_about = None)]
struct Cli {
    /// Path to the JSON review dataset
    #[arg(short, long, default_value = "data/reviews.json")]
    data: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get program recommendations for a user
    Recommend {
        /// User ID to get recommendations for
        #[arg(long)]
        user_id: String,

        /// Number of recommendations to return
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },

    /// Show the most-reviewed programs across the whole store
    Popular {
        /// Number of programs to show
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },

    /// List reviews for one program, newest first
    Reviews {
        /// Program ID to display
        #[arg(long)]
        program_id: String,
    },

    /// Show a user's review history
    User {
        /// User ID to display
        #[arg(long)]
        user_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading review dataset from {}...", cli.data.display());
    let start = Instant::now();
    let records = json::load_records(&cli.data)
        .with_context(|| format!("Failed to load reviews from {}", cli.data.display()))?;
    println!(
        "{} Loaded {} reviews in {:?}",
        "✓".green(),
        records.len(),
        start.elapsed()
    );

    match cli.command {
        Commands::Recommend { user_id, limit } => handle_recommend(records, user_id, limit).await?,
        Commands::Popular { limit } => handle_popular(&records, limit),
        Commands::Reviews { program_id } => handle_reviews(&records, &program_id)?,
        Commands::User { user_id } => handle_user(&records, &user_id)?,
    }

    Ok(())
}

/// Build a catalog out of the titles present in the dataset itself.
/// Programs nobody titled fall through to the orchestrator's
/// placeholders.
fn catalog_from_records(records: &[ReviewRecord]) -> StaticCatalog {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut titles: HashMap<&str, &str> = HashMap::new();
    for record in records {
        *counts.entry(record.program_id.as_str()).or_insert(0) += 1;
        if !record.program_title.is_empty() {
            titles.insert(record.program_id.as_str(), record.program_title.as_str());
        }
    }

    let mut catalog = StaticCatalog::new();
    for (program_id, title) in titles {
        let count = counts.get(program_id).copied().unwrap_or(0);
        catalog.insert(
            program_id,
            title,
            format!("{count} review(s) on record"),
        );
    }
    catalog
}

/// Handle the 'recommend' command
async fn handle_recommend(records: Vec<ReviewRecord>, user_id: String, limit: usize) -> Result<()> {
    let catalog = catalog_from_records(&records);
    let store = MemoryStore::with_records(records);
    let recommender = Recommender::new(store, catalog);

    let recommendations = recommender.recommend(&user_id, limit).await?;

    println!(
        "{}",
        format!("Recommendations for {user_id}:").bold().blue()
    );
    if recommendations.is_empty() {
        println!("  (no reviews on record yet - nothing to recommend)");
    }
    for (i, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} [{}]",
            (i + 1).to_string().green(),
            rec.title,
            rec.program_id
        );
        println!("   {}", rec.supplement);
    }
    Ok(())
}

/// Handle the 'popular' command
fn handle_popular(records: &[ReviewRecord], limit: usize) {
    let top = top_popular(records, limit);

    println!("{}", "Most-reviewed programs:".bold().blue());
    for (i, entry) in top.iter().enumerate() {
        println!(
            "{}. {} [{}] - {} reviews",
            (i + 1).to_string().green(),
            entry.display_title,
            entry.program_id,
            entry.support_count
        );
    }
}

/// Handle the 'reviews' command
fn handle_reviews(records: &[ReviewRecord], program_id: &str) -> Result<()> {
    let mut reviews: Vec<&ReviewRecord> = records
        .iter()
        .filter(|r| r.program_id == program_id)
        .collect();
    if reviews.is_empty() {
        return Err(anyhow!("No reviews found for program {program_id}"));
    }
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let title = &reviews[0].program_title;
    println!(
        "{}",
        format!("Reviews for {title} [{program_id}]:").bold().blue()
    );
    for review in reviews {
        println!(
            "  {} {} - {}",
            format!("{}/5", review.rating).yellow(),
            review.user_id.cyan(),
            if review.review_text.is_empty() {
                "(no comment)"
            } else {
                review.review_text.as_str()
            }
        );
    }
    Ok(())
}

/// Handle the 'user' command
fn handle_user(records: &[ReviewRecord], user_id: &str) -> Result<()> {
    let reviews: Vec<&ReviewRecord> = records.iter().filter(|r| r.user_id == user_id).collect();
    if reviews.is_empty() {
        return Err(anyhow!("No reviews found for user {user_id}"));
    }

    let total: i32 = reviews.iter().map(|r| r.rating).sum();
    let avg = total as f32 / reviews.len() as f32;

    println!("{}", format!("User: {user_id}").bold().blue());
    println!("{}Reviews written: {}", "• ".cyan(), reviews.len());
    println!("{}Average rating: {avg:.2}", "• ".cyan());

    let mut by_rating = reviews.clone();
    by_rating.sort_by(|a, b| b.rating.cmp(&a.rating));
    println!("History:");
    for review in by_rating {
        println!(
            "  - {} [{}] rated {}",
            review.program_title,
            review.program_id,
            format!("{}/5", review.rating).yellow()
        );
    }
    Ok(())
}
