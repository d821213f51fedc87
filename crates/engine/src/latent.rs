//! Latent-factor recommender.
//!
//! Fits a biased matrix-factorization model over the full rating set
//! and scores every program the target user has not yet reviewed.
//! Rating estimate for a (user, program) pair:
//!
//! ```text
//! r̂(u, i) = μ + b_u + b_i + p_u · q_i
//! ```
//!
//! where μ is the global mean rating, `b_u`/`b_i` are learned biases,
//! and `p_u`/`q_i` are the latent vectors. Parameters are trained by
//! stochastic gradient descent over the observed ratings only; there
//! is no held-out split, the model fits on 100% of the data and the
//! random initialization is seeded so a given rating set always
//! produces the same model.
//!
//! ## Learning Goals
//! - Translating a factorization algorithm into Rust
//! - HashMap-based index building for sparse matrices
//! - Seeded randomness with `StdRng` for reproducible fits
//! - Parallel candidate scoring with Rayon

use crate::error::{EngineError, Result};
use crate::types::RatingTriple;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use review_store::{ProgramId, UserId};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// Hyperparameters for the factorization fit.
#[derive(Debug, Clone)]
pub struct FactorConfig {
    /// Dimensionality of the latent vectors
    pub factors: usize,
    /// Number of SGD passes over the rating set
    pub epochs: usize,
    pub learning_rate: f32,
    pub regularization: f32,
    /// Seed for the latent-vector initialization
    pub seed: u64,
}

impl Default for FactorConfig {
    fn default() -> Self {
        Self {
            factors: 100,
            epochs: 20,
            learning_rate: 0.005,
            regularization: 0.02,
            seed: 42,
        }
    }
}

impl FactorConfig {
    pub fn with_factors(mut self, factors: usize) -> Self {
        self.factors = factors;
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// A fitted factorization model.
///
/// Holds dense parameter vectors addressed through per-id indices built
/// in first-seen order, so identical inputs produce identical models.
#[derive(Debug, Clone)]
pub struct LatentFactorModel {
    global_mean: f32,
    users: HashMap<UserId, usize>,
    programs: HashMap<ProgramId, usize>,
    user_bias: Vec<f32>,
    program_bias: Vec<f32>,
    user_factors: Vec<Vec<f32>>,
    program_factors: Vec<Vec<f32>>,
}

impl LatentFactorModel {
    /// Fit a model on the given rating set.
    ///
    /// Fails with `EngineError::InsufficientData` when the set is empty
    /// or has fewer than two distinct users or programs; factorizing a
    /// single row or column is not meaningful.
    pub fn fit(triples: &[RatingTriple], config: &FactorConfig) -> Result<Self> {
        // Index ids in first-seen order and flatten to dense entries
        let mut users: HashMap<UserId, usize> = HashMap::new();
        let mut programs: HashMap<ProgramId, usize> = HashMap::new();
        let mut entries: Vec<(usize, usize, f32)> = Vec::with_capacity(triples.len());

        for triple in triples {
            let next_user = users.len();
            let u = *users.entry(triple.user_id.clone()).or_insert(next_user);
            let next_program = programs.len();
            let i = *programs
                .entry(triple.program_id.clone())
                .or_insert(next_program);
            entries.push((u, i, triple.rating));
        }

        if entries.is_empty() || users.len() < 2 || programs.len() < 2 {
            return Err(EngineError::InsufficientData {
                users: users.len(),
                programs: programs.len(),
            });
        }

        let global_mean =
            entries.iter().map(|&(_, _, r)| r).sum::<f32>() / entries.len() as f32;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut init_vector = |len: usize| -> Vec<f32> {
            (0..len).map(|_| rng.random_range(-0.05..0.05f32)).collect()
        };

        let mut user_bias = vec![0.0f32; users.len()];
        let mut program_bias = vec![0.0f32; programs.len()];
        let mut user_factors: Vec<Vec<f32>> =
            (0..users.len()).map(|_| init_vector(config.factors)).collect();
        let mut program_factors: Vec<Vec<f32>> =
            (0..programs.len()).map(|_| init_vector(config.factors)).collect();

        let lr = config.learning_rate;
        let reg = config.regularization;

        for _epoch in 0..config.epochs {
            for &(u, i, rating) in &entries {
                let dot: f32 = user_factors[u]
                    .iter()
                    .zip(&program_factors[i])
                    .map(|(p, q)| p * q)
                    .sum();
                let err = rating - (global_mean + user_bias[u] + program_bias[i] + dot);

                user_bias[u] += lr * (err - reg * user_bias[u]);
                program_bias[i] += lr * (err - reg * program_bias[i]);

                for f in 0..config.factors {
                    let puf = user_factors[u][f];
                    let qif = program_factors[i][f];
                    user_factors[u][f] = puf + lr * (err * qif - reg * puf);
                    program_factors[i][f] = qif + lr * (err * puf - reg * qif);
                }
            }
        }

        debug!(
            users = users.len(),
            programs = programs.len(),
            ratings = entries.len(),
            factors = config.factors,
            "fitted latent-factor model"
        );

        Ok(Self {
            global_mean,
            users,
            programs,
            user_bias,
            program_bias,
            user_factors,
            program_factors,
        })
    }

    /// Predicted rating for a (user, program) pair.
    ///
    /// The estimate is the model's continuous output and is not clamped
    /// back to the rating scale. Unknown ids contribute nothing beyond
    /// the global mean and whichever bias is known.
    pub fn predict(&self, user_id: &str, program_id: &str) -> f32 {
        let user = self.users.get(user_id).copied();
        let program = self.programs.get(program_id).copied();

        let mut estimate = self.global_mean;
        if let Some(u) = user {
            estimate += self.user_bias[u];
        }
        if let Some(i) = program {
            estimate += self.program_bias[i];
        }
        if let (Some(u), Some(i)) = (user, program) {
            estimate += self.user_factors[u]
                .iter()
                .zip(&self.program_factors[i])
                .map(|(p, q)| p * q)
                .sum::<f32>();
        }
        estimate
    }
}

/// Fit a model and return the top `n` program ids for `user_id`.
///
/// The candidate set is every distinct program in the rating set minus
/// the programs the user has already rated; an empty candidate set
/// yields an empty result, not an error. Candidates are scored in
/// parallel and ordered by predicted rating descending, program id
/// ascending on ties.
///
/// Callers are expected to have applied their own minimum-history
/// policy first; this function does not enforce one.
#[instrument(skip(triples, config), fields(ratings = triples.len()))]
pub fn recommend_personalized(
    triples: &[RatingTriple],
    user_id: &str,
    n: usize,
    config: &FactorConfig,
) -> Result<Vec<ProgramId>> {
    let model = LatentFactorModel::fit(triples, config)?;

    let rated: HashSet<&str> = triples
        .iter()
        .filter(|t| t.user_id == user_id)
        .map(|t| t.program_id.as_str())
        .collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let candidates: Vec<&ProgramId> = triples
        .iter()
        .map(|t| &t.program_id)
        .filter(|p| seen.insert(p.as_str()) && !rated.contains(p.as_str()))
        .collect();

    debug!(
        candidates = candidates.len(),
        already_rated = rated.len(),
        "generated candidate set"
    );

    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let mut scored: Vec<(ProgramId, f32)> = candidates
        .par_iter()
        .map(|p| ((*p).clone(), model.predict(user_id, p.as_str())))
        .collect();

    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    scored.truncate(n);

    Ok(scored.into_iter().map(|(program_id, _)| program_id).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Small config so tests fit in milliseconds.
    fn test_config() -> FactorConfig {
        FactorConfig::default().with_factors(8).with_epochs(30)
    }

    /// Dense little community: u1 is the target with 5 ratings; the
    /// rest of the users agree that "good" is great and "bad" is awful.
    fn community() -> Vec<RatingTriple> {
        let mut triples = Vec::new();
        for p in 1..=5 {
            triples.push(RatingTriple::new("u1", format!("p{p}"), 4.0));
        }
        for u in 2..=5 {
            let user = format!("u{u}");
            for p in 1..=3 {
                triples.push(RatingTriple::new(user.clone(), format!("p{p}"), 4.0));
            }
            triples.push(RatingTriple::new(user.clone(), "good", 5.0));
            triples.push(RatingTriple::new(user, "bad", 1.0));
        }
        triples
    }

    #[test]
    fn test_fit_rejects_empty_set() {
        let result = LatentFactorModel::fit(&[], &test_config());
        assert!(matches!(
            result,
            Err(EngineError::InsufficientData { users: 0, programs: 0 })
        ));
    }

    #[test]
    fn test_fit_rejects_single_user() {
        let triples = vec![
            RatingTriple::new("u1", "p1", 4.0),
            RatingTriple::new("u1", "p2", 5.0),
        ];
        let result = LatentFactorModel::fit(&triples, &test_config());
        assert!(matches!(
            result,
            Err(EngineError::InsufficientData { users: 1, .. })
        ));
    }

    #[test]
    fn test_fit_rejects_single_program() {
        let triples = vec![
            RatingTriple::new("u1", "p1", 4.0),
            RatingTriple::new("u2", "p1", 5.0),
        ];
        let result = LatentFactorModel::fit(&triples, &test_config());
        assert!(matches!(
            result,
            Err(EngineError::InsufficientData { programs: 1, .. })
        ));
    }

    #[test]
    fn test_same_seed_same_model() {
        let triples = community();
        let config = test_config();

        let a = LatentFactorModel::fit(&triples, &config).unwrap();
        let b = LatentFactorModel::fit(&triples, &config).unwrap();

        for program in ["p1", "p4", "good", "bad"] {
            assert_eq!(a.predict("u1", program), b.predict("u1", program));
            assert_eq!(a.predict("u3", program), b.predict("u3", program));
        }
    }

    #[test]
    fn test_prediction_tracks_consensus() {
        let triples = community();
        let model = LatentFactorModel::fit(&triples, &test_config()).unwrap();

        // u1 never saw either, but the community's verdict should show
        // through the item biases
        assert!(model.predict("u1", "good") > model.predict("u1", "bad"));
    }

    #[test]
    fn test_predict_unknown_ids_falls_back_to_mean() {
        let triples = community();
        let model = LatentFactorModel::fit(&triples, &test_config()).unwrap();
        let global_mean =
            triples.iter().map(|t| t.rating).sum::<f32>() / triples.len() as f32;

        let estimate = model.predict("nobody", "nothing");
        assert!((estimate - global_mean).abs() < 1e-6);
    }

    #[test]
    fn test_recommendations_exclude_rated_programs() {
        let triples = community();
        let recs = recommend_personalized(&triples, "u1", 10, &test_config()).unwrap();

        assert!(!recs.is_empty());
        for p in 1..=5 {
            assert!(!recs.contains(&format!("p{p}")), "p{p} was already rated by u1");
        }
    }

    #[test]
    fn test_recommendations_respect_limit() {
        let triples = community();
        let recs = recommend_personalized(&triples, "u1", 1, &test_config()).unwrap();
        assert_eq!(recs.len(), 1);
    }

    #[test]
    fn test_empty_candidate_set_is_not_an_error() {
        // Two users covering every program between them; u1 rated all
        let triples = vec![
            RatingTriple::new("u1", "p1", 4.0),
            RatingTriple::new("u1", "p2", 5.0),
            RatingTriple::new("u2", "p1", 3.0),
            RatingTriple::new("u2", "p2", 2.0),
        ];
        let recs = recommend_personalized(&triples, "u1", 10, &test_config()).unwrap();
        assert!(recs.is_empty());
    }

    #[test]
    fn test_ranking_is_reproducible() {
        let triples = community();
        let config = test_config();

        let first = recommend_personalized(&triples, "u1", 10, &config).unwrap();
        let second = recommend_personalized(&triples, "u1", 10, &config).unwrap();
        assert_eq!(first, second);
    }
}
