use crate::core::{adapter::adapt_coach_records, cost::estimate_cost, scoring::calculate_match_score};
use crate::models::{CoachCandidate, CoachMatch, MatchingRequest, MatchingResult, MatchingWeights};
use crate::services::{load_weights, CoachDirectory, DirectoryError, WeightsProvider};
use std::sync::Arc;
use thiserror::Error;

/// Version tag stamped on every result
pub const ALGORITHM_VERSION: &str = "1.0.0";

/// Maximum number of matches returned per run
pub const MAX_MATCHES: usize = 10;

/// Errors surfaced by a matching run
#[derive(Debug, Error)]
pub enum MatchingError {
    #[error("Matching unavailable: {0}")]
    Unavailable(#[from] DirectoryError),
}

/// Score, rank and truncate a candidate pool
///
/// Pure over its inputs: the same request, pool and weights always give the
/// same matches in the same order. `timestamp` is only stamped onto the result.
pub fn rank_candidates(
    request: &MatchingRequest,
    candidates: Vec<CoachCandidate>,
    weights: MatchingWeights,
    timestamp: chrono::DateTime<chrono::Utc>,
) -> MatchingResult {
    let mut matches: Vec<CoachMatch> = candidates
        .into_iter()
        .map(|coach| {
            let (match_score, match_reasons) = calculate_match_score(&coach, request, &weights);
            let estimated_cost = estimate_cost(&coach, request);

            CoachMatch {
                coach,
                match_score,
                match_reasons,
                estimated_cost,
            }
        })
        .collect();

    // Stable sort keeps directory order among equal scores
    matches.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    matches.truncate(MAX_MATCHES);

    MatchingResult {
        request_id: request.id.clone(),
        total_matches: matches.len(),
        matches,
        algorithm_version: ALGORITHM_VERSION.to_string(),
        config_used: weights,
        timestamp,
    }
}

/// Matching engine
///
/// Holds its two collaborators and nothing else; every call re-reads the
/// weights and the candidate pool.
///
/// # Pipeline Stages
/// 1. Load weights (falls back to defaults) and candidates, concurrently
/// 2. Adapt directory records into candidates
/// 3. Score and estimate cost per candidate
/// 4. Rank and keep the best ten
#[derive(Clone)]
pub struct Matcher {
    weights: Arc<dyn WeightsProvider>,
    directory: Arc<dyn CoachDirectory>,
}

impl Matcher {
    pub fn new(weights: Arc<dyn WeightsProvider>, directory: Arc<dyn CoachDirectory>) -> Self {
        Self { weights, directory }
    }

    /// Current weights, or the fallback if the configuration source fails
    pub async fn get_weights(&self) -> MatchingWeights {
        load_weights(self.weights.as_ref()).await
    }

    /// Current candidate pool in canonical shape
    pub async fn get_candidates(&self) -> Result<Vec<CoachCandidate>, MatchingError> {
        let records = self.directory.fetch_coaches().await?;
        Ok(adapt_coach_records(&records))
    }

    /// Find the best coaches for a request
    ///
    /// An empty pool yields an empty result. Only a directory fault is an
    /// error, since an empty result would misrepresent it.
    pub async fn find_matches(&self, request: &MatchingRequest) -> Result<MatchingResult, MatchingError> {
        let (weights, candidates) = tokio::join!(self.get_weights(), self.get_candidates());

        let candidates = candidates.map_err(|e| {
            tracing::error!("Coach directory unavailable for request {}: {}", request.id, e);
            e
        })?;

        let pool_size = candidates.len();
        let result = rank_candidates(request, candidates, weights, chrono::Utc::now());

        tracing::info!(
            "Matching completed for request {}: {} matches from {} candidates (top score: {:?})",
            request.id,
            result.total_matches,
            pool_size,
            result.matches.first().map(|m| m.match_score)
        );

        Ok(result)
    }
}
