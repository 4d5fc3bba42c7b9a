//! Coach Match - coach matching engine for the coaching marketplace
//!
//! Given a coaching request, scores the coach directory against the
//! admin-configured weights and returns the ten best coaches with the reasons
//! behind each score.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{calculate_match_score, estimate_cost, rank_candidates, Matcher, MatchingError};
pub use crate::models::{CoachCandidate, CoachMatch, MatchingRequest, MatchingResult, MatchingWeights};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        assert_eq!(MatchingWeights::default(), MatchingWeights::FALLBACK);
        assert_eq!(MatchingWeights::FALLBACK.total(), 100.0);
    }
}
