// Core algorithm exports
pub mod adapter;
pub mod cost;
pub mod matcher;
pub mod scoring;

pub use adapter::{adapt_coach_record, adapt_coach_records};
pub use cost::{estimate_cost, engagement_weeks};
pub use matcher::{rank_candidates, Matcher, MatchingError, ALGORITHM_VERSION, MAX_MATCHES};
pub use scoring::calculate_match_score;
