// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Availability, CoachCandidate, CoachMatch, DecisionStatus, ExperienceLevel, MatchDecision,
    MatchingResult, MatchingWeights,
};
pub use requests::{DecisionRequest, MatchingRequest, Timeline};
pub use responses::{ErrorResponse, HealthResponse, ResultsListResponse};
