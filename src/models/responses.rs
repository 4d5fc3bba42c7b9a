use serde::{Deserialize, Serialize};
use crate::models::domain::MatchingResult;
use crate::services::CacheStats;

/// Response for the stored results listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsListResponse {
    pub results: Vec<MatchingResult>,
    pub count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheStats>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
