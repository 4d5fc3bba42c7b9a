use async_trait::async_trait;
use crate::models::{DecisionStatus, MatchDecision, MatchingRequest, MatchingResult};
use crate::services::cache::CacheStats;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors that can occur when persisting match results
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

/// Progress of a coaching request through matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Open,
    Matched,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Open => "open",
            RequestStatus::Matched => "matched",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(RequestStatus::Open),
            "matched" => Some(RequestStatus::Matched),
            _ => None,
        }
    }
}

/// A request together with its latest matching result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMatching {
    pub request: MatchingRequest,
    pub result: MatchingResult,
    pub status: RequestStatus,
    #[serde(rename = "matchedCoachId")]
    pub matched_coach_id: Option<String>,
}

/// Persistence for matching results, used by callers of the engine
#[async_trait]
pub trait MatchResultStore: Send + Sync {
    /// Insert or replace the result for `request.id`; the latest run wins
    async fn save(&self, request: &MatchingRequest, result: &MatchingResult) -> Result<(), StoreError>;

    async fn get(&self, request_id: &str) -> Result<Option<StoredMatching>, StoreError>;

    /// All stored results, most recent run first
    async fn list(&self) -> Result<Vec<MatchingResult>, StoreError>;

    /// Record an accept/reject; accepting marks the request as matched
    async fn record_decision(&self, decision: &MatchDecision) -> Result<(), StoreError>;

    async fn health_check(&self) -> bool {
        true
    }

    /// Read-cache statistics, for stores that sit behind a cache
    fn cache_stats(&self) -> Option<CacheStats> {
        None
    }
}

/// Process-local store, used when no database is configured
#[derive(Default)]
pub struct InMemoryResultStore {
    results: RwLock<HashMap<String, StoredMatching>>,
    decisions: RwLock<Vec<MatchDecision>>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn decisions(&self) -> Vec<MatchDecision> {
        self.decisions.read().await.clone()
    }
}

#[async_trait]
impl MatchResultStore for InMemoryResultStore {
    async fn save(&self, request: &MatchingRequest, result: &MatchingResult) -> Result<(), StoreError> {
        let mut results = self.results.write().await;

        match results.get_mut(&request.id) {
            Some(stored) => {
                stored.request = request.clone();
                stored.result = result.clone();
            }
            None => {
                results.insert(
                    request.id.clone(),
                    StoredMatching {
                        request: request.clone(),
                        result: result.clone(),
                        status: RequestStatus::Open,
                        matched_coach_id: None,
                    },
                );
            }
        }

        Ok(())
    }

    async fn get(&self, request_id: &str) -> Result<Option<StoredMatching>, StoreError> {
        Ok(self.results.read().await.get(request_id).cloned())
    }

    async fn list(&self) -> Result<Vec<MatchingResult>, StoreError> {
        let mut results: Vec<MatchingResult> = self
            .results
            .read()
            .await
            .values()
            .map(|stored| stored.result.clone())
            .collect();

        results.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(results)
    }

    async fn record_decision(&self, decision: &MatchDecision) -> Result<(), StoreError> {
        if decision.status == DecisionStatus::Accepted {
            if let Some(stored) = self.results.write().await.get_mut(&decision.request_id) {
                stored.status = RequestStatus::Matched;
                stored.matched_coach_id = Some(decision.coach_id.clone());
            }
        }

        self.decisions.write().await.push(decision.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchingWeights, Timeline};
    use chrono::{Duration, Utc};

    fn create_request(id: &str) -> MatchingRequest {
        MatchingRequest {
            id: id.to_string(),
            title: String::new(),
            description: String::new(),
            required_skills: vec![],
            preferred_experience: Default::default(),
            budget: 0.0,
            timeline: Timeline::default(),
            team_members: vec![],
            goals: vec![],
        }
    }

    fn create_result(id: &str, timestamp: chrono::DateTime<Utc>) -> MatchingResult {
        MatchingResult {
            request_id: id.to_string(),
            matches: vec![],
            algorithm_version: "1.0.0".to_string(),
            config_used: MatchingWeights::FALLBACK,
            timestamp,
            total_matches: 0,
        }
    }

    #[tokio::test]
    async fn test_save_replaces_previous_run() {
        let store = InMemoryResultStore::new();
        let request = create_request("req_1");
        let first = create_result("req_1", Utc::now() - Duration::minutes(5));
        let second = create_result("req_1", Utc::now());

        store.save(&request, &first).await.unwrap();
        store.save(&request, &second).await.unwrap();

        let stored = store.get("req_1").await.unwrap().unwrap();
        assert_eq!(stored.result, second);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_most_recent_first() {
        let store = InMemoryResultStore::new();
        let now = Utc::now();
        store.save(&create_request("old"), &create_result("old", now - Duration::hours(1))).await.unwrap();
        store.save(&create_request("new"), &create_result("new", now)).await.unwrap();

        let ids: Vec<String> = store.list().await.unwrap().into_iter().map(|r| r.request_id).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_accept_marks_request_matched() {
        let store = InMemoryResultStore::new();
        store.save(&create_request("req_1"), &create_result("req_1", Utc::now())).await.unwrap();

        store.record_decision(&MatchDecision::reject("req_1", "coach_2", None)).await.unwrap();
        assert_eq!(store.get("req_1").await.unwrap().unwrap().status, RequestStatus::Open);

        store.record_decision(&MatchDecision::accept("req_1", "coach_1")).await.unwrap();
        let stored = store.get("req_1").await.unwrap().unwrap();
        assert_eq!(stored.status, RequestStatus::Matched);
        assert_eq!(stored.matched_coach_id.as_deref(), Some("coach_1"));
        assert_eq!(store.decisions().await.len(), 2);
    }

    #[tokio::test]
    async fn test_decision_for_unknown_request_is_kept() {
        let store = InMemoryResultStore::new();
        store.record_decision(&MatchDecision::accept("ghost", "coach_1")).await.unwrap();

        assert!(store.get("ghost").await.unwrap().is_none());
        assert_eq!(store.decisions().await.len(), 1);
    }
}
