use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when reading the coach directory
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Coach directory returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Source of matchable coach records
///
/// Records are returned as the directory stores them; the engine adapts them
/// with [`crate::core::adapter::adapt_coach_record`].
#[async_trait]
pub trait CoachDirectory: Send + Sync {
    async fn fetch_coaches(&self) -> Result<Vec<Value>, DirectoryError>;
}

/// Coach directory client
pub struct HttpCoachDirectory {
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl HttpCoachDirectory {
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, DirectoryError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint,
            api_key,
            client,
        })
    }
}

#[async_trait]
impl CoachDirectory for HttpCoachDirectory {
    async fn fetch_coaches(&self) -> Result<Vec<Value>, DirectoryError> {
        tracing::debug!("Fetching coaches from: {}", self.endpoint);

        let mut request = self.client.get(&self.endpoint);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Coach directory returned {}: {}", status, body);
            return Err(DirectoryError::ApiError(format!(
                "Failed to fetch coaches: {}",
                status
            )));
        }

        let json: Value = response.json().await?;
        let records = extract_records(json)?;

        tracing::debug!("Fetched {} coach records", records.len());

        Ok(records)
    }
}

/// Pull the record array out of a directory response
///
/// Accepts a bare array or an object carrying it under `data`, `coaches` or
/// `documents`.
pub fn extract_records(json: Value) -> Result<Vec<Value>, DirectoryError> {
    match json {
        Value::Array(records) => Ok(records),
        Value::Object(mut body) => ["data", "coaches", "documents"]
            .iter()
            .find_map(|key| match body.remove(*key) {
                Some(Value::Array(records)) => Some(records),
                _ => None,
            })
            .ok_or_else(|| DirectoryError::InvalidResponse("Missing coach array".into())),
        other => Err(DirectoryError::InvalidResponse(format!(
            "Expected array or object, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_bare_array() {
        let records = extract_records(json!([{"id": "a"}, {"id": "b"}])).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_extract_wrapped_array() {
        let records = extract_records(json!({"success": true, "data": [{"id": "a"}]})).unwrap();
        assert_eq!(records.len(), 1);

        let records = extract_records(json!({"total": 1, "documents": [{"id": "a"}]})).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_extract_rejects_unknown_shape() {
        assert!(extract_records(json!({"items": []})).is_err());
        assert!(extract_records(json!("coaches")).is_err());
    }
}
