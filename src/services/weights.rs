use async_trait::async_trait;
use crate::models::MatchingWeights;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when reading the admin-configured weights
#[derive(Debug, Error)]
pub enum WeightsSourceError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Configuration source returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Weights must be finite and non-negative: {0:?}")]
    InvalidWeights(MatchingWeights),
}

/// Source of the current matching weights
#[async_trait]
pub trait WeightsProvider: Send + Sync {
    async fn fetch_weights(&self) -> Result<MatchingWeights, WeightsSourceError>;
}

/// Read the weights to apply for one matching run
///
/// Never fails: any error from the provider is logged and the literal
/// fallback weights are returned instead.
pub async fn load_weights(provider: &dyn WeightsProvider) -> MatchingWeights {
    match provider.fetch_weights().await {
        Ok(weights) => {
            let total = weights.total();
            if (total - 100.0).abs() > 1e-6 {
                tracing::warn!(
                    "Configured matching weights sum to {} instead of 100; scores will scale proportionally",
                    total
                );
            }
            weights
        }
        Err(e) => {
            tracing::warn!("Failed to load matching configuration, using defaults: {}", e);
            MatchingWeights::FALLBACK
        }
    }
}

/// Configuration source client
///
/// Reads `GET <endpoint>`, accepting either `{ "weights": {...} }` or the
/// platform envelope `{ "success": true, "data": { "weights": {...} } }`.
pub struct HttpWeightsProvider {
    endpoint: String,
    client: Client,
}

impl HttpWeightsProvider {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, WeightsSourceError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl WeightsProvider for HttpWeightsProvider {
    async fn fetch_weights(&self) -> Result<MatchingWeights, WeightsSourceError> {
        tracing::debug!("Fetching matching configuration from: {}", self.endpoint);

        let response = self.client.get(&self.endpoint).send().await?;

        if !response.status().is_success() {
            return Err(WeightsSourceError::ApiError(format!(
                "Failed to fetch matching configuration: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        parse_weights_document(&json)
    }
}

/// Extract and validate weights from a configuration document
pub fn parse_weights_document(json: &Value) -> Result<MatchingWeights, WeightsSourceError> {
    if json.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(WeightsSourceError::ApiError(
            "Configuration source reported failure".into(),
        ));
    }

    let weights = json
        .get("data")
        .and_then(|data| data.get("weights"))
        .or_else(|| json.get("weights"))
        .ok_or_else(|| WeightsSourceError::InvalidResponse("Missing weights object".into()))?;

    let weights: MatchingWeights = serde_json::from_value(weights.clone())
        .map_err(|e| WeightsSourceError::InvalidResponse(format!("Failed to parse weights: {}", e)))?;

    if !weights.is_well_formed() {
        return Err(WeightsSourceError::InvalidWeights(weights));
    }

    Ok(weights)
}

/// Provider that always returns the same weights
///
/// Used when no configuration source is deployed.
#[derive(Debug, Clone, Copy)]
pub struct StaticWeightsProvider {
    weights: MatchingWeights,
}

impl StaticWeightsProvider {
    pub fn new(weights: MatchingWeights) -> Self {
        Self { weights }
    }
}

impl Default for StaticWeightsProvider {
    fn default() -> Self {
        Self::new(MatchingWeights::FALLBACK)
    }
}

#[async_trait]
impl WeightsProvider for StaticWeightsProvider {
    async fn fetch_weights(&self) -> Result<MatchingWeights, WeightsSourceError> {
        Ok(self.weights)
    }
}
