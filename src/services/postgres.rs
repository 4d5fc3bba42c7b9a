use async_trait::async_trait;
use crate::models::{DecisionStatus, MatchDecision, MatchingRequest, MatchingResult};
use crate::services::store::{MatchResultStore, RequestStatus, StoreError, StoredMatching};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::time::Duration;

/// PostgreSQL-backed result store
///
/// Requests and results are kept as JSONB next to the request status, so a
/// stored request can be re-run later with whatever weights are current.
pub struct PostgresResultStore {
    pool: PgPool,
}

impl PostgresResultStore {
    /// Create a new store from a connection string and run migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new store from optional settings values
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL result store");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

#[async_trait]
impl MatchResultStore for PostgresResultStore {
    async fn save(&self, request: &MatchingRequest, result: &MatchingResult) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO matching_results (request_id, request, result, status, updated_at)
            VALUES ($1, $2, $3, 'open', $4)
            ON CONFLICT (request_id)
            DO UPDATE SET
                request = EXCLUDED.request,
                result = EXCLUDED.result,
                updated_at = EXCLUDED.updated_at
        "#;

        sqlx::query(query)
            .bind(&request.id)
            .bind(Json(request))
            .bind(Json(result))
            .bind(result.timestamp)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Stored matching result for {} ({} matches)",
            request.id,
            result.total_matches
        );

        Ok(())
    }

    async fn get(&self, request_id: &str) -> Result<Option<StoredMatching>, StoreError> {
        let query = r#"
            SELECT request, result, status, matched_coach_id
            FROM matching_results
            WHERE request_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(request_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let status: String = row.try_get("status")?;
        let status = RequestStatus::parse(&status)
            .ok_or_else(|| StoreError::InvalidData(format!("Unknown request status: {}", status)))?;

        let Json(request): Json<MatchingRequest> = row.try_get("request")?;
        let Json(result): Json<MatchingResult> = row.try_get("result")?;

        Ok(Some(StoredMatching {
            request,
            result,
            status,
            matched_coach_id: row.try_get("matched_coach_id")?,
        }))
    }

    async fn list(&self) -> Result<Vec<MatchingResult>, StoreError> {
        let query = r#"
            SELECT result
            FROM matching_results
            ORDER BY updated_at DESC
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| -> Result<MatchingResult, StoreError> {
                let Json(result): Json<MatchingResult> = row.try_get("result")?;
                Ok(result)
            })
            .collect()
    }

    async fn record_decision(&self, decision: &MatchDecision) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO match_decisions (id, request_id, coach_id, status, reason, decided_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(decision.id)
        .bind(&decision.request_id)
        .bind(&decision.coach_id)
        .bind(decision.status.as_str())
        .bind(&decision.reason)
        .bind(decision.timestamp)
        .execute(&mut *tx)
        .await?;

        if decision.status == DecisionStatus::Accepted {
            sqlx::query(
                r#"
                UPDATE matching_results
                SET status = $2, matched_coach_id = $3
                WHERE request_id = $1
                "#,
            )
            .bind(&decision.request_id)
            .bind(RequestStatus::Matched.as_str())
            .bind(&decision.coach_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            "Recorded {} decision: {} -> {}",
            decision.status.as_str(),
            decision.request_id,
            decision.coach_id
        );

        Ok(())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok()
    }
}
