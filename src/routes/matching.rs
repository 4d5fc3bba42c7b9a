use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{Matcher, MatchingError};
use crate::models::{
    DecisionRequest, ErrorResponse, HealthResponse, MatchDecision, MatchingRequest, MatchingResult,
    ResultsListResponse,
};
use crate::services::MatchResultStore;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: Matcher,
    pub store: Arc<dyn MatchResultStore>,
}

/// Configure all matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matching/find", web::post().to(find_matches))
        .route("/matching/results", web::get().to(list_results))
        .route("/matching/results/{request_id}", web::get().to(get_result))
        .route("/matching/results/{request_id}/rerun", web::post().to(rerun_matching))
        .route("/matching/decisions", web::post().to(record_decision));
}

fn error_response(status_code: u16, error: &str, message: String) -> HttpResponse {
    let body = ErrorResponse {
        error: error.to_string(),
        message,
        status_code,
    };

    match status_code {
        400 => HttpResponse::BadRequest().json(body),
        404 => HttpResponse::NotFound().json(body),
        503 => HttpResponse::ServiceUnavailable().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

/// Run the engine and persist the result
///
/// Persistence is best-effort: a store failure is logged and the fresh result
/// is still returned.
async fn match_and_store(
    state: &AppState,
    request: &MatchingRequest,
) -> Result<MatchingResult, MatchingError> {
    let result = state.matcher.find_matches(request).await?;

    if let Err(e) = state.store.save(request, &result).await {
        tracing::warn!("Matching result for {} computed but not stored: {}", request.id, e);
    }

    Ok(result)
}

fn unavailable(e: MatchingError) -> HttpResponse {
    error_response(503, "Matching unavailable", e.to_string())
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.store.health_check().await;

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        cache: state.store.cache_stats(),
    })
}

/// Find coach matches for a request
///
/// POST /api/v1/matching/find
///
/// Request body:
/// ```json
/// {
///   "id": "string",
///   "requiredSkills": ["string"],
///   "preferredExperience": "junior|mid-level|senior|expert",
///   "budget": 150,
///   "timeline": { "startDate": "2024-01-01", "endDate": "2024-03-01" }
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<MatchingRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {:?}", errors);
        return error_response(400, "Validation failed", errors.to_string());
    }

    tracing::info!(
        "Finding matches for request: {} ({} required skills)",
        req.id,
        req.required_skills.len()
    );

    match match_and_store(&state, &req).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => unavailable(e),
    }
}

/// List stored matching results
///
/// GET /api/v1/matching/results
async fn list_results(state: web::Data<AppState>) -> impl Responder {
    match state.store.list().await {
        Ok(results) => HttpResponse::Ok().json(ResultsListResponse {
            count: results.len(),
            results,
        }),
        Err(e) => {
            tracing::error!("Failed to list matching results: {}", e);
            error_response(500, "Failed to list matching results", e.to_string())
        }
    }
}

/// Get the latest stored result for a request
///
/// GET /api/v1/matching/results/{requestId}
async fn get_result(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let request_id = path.into_inner();

    match state.store.get(&request_id).await {
        Ok(Some(stored)) => HttpResponse::Ok().json(stored.result),
        Ok(None) => error_response(
            404,
            "Matching result not found",
            format!("No matching result for request {}", request_id),
        ),
        Err(e) => {
            tracing::error!("Failed to fetch matching result for {}: {}", request_id, e);
            error_response(500, "Failed to fetch matching result", e.to_string())
        }
    }
}

/// Re-run matching for a stored request with the current weights
///
/// POST /api/v1/matching/results/{requestId}/rerun
async fn rerun_matching(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let request_id = path.into_inner();

    let stored = match state.store.get(&request_id).await {
        Ok(Some(stored)) => stored,
        Ok(None) => {
            return error_response(
                404,
                "Matching request not found",
                format!("No stored request {}", request_id),
            );
        }
        Err(e) => {
            tracing::error!("Failed to load stored request {}: {}", request_id, e);
            return error_response(500, "Failed to load stored request", e.to_string());
        }
    };

    tracing::info!("Re-running matching for request {} with current weights", request_id);

    match match_and_store(&state, &stored.request).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => unavailable(e),
    }
}

/// Accept or reject a proposed coach
///
/// POST /api/v1/matching/decisions
///
/// Request body:
/// ```json
/// {
///   "requestId": "string",
///   "coachId": "string",
///   "decision": "accepted|rejected",
///   "reason": "string"
/// }
/// ```
async fn record_decision(
    state: web::Data<AppState>,
    req: web::Json<DecisionRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(400, "Validation failed", errors.to_string());
    }

    let req = req.into_inner();
    let decision = match req.decision.to_lowercase().as_str() {
        "accepted" | "accept" => MatchDecision::accept(&req.request_id, &req.coach_id),
        "rejected" | "reject" => MatchDecision::reject(&req.request_id, &req.coach_id, req.reason),
        _ => {
            return error_response(
                400,
                "Invalid decision",
                "Decision must be one of: accepted, rejected".to_string(),
            );
        }
    };

    match state.store.record_decision(&decision).await {
        Ok(()) => {
            tracing::info!(
                "Coach {} {} for request {}",
                decision.coach_id,
                decision.status.as_str(),
                decision.request_id
            );
            HttpResponse::Ok().json(decision)
        }
        Err(e) => {
            tracing::error!("Failed to record decision: {}", e);
            error_response(500, "Failed to record decision", e.to_string())
        }
    }
}
