use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use coach_match::config::Settings;
use coach_match::core::Matcher;
use coach_match::routes::{self, matching::AppState};
use coach_match::services::{
    CachedResultStore, CoachDirectory, HttpCoachDirectory, HttpWeightsProvider, InMemoryResultStore,
    MatchResultStore, PostgresResultStore, StaticWeightsProvider, WeightsProvider,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

fn config_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load();

    // Environment variables win over the configured logging section
    let logging = settings
        .as_ref()
        .map(|s| s.logging.clone())
        .unwrap_or_default()
        .overridden(std::env::var("LOG_LEVEL").ok(), std::env::var("LOG_FORMAT").ok());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&logging.level))
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }

    info!("Starting coach matching service...");

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        config_error(e)
    })?;

    info!("Configuration loaded successfully");

    // Weights provider: admin configuration source if deployed, defaults otherwise
    let weights: Arc<dyn WeightsProvider> = match &settings.weights.endpoint {
        Some(endpoint) => {
            let timeout = Duration::from_secs(settings.weights.timeout_secs.unwrap_or(5));
            let provider = HttpWeightsProvider::new(endpoint.clone(), timeout).map_err(config_error)?;
            info!("Reading matching weights from {}", provider.endpoint());
            Arc::new(provider)
        }
        None => {
            warn!("No matching configuration source configured, using default weights");
            Arc::new(StaticWeightsProvider::default())
        }
    };

    let directory: Arc<dyn CoachDirectory> = Arc::new(
        HttpCoachDirectory::new(
            settings.directory.endpoint.clone(),
            settings.directory.api_key.clone(),
            Duration::from_secs(settings.directory.timeout_secs.unwrap_or(10)),
        )
        .map_err(config_error)?,
    );

    info!("Coach directory client initialized ({})", settings.directory.endpoint);

    // Result store: PostgreSQL when configured, in-process otherwise
    let backing_store: Arc<dyn MatchResultStore> = match &settings.database.url {
        Some(url) => {
            let store = PostgresResultStore::from_settings(
                url,
                settings.database.max_connections,
                settings.database.min_connections,
                settings.database.acquire_timeout_secs,
                settings.database.idle_timeout_secs,
            )
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                config_error(e)
            })?;
            info!("PostgreSQL result store initialized");
            Arc::new(store)
        }
        None => {
            warn!("No database configured, matching results are kept in memory");
            Arc::new(InMemoryResultStore::new())
        }
    };

    let store: Arc<dyn MatchResultStore> = Arc::new(CachedResultStore::new(
        backing_store,
        settings.cache.l1_cache_size,
        settings.cache.ttl_secs,
    ));

    info!(
        "Result cache initialized (L1: {} entries, TTL: {}s)",
        settings.cache.l1_cache_size, settings.cache.ttl_secs
    );

    let app_state = AppState {
        matcher: Matcher::new(weights, directory),
        store,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
