mod config;
mod core;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use crate::config::Settings;
use crate::core::Ranker;
use crate::routes::places::AppState;
use crate::services::{CurrencyClient, PlaceStore, ResponseCache, WeatherClient};
use std::sync::Arc;
use tracing::{error, info};

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
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap())
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

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting AricaGo tourism service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Load the place dataset; the server must not come up without it
    let store = Arc::new(PlaceStore::load(&settings.dataset.path).unwrap_or_else(|e| {
        error!("Failed to load place dataset from {}: {}", settings.dataset.path, e);
        panic!("Dataset error: {}", e);
    }));

    info!(
        "Loaded {} place(s) across {} categories from {}",
        store.len(),
        store.categories().len(),
        settings.dataset.path
    );

    // Initialize upstream API clients
    let weather_timeout = settings.weather.timeout_secs.unwrap_or(5);
    let weather = Arc::new(WeatherClient::new(
        settings.weather.base_url,
        settings.weather.city,
        settings.weather.latitude,
        settings.weather.longitude,
        weather_timeout,
    ));

    info!("Weather client initialized ({})", weather.city());

    let currency_timeout = settings.currency.timeout_secs.unwrap_or(5);
    let has_api_key = settings
        .currency
        .api_key
        .as_deref()
        .is_some_and(|key| !key.is_empty());
    let currency = Arc::new(CurrencyClient::new(
        settings.currency.base_url,
        settings.currency.api_key,
        currency_timeout,
    ));

    if has_api_key {
        info!("Currency client initialized");
    } else {
        info!("Currency client initialized without an API key; conversions will be rejected");
    }

    // Initialize the upstream response cache
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let cache_entries = settings.cache.max_entries.unwrap_or(1000);
    let cache = Arc::new(ResponseCache::new(cache_entries, cache_ttl));

    info!("Response cache initialized ({} entries, TTL: {}s)", cache_entries, cache_ttl);

    // Initialize the ranker
    let max_limit = settings.ranking.max_limit.unwrap_or(100);
    let ranker = Ranker::new(max_limit);
    let featured_count = settings.ranking.featured_count.unwrap_or(3);

    // Build application state
    let app_state = AppState {
        store,
        weather,
        currency,
        cache,
        ranker,
        featured_count,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
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
