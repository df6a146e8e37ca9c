use crate::core::{RankOptions, Ranker, ALL_CATEGORIES};
use crate::models::{
    CategoriesResponse, Coordinate, ErrorResponse, HealthResponse, NearbyRequest, NearbyResponse,
    PlacesResponse,
};
use crate::services::{CurrencyClient, PlaceStore, ResponseCache, WeatherClient};
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PlaceStore>,
    pub weather: Arc<WeatherClient>,
    pub currency: Arc<CurrencyClient>,
    pub cache: Arc<ResponseCache>,
    pub ranker: Ranker,
    pub featured_count: usize,
}

/// Configure all place-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/places", web::get().to(list_places))
        .route("/places/featured", web::get().to(featured_places))
        .route("/places/categories", web::get().to(list_categories))
        .route("/places/nearby", web::post().to(nearby_places));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        places_loaded: state.store.len(),
        timestamp: chrono::Utc::now(),
    })
}

#[derive(Debug, Deserialize)]
pub struct PlacesQuery {
    category: Option<String>,
}

/// List every place, optionally filtered by category
///
/// GET /api/v1/places?category=playas
async fn list_places(
    state: web::Data<AppState>,
    query: web::Query<PlacesQuery>,
) -> impl Responder {
    let selector = query.category.as_deref().unwrap_or(ALL_CATEGORIES);
    let places = crate::core::filter_by_category(state.store.all().to_vec(), selector);

    tracing::debug!("Listing {} place(s) for category: {}", places.len(), selector);

    let count = places.len();
    HttpResponse::Ok().json(PlacesResponse { places, count })
}

/// The dashboard's featured strip
///
/// GET /api/v1/places/featured
async fn featured_places(state: web::Data<AppState>) -> impl Responder {
    let places = state.store.featured(state.featured_count).to_vec();

    let count = places.len();
    HttpResponse::Ok().json(PlacesResponse { places, count })
}

/// Sorted unique category names
///
/// GET /api/v1/places/categories
async fn list_categories(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(CategoriesResponse {
        categories: state.store.categories().to_vec(),
    })
}

/// Rank places by distance from the user's coordinate
///
/// POST /api/v1/places/nearby
///
/// Request body:
/// ```json
/// {
///   "latitude": -18.478,
///   "longitude": -70.312,
///   "category": "playas",
///   "limit": 10,
///   "maxDistanceKm": 25.0
/// }
/// ```
async fn nearby_places(
    state: web::Data<AppState>,
    req: web::Json<NearbyRequest>,
) -> impl Responder {
    // Validate request
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for nearby request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    // The range validation above guarantees this succeeds; the second check
    // keeps the core's precondition independent of the DTO layer
    let origin = match Coordinate::new(req.latitude, req.longitude) {
        Ok(origin) => origin,
        Err(e) => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid coordinate".to_string(),
                message: e.to_string(),
                status_code: 400,
            });
        }
    };

    let options = RankOptions {
        max_distance_km: req.max_distance_km,
        limit: req.limit,
    };

    tracing::info!(
        "Ranking places around ({}, {}) for category: {}",
        origin.latitude,
        origin.longitude,
        req.category
    );

    let result = state
        .ranker
        .rank_nearby(state.store.all().to_vec(), origin, &req.category, options);

    tracing::debug!(
        "Returning {} ranked place(s) (from {} total)",
        result.places.len(),
        result.total_places
    );

    HttpResponse::Ok().json(NearbyResponse {
        places: result.places,
        total_places: result.total_places,
    })
}
