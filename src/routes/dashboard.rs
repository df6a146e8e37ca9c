use crate::models::{ConvertRequest, ConvertResponse, ErrorResponse};
use crate::routes::places::AppState;
use crate::services::{CacheKey, CurrencyError, CurrentWeather};
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Current weather for the configured city
///
/// GET /api/v1/weather
///
/// Always answers 200: when Open-Meteo is unreachable the response carries
/// the labeled offline demo value with `"fallback": true`.
async fn current_weather(state: web::Data<AppState>) -> impl Responder {
    let cache_key = CacheKey::weather(state.weather.city());

    if let Some(cached) = state.cache.get::<CurrentWeather>(&cache_key).await {
        return HttpResponse::Ok().json(cached);
    }

    let weather = match state.weather.current().await {
        Ok(weather) => {
            if let Err(e) = state.cache.set(&cache_key, &weather).await {
                tracing::warn!("Failed to cache weather response: {}", e);
            }
            weather
        }
        Err(e) => {
            tracing::warn!("Weather lookup failed, serving fallback: {}", e);
            // Fallback values are not cached so recovery is immediate
            state.weather.fallback()
        }
    };

    HttpResponse::Ok().json(weather)
}

/// Convert a currency amount via the latest upstream rate
///
/// POST /api/v1/currency/convert
///
/// Request body:
/// ```json
/// {
///   "amount": 10000.0,
///   "from": "CLP",
///   "to": "USD"
/// }
/// ```
async fn convert_currency(
    state: web::Data<AppState>,
    req: web::Json<ConvertRequest>,
) -> impl Responder {
    // Validate request
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let from = req.from.to_uppercase();
    let to = req.to.to_uppercase();
    let cache_key = CacheKey::rate(&from, &to);

    let rate = match state.cache.get::<f64>(&cache_key).await {
        Some(rate) => rate,
        None => match state.currency.latest_rate(&from, &to).await {
            Ok(rate) => {
                if let Err(e) = state.cache.set(&cache_key, &rate).await {
                    tracing::warn!("Failed to cache {}->{} rate: {}", from, to, e);
                }
                rate
            }
            Err(e) => return currency_error_response(e),
        },
    };

    tracing::debug!("Converting {} {} -> {} at rate {}", req.amount, from, to, rate);

    HttpResponse::Ok().json(ConvertResponse {
        amount: req.amount,
        from,
        to,
        rate,
        result: req.amount * rate,
    })
}

/// Map a currency error to the dashboard's user-facing messages
fn currency_error_response(err: CurrencyError) -> HttpResponse {
    match err {
        CurrencyError::MissingApiKey => {
            HttpResponse::ServiceUnavailable().json(ErrorResponse {
                error: "missing_api_key".to_string(),
                message: "No hay API key configurada para el servicio de divisas.".to_string(),
                status_code: 503,
            })
        }
        CurrencyError::RateNotFound(code) => {
            tracing::info!("Rate not found for currency: {}", code);
            HttpResponse::NotFound().json(ErrorResponse {
                error: "rate_not_found".to_string(),
                message: "No se encontró la tasa para esta moneda.".to_string(),
                status_code: 404,
            })
        }
        CurrencyError::Request(e) => {
            tracing::error!("Currency request failed: {}", e);
            HttpResponse::BadGateway().json(ErrorResponse {
                error: "upstream_unreachable".to_string(),
                message: "No se pudo conectar al servicio de divisas.".to_string(),
                status_code: 502,
            })
        }
        CurrencyError::Api(e) | CurrencyError::InvalidResponse(e) => {
            tracing::error!("Currency service error: {}", e);
            HttpResponse::BadGateway().json(ErrorResponse {
                error: "upstream_error".to_string(),
                message: "No se pudo conectar al servicio de divisas.".to_string(),
                status_code: 502,
            })
        }
    }
}

/// Configure the weather and currency routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/weather", web::get().to(current_weather))
        .route("/currency/convert", web::post().to(convert_currency));
}
