use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to Open-Meteo
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    Api(String),

    #[error("invalid response format: {0}")]
    InvalidResponse(String),
}

/// Current conditions for the configured city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub city: String,
    #[serde(rename = "temperatureC")]
    pub temperature_c: f64,
    #[serde(rename = "windKmh")]
    pub wind_kmh: f64,
    pub description: String,
    pub fallback: bool,
    #[serde(rename = "fetchedAt")]
    pub fetched_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    current_weather: OpenMeteoCurrent,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoCurrent {
    temperature: f64,
    windspeed: f64,
    weathercode: i64,
}

/// Map an Open-Meteo WMO weather code to the dashboard's description string
///
/// Unknown codes fall back to clear sky, matching the dashboard's behavior.
pub fn describe_weather_code(code: i64) -> &'static str {
    match code {
        1..=3 => "Parcialmente nublado",
        45 | 48 => "Niebla",
        51 | 53 | 55 | 61 | 63 | 65 => "Lluvia",
        71 | 73 | 75 | 77 => "Nieve",
        95 | 96 | 99 => "Tormenta",
        _ => "Despejado",
    }
}

/// Open-Meteo API client
///
/// Fetches current weather for a single fixed city. Calls are timeout-bounded
/// and carry no retry policy: on failure the caller substitutes the labeled
/// offline value from [`WeatherClient::fallback`].
pub struct WeatherClient {
    base_url: String,
    city: String,
    latitude: f64,
    longitude: f64,
    client: Client,
}

impl WeatherClient {
    pub fn new(
        base_url: String,
        city: String,
        latitude: f64,
        longitude: f64,
        timeout_secs: u64,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            city,
            latitude,
            longitude,
            client,
        }
    }

    /// The configured city name
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Fetch the current weather for the configured city
    pub async fn current(&self) -> Result<CurrentWeather, WeatherError> {
        let url = format!("{}/v1/forecast", self.base_url.trim_end_matches('/'));

        tracing::debug!("Fetching weather from: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", self.latitude.to_string()),
                ("longitude", self.longitude.to_string()),
                ("current_weather", "true".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(WeatherError::Api(format!(
                "Failed to fetch weather: {}",
                response.status()
            )));
        }

        let payload: OpenMeteoResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::InvalidResponse(format!("Failed to parse weather: {}", e)))?;

        Ok(CurrentWeather {
            city: self.city.clone(),
            temperature_c: payload.current_weather.temperature,
            wind_kmh: payload.current_weather.windspeed,
            description: describe_weather_code(payload.current_weather.weathercode).to_string(),
            fallback: false,
            fetched_at: chrono::Utc::now(),
        })
    }

    /// The labeled demo value shown when Open-Meteo is unreachable
    pub fn fallback(&self) -> CurrentWeather {
        CurrentWeather {
            city: self.city.clone(),
            temperature_c: 24.0,
            wind_kmh: 8.0,
            description: "Soleado (demo offline)".to_string(),
            fallback: true,
            fetched_at: chrono::Utc::now(),
        }
    }
}
