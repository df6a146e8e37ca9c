use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub dataset: DatasetSettings,
    pub weather: WeatherSettings,
    pub currency: CurrencySettings,
    pub cache: CacheSettings,
    pub ranking: RankingSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetSettings {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherSettings {
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    #[serde(default = "default_city")]
    pub city: String,
    #[serde(default = "default_city_latitude")]
    pub latitude: f64,
    #[serde(default = "default_city_longitude")]
    pub longitude: f64,
    pub timeout_secs: Option<u64>,
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com".to_string()
}
fn default_city() -> String {
    "Arica".to_string()
}
fn default_city_latitude() -> f64 {
    -18.48
}
fn default_city_longitude() -> f64 {
    -70.31
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrencySettings {
    #[serde(default = "default_currency_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

fn default_currency_base_url() -> String {
    "https://api.currencyapi.com".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub ttl_secs: Option<u64>,
    pub max_entries: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankingSettings {
    pub featured_count: Option<usize>,
    pub max_limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with ARICA_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with ARICA_)
            // e.g., ARICA_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("ARICA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_env_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("ARICA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply well-known environment overrides
///
/// The currency API key is a secret: it usually arrives through the
/// environment rather than a config file. `CURRENCYAPI_KEY` is the name the
/// original dashboard used, checked first for drop-in compatibility.
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let api_key = env::var("CURRENCYAPI_KEY")
        .or_else(|_| env::var("ARICA_CURRENCY__API_KEY"))
        .ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(api_key) = api_key {
        builder = builder.set_override("currency.api_key", api_key)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weather_settings() {
        assert_eq!(default_weather_base_url(), "https://api.open-meteo.com");
        assert_eq!(default_city(), "Arica");
        assert_eq!(default_city_latitude(), -18.48);
        assert_eq!(default_city_longitude(), -70.31);
    }

    #[test]
    fn test_default_logging() {
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_log_format(), "json");
    }
}
