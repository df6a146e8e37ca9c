use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the currency rate API
#[derive(Debug, Error)]
pub enum CurrencyError {
    #[error("no currency API key configured")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    Api(String),

    #[error("no rate available for {0}")]
    RateNotFound(String),

    #[error("invalid response format: {0}")]
    InvalidResponse(String),
}

/// currencyapi.com v3 client
///
/// Fetches the latest rate for a (base, target) currency pair. The API key is
/// optional at construction so the service can start without one; requests
/// then fail with [`CurrencyError::MissingApiKey`], which the route layer
/// reports the same way the dashboard did.
pub struct CurrencyClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl CurrencyClient {
    pub fn new(base_url: String, api_key: Option<String>, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        // An empty key means no key
        let api_key = api_key.filter(|key| !key.is_empty());

        Self {
            base_url,
            api_key,
            client,
        }
    }

    /// Fetch the latest rate from `from` to `to`
    ///
    /// Currency codes are normalized to uppercase before hitting the API.
    pub async fn latest_rate(&self, from: &str, to: &str) -> Result<f64, CurrencyError> {
        let api_key = self.api_key.as_deref().ok_or(CurrencyError::MissingApiKey)?;

        let from = from.to_uppercase();
        let to = to.to_uppercase();

        let url = format!("{}/v3/latest", self.base_url.trim_end_matches('/'));

        tracing::debug!("Fetching {}->{} rate from: {}", from, to, url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("apikey", api_key),
                ("base_currency", from.as_str()),
                ("currencies", to.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CurrencyError::Api(format!(
                "Failed to fetch rates: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;

        let data = json
            .get("data")
            .ok_or_else(|| CurrencyError::InvalidResponse("Missing data object".into()))?;

        data.get(&to)
            .and_then(|entry| entry.get("value"))
            .and_then(|value| value.as_f64())
            .ok_or(CurrencyError::RateNotFound(to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: String, api_key: Option<&str>) -> CurrencyClient {
        CurrencyClient::new(base_url, api_key.map(str::to_string), 5)
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let client = test_client("https://api.currencyapi.com".to_string(), None);
        let err = client.latest_rate("CLP", "USD").await.unwrap_err();

        assert!(matches!(err, CurrencyError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_empty_api_key_counts_as_missing() {
        let client = test_client("https://api.currencyapi.com".to_string(), Some(""));
        let err = client.latest_rate("CLP", "USD").await.unwrap_err();

        assert!(matches!(err, CurrencyError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_latest_rate_parses_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v3/latest")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("base_currency".into(), "CLP".into()),
                mockito::Matcher::UrlEncoded("currencies".into(), "USD".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data": {"USD": {"code": "USD", "value": 0.00105}}}"#)
            .create_async()
            .await;

        let client = test_client(server.url(), Some("test-key"));
        let rate = client.latest_rate("clp", "usd").await.unwrap();

        assert!((rate - 0.00105).abs() < 1e-12);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rate_missing_from_payload() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v3/latest")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"data": {}}"#)
            .create_async()
            .await;

        let client = test_client(server.url(), Some("test-key"));
        let err = client.latest_rate("CLP", "XXX").await.unwrap_err();

        assert!(matches!(err, CurrencyError::RateNotFound(code) if code == "XXX"));
    }

    #[tokio::test]
    async fn test_upstream_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v3/latest")
            .match_query(mockito::Matcher::Any)
            .with_status(429)
            .create_async()
            .await;

        let client = test_client(server.url(), Some("test-key"));
        let err = client.latest_rate("CLP", "USD").await.unwrap_err();

        assert!(matches!(err, CurrencyError::Api(_)));
    }
}
