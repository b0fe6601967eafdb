//! Simulation service HTTP client.
//!
//! Wraps the backend's JSON endpoints: ticker lookup, the simulation
//! catalogue, simulation runs and cache maintenance. Idempotent catalogue
//! reads are retried on transient failures; lookups and runs are not.

use std::time::Duration;

use reqwest::{header, Client, Response, StatusCode};
use tracing::{debug, info, instrument, warn};

use super::error::{ApiError, Result};
use super::types::{
    AvailableSimulations, Candidate, ChartResponse, ErrorBody, MessageResponse,
    SimulationChart, SimulationOption, SimulationRequest, TickerSearchResponse,
};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Maximum number of attempts for retryable requests.
const MAX_RETRIES: u32 = 3;

/// Base delay between retries in milliseconds.
const RETRY_DELAY_MS: u64 = 500;

/// The simulation service client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct SimClient {
    /// The HTTP client.
    client: Client,
    /// The backend base URL without a trailing slash.
    base_url: String,
}

impl SimClient {
    /// Create a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL has no http(s) scheme or the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()
            .map_err(ApiError::Network)?;

        info!(base_url = %base_url, "Simulation client created");
        Ok(Self { client, base_url })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Look up tickers matching `query`.
    ///
    /// Single attempt: a failed lookup is superseded by the next keystroke.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn search_tickers(&self, query: &str) -> Result<Vec<Candidate>> {
        let url = self.endpoint_url("/search_tickers", &[("query", query.to_string())]);
        let response: TickerSearchResponse = self.execute_get(&url).await?;
        debug!(count = response.results.len(), "Ticker lookup returned");
        Ok(response.results)
    }

    /// Fetch the simulations the backend can run.
    #[instrument(skip(self))]
    pub async fn available_simulations(&self) -> Result<Vec<SimulationOption>> {
        let url = self.endpoint_url("/available_simulations", &[]);
        let response: AvailableSimulations = self.get_with_retry(&url).await?;
        debug!(count = response.simulations.len(), "Fetched simulation catalogue");
        Ok(response.simulations)
    }

    /// Run the requested simulations and return the chart payload.
    #[instrument(skip(self, request), fields(simulations = %request.simulations.join(",")))]
    pub async fn simulate(&self, request: &SimulationRequest) -> Result<SimulationChart> {
        let url = self.endpoint_url("/simulate", &request.query_pairs());
        let response: ChartResponse = self.execute_get(&url).await?;
        let chart = SimulationChart::try_from(response).map_err(ApiError::InvalidResponse)?;
        info!(traces = chart.traces.len(), "Simulation finished");
        Ok(chart)
    }

    /// Clear the backend's in-memory caches.
    #[instrument(skip(self))]
    pub async fn clear_cache(&self) -> Result<String> {
        let url = self.endpoint_url("/clear_cache", &[]);
        let response: MessageResponse = self.execute_post(&url).await?;
        Ok(response
            .message
            .unwrap_or_else(|| "Cache cleared successfully.".to_string()))
    }

    /// Delete the backend's on-disk market data cache.
    #[instrument(skip(self))]
    pub async fn delete_data_cache(&self) -> Result<String> {
        let url = self.endpoint_url("/delete_data_cache", &[]);
        let response: MessageResponse = self.execute_post(&url).await?;
        Ok(response
            .message
            .unwrap_or_else(|| "Data cache deleted successfully.".to_string()))
    }

    /// Build an endpoint URL with percent-encoded query parameters.
    fn endpoint_url(&self, path: &str, params: &[(&str, String)]) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        for (i, (key, value)) in params.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    /// Perform a GET request, retrying transient failures.
    #[instrument(skip(self), fields(url = %url))]
    async fn get_with_retry<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!("Request attempt {}/{}", attempts, MAX_RETRIES);

            match self.execute_get::<T>(url).await {
                Ok(response) => return Ok(response),
                Err(e) if Self::is_retryable(&e) && attempts < MAX_RETRIES => {
                    let delay = Self::calculate_retry_delay(attempts);
                    warn!(
                        "Request failed (attempt {}), retrying in {}ms: {}",
                        attempts, delay, e
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Execute a single GET request.
    async fn execute_get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Execute a single POST request with an empty body.
    async fn execute_post<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .post(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Check the status and decode the JSON body.
    async fn handle_response<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let url = response.url().path().to_string();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
        } else {
            let error_body = response.text().await.unwrap_or_default();
            debug!("Error response body: {}", error_body);
            Err(Self::error_from_response(status, &url, &error_body))
        }
    }

    /// Create an error from a failed response, preferring the server's `error` field.
    fn error_from_response(status: StatusCode, path: &str, body: &str) -> ApiError {
        let context = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error)
            .ok()
            .filter(|msg| !msg.is_empty())
            .unwrap_or_else(|| path.to_string());

        ApiError::from_status(status, &context)
    }

    /// Check if an error is retryable.
    fn is_retryable(error: &ApiError) -> bool {
        matches!(
            error,
            ApiError::RateLimited | ApiError::ServerError(_) | ApiError::Network(_)
        )
    }

    /// Calculate retry delay with exponential backoff.
    fn calculate_retry_delay(attempt: u32) -> u64 {
        RETRY_DELAY_MS * 2u64.pow(attempt - 1)
    }
}

/// Strip trailing slashes and require an http(s) scheme.
fn normalize_base_url(url: &str) -> Result<String> {
    let url = url.trim().trim_end_matches('/');

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ApiError::InvalidUrl(format!(
            "'{}' must start with http:// or https://",
            url
        )));
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SimClient {
        SimClient::new("http://localhost:5000/", 5).unwrap()
    }

    #[test]
    fn test_normalize_base_url_removes_trailing_slash() {
        assert_eq!(
            normalize_base_url("http://localhost:5000/").unwrap(),
            "http://localhost:5000"
        );
        assert_eq!(
            normalize_base_url("https://sim.example.com///").unwrap(),
            "https://sim.example.com"
        );
    }

    #[test]
    fn test_normalize_base_url_rejects_missing_scheme() {
        let err = normalize_base_url("localhost:5000").unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn test_endpoint_url_encodes_query() {
        let url = client().endpoint_url("/search_tickers", &[("query", "S&P 500".to_string())]);
        assert_eq!(url, "http://localhost:5000/search_tickers?query=S%26P%20500");
    }

    #[test]
    fn test_endpoint_url_joins_params() {
        let params = [
            ("simulations", "dca_simulation,bond_simulation".to_string()),
            ("tickers", "TSLA".to_string()),
        ];
        let url = client().endpoint_url("/simulate", &params);
        assert_eq!(
            url,
            "http://localhost:5000/simulate?simulations=dca_simulation%2Cbond_simulation&tickers=TSLA"
        );
    }

    #[test]
    fn test_endpoint_url_without_params() {
        assert_eq!(
            client().endpoint_url("/clear_cache", &[]),
            "http://localhost:5000/clear_cache"
        );
    }

    #[test]
    fn test_unreachable_backend_is_network_error() {
        let client = SimClient::new("http://127.0.0.1:9", 2).unwrap();
        let err = tokio_test::block_on(client.search_tickers("AAPL")).unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[test]
    fn test_error_from_response_uses_error_field() {
        let err = SimClient::error_from_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "/simulate",
            r#"{"error": "No data for ticker XYZ"}"#,
        );
        assert_eq!(err.detail(), "No data for ticker XYZ");
    }

    #[test]
    fn test_error_from_response_falls_back_to_path() {
        let err = SimClient::error_from_response(StatusCode::NOT_FOUND, "/simulate", "<html>");
        match err {
            ApiError::NotFound(path) => assert_eq!(path, "/simulate"),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_is_retryable() {
        assert!(SimClient::is_retryable(&ApiError::RateLimited));
        assert!(SimClient::is_retryable(&ApiError::ServerError("x".to_string())));
        assert!(!SimClient::is_retryable(&ApiError::BadRequest("x".to_string())));
        assert!(!SimClient::is_retryable(&ApiError::NotFound("x".to_string())));
    }

    #[test]
    fn test_retry_delay_exponential() {
        assert_eq!(SimClient::calculate_retry_delay(1), 500);
        assert_eq!(SimClient::calculate_retry_delay(2), 1000);
        assert_eq!(SimClient::calculate_retry_delay(3), 2000);
    }
}
