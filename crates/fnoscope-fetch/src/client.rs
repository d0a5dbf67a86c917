//! HTTP implementation of [`MarketDataSource`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::url::{self, DEFAULT_BASE_URL};
use crate::{BarRequest, FetchError, MarketDataSource};

/// Configuration for the HTTP source.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root that endpoint paths are appended to.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retry attempts for transient failures. Zero disables retries.
    pub max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds).
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds).
    pub max_delay_ms: u64,
    /// User agent string.
    pub user_agent: String,
    /// Bearer token sent with every request.
    pub access_token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 0,
            base_delay_ms: 500,
            max_delay_ms: 10_000,
            user_agent: format!("fnoscope/{}", env!("CARGO_PKG_VERSION")),
            access_token: None,
        }
    }
}

impl ClientConfig {
    /// Sets the API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry budget for transient failures.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Market-data source backed by a pooled HTTP client.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    config: ClientConfig,
}

impl HttpSource {
    /// Creates a new source with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a source with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(ClientConfig::default())
    }

    /// Returns the source configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetches a URL as text.
    ///
    /// A 404 is reported as an empty body, which every caller already treats
    /// as "no data".
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails after all retries.
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let mut attempts = 0;

        loop {
            let mut request = self.client.get(url);
            if let Some(token) = &self.config.access_token {
                request = request.bearer_auth(token);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::NOT_FOUND {
                        debug!("No data at {}", url);
                        return Ok(String::new());
                    }

                    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                        if attempts < self.config.max_retries {
                            attempts += 1;
                            self.back_off(url, attempts).await;
                            continue;
                        }
                        return Err(FetchError::ServerError {
                            status: status.as_u16(),
                        });
                    }

                    if !status.is_success() {
                        return Err(FetchError::ServerError {
                            status: status.as_u16(),
                        });
                    }
                    return Ok(response.text().await?);
                }
                Err(e) if is_retryable_error(&e) && attempts < self.config.max_retries => {
                    attempts += 1;
                    self.back_off(url, attempts).await;
                }
                Err(e) if e.is_timeout() => return Err(FetchError::Timeout(self.config.timeout)),
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn back_off(&self, url: &str, attempt: u32) {
        let delay = self.calculate_backoff_delay(attempt);
        warn!("Retrying {} (attempt {}) in {:?}", url, attempt, delay);
        tokio::time::sleep(delay).await;
    }

    /// Calculates the backoff delay with exponential backoff and jitter.
    fn calculate_backoff_delay(&self, attempt: u32) -> Duration {
        let exp_delay = self
            .config
            .base_delay_ms
            .saturating_mul(1u64 << attempt.min(10));
        let capped_delay = exp_delay.min(self.config.max_delay_ms);

        // Deterministic jitter of up to 25% so no RNG is needed.
        let jitter_range = capped_delay / 4;
        let jitter = if jitter_range > 0 {
            (u64::from(attempt) * 17) % jitter_range
        } else {
            0
        };

        Duration::from_millis((capped_delay + jitter).max(100))
    }
}

/// Builder errors are configuration problems and never retried.
fn is_retryable_error(error: &reqwest::Error) -> bool {
    if error.is_builder() {
        return false;
    }
    error.is_timeout() || error.is_connect() || error.is_request()
}

#[async_trait]
impl MarketDataSource for HttpSource {
    async fn fetch_instrument_master(&self) -> Result<String, FetchError> {
        self.get_text(&url::master_url(&self.config.base_url)).await
    }

    async fn fetch_bars(&self, request: &BarRequest) -> Result<String, FetchError> {
        self.get_text(&url::bars_url(&self.config.base_url, request))
            .await
    }
}
