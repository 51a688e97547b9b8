//! HTTP/JSON transport for the marketsync protocols.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use marketsync_proto::{
    AvailableDataCatalogEntry, AvailableDataQuery, FileTransferCommand, FileTransferResult,
    ScopedCommand, SecurityInfo, SecurityLookup,
};

use crate::{RemoteTransport, TransportError};

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retry attempts for transiently failed requests.
    pub max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds).
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds).
    pub max_delay_ms: u64,
    /// User agent string.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_retries: 5,
            base_delay_ms: 500,
            max_delay_ms: 30_000,
            user_agent: format!("marketsync/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Transport posting protocol messages as JSON to an archive endpoint.
///
/// Transient failures (timeouts, connection errors, 5xx, 429) are retried
/// with capped exponential backoff; anything else surfaces immediately.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    config: TransportConfig,
}

impl HttpTransport {
    /// Creates a transport for the archive at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>, config: TransportConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            config,
        })
    }

    /// Creates a transport with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        Self::new(base_url, TransportConfig::default())
    }

    /// Returns the transport configuration.
    #[must_use]
    pub const fn config(&self) -> &TransportConfig {
        &self.config
    }

    async fn post<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp, TransportError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/{path}", self.base_url);
        let mut attempts = 0;

        loop {
            match self.client.post(&url).json(request).send().await {
                Ok(response) => {
                    // Retry on server errors (5xx) and rate limiting (429).
                    if response.status().is_server_error()
                        || response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS
                    {
                        if attempts < self.config.max_retries {
                            attempts += 1;
                            let delay = self.backoff_delay(attempts);
                            debug!(%url, attempts, delay_ms = delay.as_millis() as u64, "retrying");
                            tokio::time::sleep(delay).await;
                            continue;
                        }
                        return Err(TransportError::ServerError {
                            status: response.status().as_u16(),
                        });
                    }

                    response.error_for_status_ref()?;
                    let body = response.bytes().await?;
                    return Ok(serde_json::from_slice(&body)?);
                }
                Err(e) if is_retryable(&e) && attempts < self.config.max_retries => {
                    attempts += 1;
                    let delay = self.backoff_delay(attempts);
                    debug!(%url, attempts, delay_ms = delay.as_millis() as u64, "retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Calculates the backoff delay with exponential growth and jitter.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let exp_delay = self
            .config
            .base_delay_ms
            .saturating_mul(1u64 << attempt.min(10));

        let capped_delay = exp_delay.min(self.config.max_delay_ms);

        // Deterministic jitter (±25%) keyed off the attempt number, so no
        // RNG dependency is needed.
        let jitter_range = capped_delay / 4;
        let jitter = if jitter_range > 0 {
            let jitter_offset = (u64::from(attempt) * 17) % (jitter_range * 2);
            jitter_offset.saturating_sub(jitter_range)
        } else {
            0
        };

        let final_delay = (capped_delay + jitter).max(100);
        Duration::from_millis(final_delay)
    }
}

fn is_retryable(error: &reqwest::Error) -> bool {
    if error.is_builder() {
        return false;
    }
    error.is_timeout() || error.is_connect() || error.is_request()
}

#[async_trait]
impl RemoteTransport for HttpTransport {
    async fn query_available(
        &self,
        query: &AvailableDataQuery,
    ) -> Result<Vec<AvailableDataCatalogEntry>, TransportError> {
        self.post("catalog", query).await
    }

    async fn file_command(
        &self,
        command: &FileTransferCommand,
    ) -> Result<Vec<FileTransferResult>, TransportError> {
        self.post("file", command).await
    }

    async fn scoped_command(&self, command: &ScopedCommand) -> Result<(), TransportError> {
        let _: serde_json::Value = self.post("command", command).await?;
        Ok(())
    }

    async fn lookup_securities(
        &self,
        lookup: &SecurityLookup,
    ) -> Result<Vec<SecurityInfo>, TransportError> {
        self.post("securities", lookup).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = TransportConfig::default();
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.base_delay_ms, 500);
        assert_eq!(config.max_delay_ms, 30_000);
    }

    #[test]
    fn test_transport_creation_strips_trailing_slash() {
        let transport = HttpTransport::with_defaults("http://archive.example/api/").unwrap();
        assert_eq!(transport.base_url, "http://archive.example/api");
    }

    #[test]
    fn test_backoff_delay_grows_and_caps() {
        let transport = HttpTransport::with_defaults("http://archive.example").unwrap();

        let delay1 = transport.backoff_delay(1);
        assert!(delay1.as_millis() >= 750 && delay1.as_millis() <= 1250);

        let delay2 = transport.backoff_delay(2);
        assert!(delay2.as_millis() >= 1500 && delay2.as_millis() <= 2500);

        let delay_high = transport.backoff_delay(20);
        assert!(delay_high.as_millis() <= 37_500);
    }
}
