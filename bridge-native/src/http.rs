//! Reqwest-backed HTTP client
//!
//! The production transport behind [`bridge_traits::http::HttpClient`].
//! Plain `execute` is a single attempt; the gateway connectors own their
//! retry decisions, and `execute_with_retry` backs off only on transport
//! failures, never on statuses.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy},
};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// User-Agent sent with every gateway request. The remote storage API asks
/// integrators to identify themselves.
const USER_AGENT: &str = "gallery-sync/0.1.0 (+https://github.com/gallery-sync)";

/// Reqwest-based [`HttpClient`] with connection pooling and TLS via rustls
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        // The fixed configuration cannot produce a builder error; the
        // fallback exists so this constructor stays infallible.
        match Self::with_timeout(Duration::from_secs(30)) {
            Ok(client) => client,
            Err(_) => Self::with_client(Client::new()),
        }
    }

    /// Client with a custom ambient request timeout.
    ///
    /// Per-request timeouts on [`HttpRequest`] override this.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| BridgeError::OperationFailed(format!("HTTP client build: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an already-configured reqwest client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn convert_method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }

    fn build_request(&self, request: HttpRequest) -> reqwest::RequestBuilder {
        let method = Self::convert_method(request.method);
        let mut req = self.client.request(method, &request.url);

        for (key, value) in request.headers {
            req = req.header(key, value);
        }

        if let Some(body) = request.body {
            req = req.body(body);
        }

        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        req
    }

    async fn execute_once(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!(url = %request.url, "Executing HTTP request");
        let url = request.url.clone();

        let response = self
            .build_request(request)
            .send()
            .await
            .map_err(|e| Self::classify_transport_error(&url, e))?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|s| (k.to_string(), s.to_string())))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| BridgeError::OperationFailed(format!("body read: {}", e)))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    fn classify_transport_error(url: &str, error: reqwest::Error) -> BridgeError {
        if error.is_timeout() {
            BridgeError::Timeout(format!("{} timed out", url))
        } else if error.is_connect() {
            BridgeError::OperationFailed(format!("Connection failed: {}", error))
        } else {
            BridgeError::OperationFailed(error.to_string())
        }
    }

    fn backoff_delay(policy: &RetryPolicy, attempt: u32) -> Duration {
        if policy.use_exponential_backoff {
            (policy.base_delay * 2u32.pow(attempt - 1)).min(policy.max_delay)
        } else {
            policy.base_delay
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.execute_once(request).await
    }

    async fn execute_with_retry(
        &self,
        request: HttpRequest,
        policy: RetryPolicy,
    ) -> Result<HttpResponse> {
        let mut attempt = 0;

        loop {
            match self.execute_once(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    attempt += 1;
                    if attempt >= policy.max_attempts {
                        warn!(
                            url = %request.url,
                            attempts = attempt,
                            error = %e,
                            "HTTP request failed, retries exhausted"
                        );
                        return Err(e);
                    }

                    let delay = Self::backoff_delay(&policy, attempt);
                    warn!(
                        url = %request.url,
                        attempt = attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "HTTP request failed, retrying"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_construction() {
        let client = ReqwestHttpClient::with_timeout(Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(
            ReqwestHttpClient::convert_method(HttpMethod::Get),
            reqwest::Method::GET
        );
        assert_eq!(
            ReqwestHttpClient::convert_method(HttpMethod::Delete),
            reqwest::Method::DELETE
        );
    }

    #[test]
    fn test_backoff_caps_at_max_delay() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(400),
            use_exponential_backoff: true,
        };

        assert_eq!(
            ReqwestHttpClient::backoff_delay(&policy, 1),
            Duration::from_millis(100)
        );
        assert_eq!(
            ReqwestHttpClient::backoff_delay(&policy, 2),
            Duration::from_millis(200)
        );
        assert_eq!(
            ReqwestHttpClient::backoff_delay(&policy, 8),
            Duration::from_millis(400)
        );
    }

    #[test]
    fn test_fixed_backoff_ignores_attempt() {
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(30),
            use_exponential_backoff: false,
        };

        assert_eq!(
            ReqwestHttpClient::backoff_delay(&policy, 1),
            Duration::from_millis(250)
        );
        assert_eq!(
            ReqwestHttpClient::backoff_delay(&policy, 2),
            Duration::from_millis(250)
        );
    }
}
