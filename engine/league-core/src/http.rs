//! JSON-over-HTTP client shared by the upstream integrations

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ProviderError;

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self { timeout_secs: 30, user_agent: "league-tracker/0.1".to_string() }
    }
}

/// Thin wrapper over `reqwest::Client` that maps failures into
/// `ProviderError` and retries transport failures exactly once
#[derive(Debug, Clone)]
pub struct JsonClient {
    client: reqwest::Client,
    source_name: String,
}

impl JsonClient {
    /// Create a new client for the named upstream
    pub fn new(source_name: impl Into<String>, settings: &HttpSettings) -> Result<Self, ProviderError> {
        let source_name = source_name.into();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| {
                ProviderError::Unavailable(format!("Failed to create HTTP client for {source_name}: {e}"))
            })?;

        Ok(Self { client, source_name })
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// GET a URL and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        self.get_json_with_headers(url, &[]).await
    }

    /// GET a URL with extra headers and decode the JSON body
    pub async fn get_json_with_headers<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let body = retry_transport_once(url, || self.fetch_body(url, headers)).await?;
        parse_json(&self.source_name, &body)
    }

    async fn fetch_body(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, ProviderError> {
        debug!("GET {}", url);

        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(|e| classify(url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status { url: url.to_string(), status: status.as_u16() });
        }

        response.text().await.map_err(|e| classify(url, e))
    }
}

/// Run `op`, repeating it once if the first attempt failed at the transport level
pub async fn retry_transport_once<F, Fut, T>(label: &str, mut op: F) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    match op().await {
        Err(e) if e.is_retryable() => {
            warn!("Transport failure for {}: {}, retrying once", label, e);
            op().await
        }
        other => other,
    }
}

/// Decode a JSON body, reporting failures as malformed upstream payloads
pub fn parse_json<T: DeserializeOwned>(source_name: &str, body: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| ProviderError::format(source_name, e.to_string()))
}

fn classify(url: &str, err: reqwest::Error) -> ProviderError {
    // is_request covers a peer closing the connection before the response
    if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() {
        ProviderError::Transport { url: url.to_string(), message: err.to_string() }
    } else if err.is_decode() {
        ProviderError::format(url, err.to_string())
    } else {
        ProviderError::Unavailable(format!("Request to {url} failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn transport() -> ProviderError {
        ProviderError::Transport { url: "http://x".to_string(), message: "timed out".to_string() }
    }

    #[tokio::test]
    async fn test_transport_failure_retried_once() {
        let attempts = AtomicUsize::new(0);
        let result: Result<u32, _> = retry_transport_once("test", || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move { if n == 0 { Err(transport()) } else { Ok(7) } }
        })
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces_after_second_attempt() {
        let attempts = AtomicUsize::new(0);
        let result: Result<u32, _> = retry_transport_once("test", || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(transport()) }
        })
        .await;

        assert!(matches!(result, Err(ProviderError::Transport { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_status_failure_not_retried() {
        let attempts = AtomicUsize::new(0);
        let result: Result<u32, _> = retry_transport_once("test", || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(ProviderError::Status { url: "http://x".to_string(), status: 503 }) }
        })
        .await;

        assert!(matches!(result, Err(ProviderError::Status { status: 503, .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dropped_connection_is_transport_and_retried() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accepts = std::sync::Arc::new(AtomicUsize::new(0));

        let counter = accepts.clone();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                drop(socket);
            }
        });

        let client = JsonClient::new("test", &HttpSettings { timeout_secs: 5, ..Default::default() }).unwrap();
        let result = client.get_json::<serde_json::Value>(&format!("http://{addr}/stats")).await;

        assert!(matches!(result, Err(ProviderError::Transport { .. })), "got {result:?}");
        assert_eq!(accepts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_malformed_payload() {
        let result: Result<Vec<u32>, _> = parse_json("stats", "{not json");
        assert!(matches!(result, Err(ProviderError::UpstreamFormat { .. })));
    }
}
