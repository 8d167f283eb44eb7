//! Cloudflare Workers KV REST client.
//!
//! Values are addressed as
//! `{api_url}/client/v4/accounts/{account_id}/storage/kv/namespaces/{namespace_id}/values/{key}`
//! and authenticated with a bearer token. The API returns the raw stored text
//! on success and `404` when the key does not exist.

use std::time::Duration;

use reqwest::{StatusCode, Url};
use sokushuu_core::{next_waiting_total, parse_waiting_total};
use tracing::{debug, warn};

use crate::error::KvError;

/// Public Cloudflare API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.cloudflare.com";

/// Request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Number of token characters that may appear in logs.
const TOKEN_LOG_PREFIX: usize = 8;

/// Longest response excerpt written to the debug log.
const BODY_LOG_LIMIT: usize = 100;

/// Connection settings for a Workers KV namespace.
#[derive(Clone, PartialEq, Eq)]
pub struct CloudflareConfig {
    /// Cloudflare account identifier.
    pub account_id: String,
    /// KV namespace identifier.
    pub namespace_id: String,
    /// API token with KV read (and write, for subscriptions) permission.
    pub api_token: String,
    /// API base URL, [`DEFAULT_API_URL`] unless overridden.
    pub api_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl CloudflareConfig {
    /// Settings for the public API with the default timeout.
    pub fn new(
        account_id: impl Into<String>,
        namespace_id: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            namespace_id: namespace_id.into(),
            api_token: api_token.into(),
            api_url: DEFAULT_API_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Point the client at a different base URL.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Override the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl core::fmt::Debug for CloudflareConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CloudflareConfig")
            .field("account_id", &self.account_id)
            .field("namespace_id", &self.namespace_id)
            .field("api_token", &token_hint(&self.api_token))
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Client for one Workers KV namespace.
#[derive(Clone)]
pub struct CloudflareKv {
    client: reqwest::Client,
    base: Url,
    account_id: String,
    namespace_id: String,
    api_token: String,
}

impl CloudflareKv {
    /// Build a client from its settings.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::Config`] if the base URL cannot be parsed or the
    /// HTTP client cannot be constructed.
    pub fn new(config: &CloudflareConfig) -> Result<Self, KvError> {
        let base = Url::parse(&config.api_url)
            .map_err(|e| KvError::Config(format!("invalid KV API URL {}: {e}", config.api_url)))?;
        if base.cannot_be_a_base() {
            return Err(KvError::Config(format!(
                "KV API URL cannot be a base: {}",
                config.api_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| KvError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base,
            account_id: config.account_id.clone(),
            namespace_id: config.namespace_id.clone(),
            api_token: config.api_token.clone(),
        })
    }

    /// Full URL of `key`. The key is percent-encoded as one path segment.
    pub fn value_url(&self, key: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "client",
                "v4",
                "accounts",
                self.account_id.as_str(),
                "storage",
                "kv",
                "namespaces",
                self.namespace_id.as_str(),
                "values",
                key,
            ]);
        }
        url
    }

    /// Read the raw text stored at `key`.
    ///
    /// Returns `Ok(None)` when the API answers `404`.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::Transport`] if no response was received, or
    /// [`KvError::Upstream`] for any other non-2xx status.
    pub async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let url = self.value_url(key);
        debug!(%url, token = %self.token_hint(), "KV GET");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        let status = response.status();
        debug!(key, status = status.as_u16(), "KV GET response");

        if status == StatusCode::NOT_FOUND {
            debug!(key, "KV key not found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(upstream_error(key, status, response).await);
        }

        let text = response.text().await?;
        debug!(key, value = %excerpt(&text), "KV GET success");
        Ok(Some(text))
    }

    /// Store `value` at `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::Transport`] if no response was received, or
    /// [`KvError::Upstream`] for any non-2xx status.
    pub async fn put(&self, key: &str, value: &str) -> Result<(), KvError> {
        let url = self.value_url(key);
        debug!(%url, token = %self.token_hint(), "KV PUT");

        let response = self
            .client
            .put(url)
            .bearer_auth(&self.api_token)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(value.to_owned())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(upstream_error(key, status, response).await);
        }
        debug!(key, status = status.as_u16(), "KV PUT success");
        Ok(())
    }

    /// Add one to the counter at `key` and return the new value.
    ///
    /// Workers KV has no atomic increment: this is a read followed by a
    /// write, so two concurrent calls can both store the same total.
    ///
    /// # Errors
    ///
    /// Returns [`KvError`] if either request fails.
    pub async fn increment(&self, key: &str) -> Result<u64, KvError> {
        let current = self
            .get(key)
            .await?
            .map_or(0, |raw| parse_waiting_total(&raw));
        let next = next_waiting_total(current);
        self.put(key, &next.to_string()).await?;
        Ok(next)
    }

    fn token_hint(&self) -> String {
        token_hint(&self.api_token)
    }
}

impl core::fmt::Debug for CloudflareKv {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CloudflareKv")
            .field("base", &self.base.as_str())
            .field("account_id", &self.account_id)
            .field("namespace_id", &self.namespace_id)
            .field("api_token", &self.token_hint())
            .finish_non_exhaustive()
    }
}

/// The first few characters of `token` followed by `...`, safe to log.
pub fn token_hint(token: &str) -> String {
    let prefix: String = token.chars().take(TOKEN_LOG_PREFIX).collect();
    format!("{prefix}...")
}

/// Turn a non-2xx response into [`KvError::Upstream`], keeping its body.
async fn upstream_error(key: &str, status: StatusCode, response: reqwest::Response) -> KvError {
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unable to read error body".to_owned());
    warn!(key, status = status.as_u16(), body = %excerpt(&body), "KV API returned an error");
    KvError::Upstream {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_owned(),
        body,
    }
}

/// Truncate `text` for logging.
fn excerpt(text: &str) -> String {
    if text.chars().count() > BODY_LOG_LIMIT {
        let head: String = text.chars().take(BODY_LOG_LIMIT).collect();
        format!("{head}...")
    } else {
        text.to_owned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VALUE_PATH: &str = "/client/v4/accounts/acc/storage/kv/namespaces/ns/values/LAUNCH";

    fn client(server: &MockServer) -> CloudflareKv {
        let config = CloudflareConfig::new("acc", "ns", "secret-token").with_api_url(server.uri());
        CloudflareKv::new(&config).unwrap()
    }

    #[test]
    fn value_url_uses_public_api_by_default() {
        let kv = CloudflareKv::new(&CloudflareConfig::new("acc", "ns", "t")).unwrap();
        assert_eq!(
            kv.value_url("SOKUSHUU_LANDING_PAGE_WAITING_TOTAL").as_str(),
            "https://api.cloudflare.com/client/v4/accounts/acc/storage/kv/namespaces/ns/values/SOKUSHUU_LANDING_PAGE_WAITING_TOTAL"
        );
    }

    #[test]
    fn value_url_escapes_key() {
        let kv = CloudflareKv::new(&CloudflareConfig::new("acc", "ns", "t")).unwrap();
        let url = kv.value_url("a/b?c").to_string();
        assert!(url.ends_with("/values/a%2Fb%3Fc"), "{url}");
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let config = CloudflareConfig::new("acc", "ns", "t").with_api_url("not a url");
        assert!(matches!(CloudflareKv::new(&config), Err(KvError::Config(_))));
    }

    #[test]
    fn token_hint_hides_secret() {
        let kv = CloudflareKv::new(&CloudflareConfig::new("acc", "ns", "abcdefghijklmnop")).unwrap();
        assert_eq!(kv.token_hint(), "abcdefgh...");
        assert!(!format!("{kv:?}").contains("ijklmnop"));
    }

    #[test]
    fn config_debug_hides_secret() {
        let config = CloudflareConfig::new("acc", "ns", "abcdefghijklmnop");
        let debug = format!("{config:?}");
        assert!(debug.contains("abcdefgh..."), "{debug}");
        assert!(!debug.contains("ijklmnop"), "{debug}");
    }

    #[tokio::test]
    async fn get_returns_raw_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(VALUE_PATH))
            .and(header("Authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("2025-08-24T00:00:00Z"))
            .mount(&server)
            .await;

        let value = client(&server).get("LAUNCH").await.unwrap();
        assert_eq!(value.as_deref(), Some("2025-08-24T00:00:00Z"));
    }

    #[tokio::test]
    async fn get_maps_404_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(VALUE_PATH))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert!(client(&server).get("LAUNCH").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_reports_upstream_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(VALUE_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = client(&server).get("LAUNCH").await.unwrap_err();
        assert!(matches!(err, KvError::Upstream { status: 500, .. }));
        assert_eq!(err.to_string(), "KV API error: 500 Internal Server Error - boom");
    }

    #[tokio::test]
    async fn put_sends_text_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(VALUE_PATH))
            .and(header("Authorization", "Bearer secret-token"))
            .and(body_string("42"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client(&server).put("LAUNCH", "42").await.unwrap();
    }

    #[tokio::test]
    async fn put_rejected_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(VALUE_PATH))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = client(&server).put("LAUNCH", "1").await.unwrap_err();
        assert!(matches!(err, KvError::Upstream { status: 403, .. }));
    }

    #[tokio::test]
    async fn increment_reads_then_writes_next_value() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(VALUE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("9 people"))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(VALUE_PATH))
            .and(body_string("10"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(client(&server).increment("LAUNCH").await.unwrap(), 10);
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        // Bind and release a port so nothing is listening on it.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = CloudflareConfig::new("acc", "ns", "t")
            .with_api_url(format!("http://{addr}"))
            .with_timeout(Duration::from_millis(500));
        let kv = CloudflareKv::new(&config).unwrap();
        assert!(matches!(kv.get("LAUNCH").await, Err(KvError::Transport(_))));
    }

    #[test]
    fn excerpt_truncates_long_bodies() {
        let long = "x".repeat(150);
        assert_eq!(excerpt(&long).chars().count(), 103);
        assert_eq!(excerpt("short"), "short");
    }
}
