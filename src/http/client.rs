//! Low-level HTTP client — `FreightlineHttp`.
//!
//! Owns the pooled `reqwest` transport plus the stages applied to every
//! request: header injection (fixed headers + access token), the offline
//! cache stage, request/response logging, and per-call retry policies.
//! The high-level client wraps this.

use async_lock::RwLock;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::auth::TokenStore;
use crate::config::{self, ClientConfig};
use crate::connectivity::Connectivity;
use crate::error::HttpError;
use crate::http::cache::{CachePolicy, DiskCache};
use crate::http::retry::{RetryConfig, RetryPolicy};

/// Header carrying the access token, validated by the backend on every request.
pub const ACCESS_TOKEN_HEADER: &str = "ACCESS-TOKEN";

/// Low-level HTTP client for the Freightline REST API.
#[derive(Debug, Clone)]
pub struct FreightlineHttp {
    base_url: Arc<RwLock<String>>,
    client: Client,
    token: TokenStore,
    connectivity: Connectivity,
    cache: Arc<DiskCache>,
}

impl FreightlineHttp {
    pub fn new(config: &ClientConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(config::CONNECT_TIMEOUT)
            .timeout(config::REQUEST_TIMEOUT)
            .pool_max_idle_per_host(config::POOL_MAX_IDLE_PER_HOST)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            base_url: Arc::new(RwLock::new(
                config.base_url.trim_end_matches('/').to_string(),
            )),
            client,
            token: TokenStore::new(config.access_token.clone()),
            connectivity: Connectivity::new(),
            cache: Arc::new(DiskCache::new(
                config.cache_dir.clone(),
                config.cache_max_bytes,
            )),
        }
    }

    pub async fn base_url(&self) -> String {
        self.base_url.read().await.clone()
    }

    /// Rebind to a new base URL. The pooled transport, cache, token and
    /// connectivity state are all reused; only the URL prefix changes.
    pub async fn set_base_url(&self, url: &str) {
        *self.base_url.write().await = url.trim_end_matches('/').to_string();
    }

    /// Join a path onto the current base URL.
    pub async fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.read().await, path)
    }

    pub fn token(&self) -> &TokenStore {
        &self.token
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    pub fn cache(&self) -> &DiskCache {
        &self.cache
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        self.request_with_retry(Method::GET, url, None::<&()>, retry)
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        self.request_with_retry(Method::POST, url, Some(body), retry)
            .await
    }

    async fn request_with_retry<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        let config = match retry {
            RetryPolicy::None => return self.do_request(&method, url, body).await,
            RetryPolicy::Idempotent => RetryConfig::default(),
            RetryPolicy::Custom(config) => config,
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_request::<T, B>(&method, url, body).await {
                Ok(resp) => return Ok(resp),
                Err(err) => {
                    let should_retry = match &err {
                        HttpError::ServerError { status, .. } => {
                            config.is_retryable_status(*status)
                        }
                        HttpError::Timeout => true,
                        HttpError::Reqwest(re) => {
                            re.is_connect() || re.is_timeout() || re.is_request()
                        }
                        // Offline requests never touch the network; retrying
                        // cannot help until connectivity returns.
                        _ => false,
                    };

                    if should_retry && attempt < config.max_retries {
                        let delay = config.delay_for_attempt(attempt);
                        debug!(
                            attempt = attempt + 1,
                            max = config.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            error = %err,
                            "retrying request to {}",
                            url
                        );
                        futures_timer::Delay::new(delay).await;
                        last_error = Some(err);
                    } else {
                        return Err(err);
                    }
                }
            }
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: &Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<T, HttpError> {
        // Cache stage, request side: offline means cache-only. No request
        // leaves the process while connectivity is down.
        if !self.connectivity.is_online() {
            if *method == Method::GET {
                return self.serve_cached(url).await;
            }
            return Err(HttpError::Offline(url.to_string()));
        }

        // Header stage: the fixed headers ride on the transport defaults;
        // the token is injected per request so writers take effect immediately.
        let token = self.token.get().await;
        let mut req = self
            .client
            .request(method.clone(), url)
            .header(ACCESS_TOKEN_HEADER, token);

        if let Some(b) = body {
            req = req.json(b);
        }

        debug!(%method, url, "sending request");
        let resp = req.send().await.map_err(|err| {
            if err.is_timeout() {
                HttpError::Timeout
            } else {
                HttpError::Reqwest(err)
            }
        })?;
        let status = resp.status();
        debug!(%method, url, status = status.as_u16(), "received response");

        if status.is_success() {
            let bytes = resp.bytes().await?;

            // Cache stage, response side: record GET bodies immediately stale
            // so they only ever serve as an offline fallback.
            if *method == Method::GET {
                if let Err(err) = self
                    .cache
                    .store("GET", url, status.as_u16(), &bytes, &CachePolicy::online())
                    .await
                {
                    debug!(url, error = %err, "failed to cache response");
                }
            }

            return serde_json::from_slice(&bytes)
                .map_err(|err| HttpError::Deserialize(err.to_string()));
        }

        let status_code = status.as_u16();
        let body_text = resp.text().await.unwrap_or_default();

        match status_code {
            401 => Err(HttpError::Unauthorized),
            404 => Err(HttpError::NotFound(body_text)),
            400..=499 => Err(HttpError::BadRequest(body_text)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }

    /// Offline read: honor `only-if-cached` with the four-week stale window.
    async fn serve_cached<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        if let Some(entry) = self.cache.lookup("GET", url).await {
            if entry.servable_offline() {
                debug!(url, age_secs = entry.age_secs, "offline: serving cached response");
                return serde_json::from_slice(&entry.body)
                    .map_err(|err| HttpError::Deserialize(err.to_string()));
            }
        }
        Err(HttpError::Offline(url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn http_in(dir: &TempDir, base_url: &str) -> FreightlineHttp {
        FreightlineHttp::new(&ClientConfig {
            base_url: base_url.to_string(),
            cache_dir: dir.path().join("cache"),
            ..ClientConfig::default()
        })
    }

    #[tokio::test]
    async fn fixed_headers_and_token_ride_on_every_request() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let http = http_in(&dir, &server.uri());
        http.token().set("tok-1").await;

        Mock::given(method("GET"))
            .and(path("/ping"))
            .and(header("Accept", "application/json"))
            .and(header("Accept-Encoding", "gzip"))
            .and(header("Content-Type", "application/json; charset=utf-8"))
            .and(header(ACCESS_TOKEN_HEADER, "tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let url = http.url("/ping").await;
        let _: Value = http.get(&url, RetryPolicy::None).await.unwrap();
    }

    #[tokio::test]
    async fn token_is_generated_when_unset() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let http = http_in(&dir, &server.uri());

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let url = http.url("/ping").await;
        let _: Value = http.get(&url, RetryPolicy::None).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let sent = requests[0]
            .headers
            .get(ACCESS_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        assert!(!sent.is_empty());
        // The generated token is cached for the process lifetime.
        assert_eq!(http.token().get().await, sent);
    }

    #[tokio::test]
    async fn successful_gets_are_recorded_immediately_stale() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let http = http_in(&dir, &server.uri());

        Mock::given(method("GET"))
            .and(path("/data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"n": 1})))
            .mount(&server)
            .await;

        let url = http.url("/data").await;
        let _: Value = http.get(&url, RetryPolicy::None).await.unwrap();

        let entry = http.cache().lookup("GET", &url).await.unwrap();
        assert_eq!(entry.policy, CachePolicy::online());
        assert!(!entry.is_fresh());
        assert!(entry.servable_offline());
    }

    #[tokio::test]
    async fn offline_get_serves_cache_without_touching_the_network() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let http = http_in(&dir, &server.uri());

        Mock::given(method("GET"))
            .and(path("/data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"n": 7})))
            .expect(1)
            .mount(&server)
            .await;

        let url = http.url("/data").await;
        let online: Value = http.get(&url, RetryPolicy::None).await.unwrap();

        http.connectivity().set_online(false);
        let offline: Value = http.get(&url, RetryPolicy::None).await.unwrap();
        assert_eq!(online, offline);
        // expect(1) verifies the offline read issued no request.
    }

    #[tokio::test]
    async fn offline_miss_is_an_offline_error() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let http = http_in(&dir, &server.uri());
        http.connectivity().set_online(false);

        let url = http.url("/never-fetched").await;
        let err = http.get::<Value>(&url, RetryPolicy::None).await.unwrap_err();
        assert!(matches!(err, HttpError::Offline(_)));
    }

    #[tokio::test]
    async fn offline_post_does_not_touch_the_network() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let http = http_in(&dir, &server.uri());
        http.connectivity().set_online(false);

        let url = http.url("/submit").await;
        let err = http
            .post::<Value, _>(&url, &serde_json::json!({}), RetryPolicy::None)
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::Offline(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn idempotent_policy_retries_gateway_errors() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let http = http_in(&dir, &server.uri());

        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;

        let url = http.url("/flaky").await;
        let resp: Value = http
            .get(
                &url,
                RetryPolicy::Custom(RetryConfig {
                    initial_delay: std::time::Duration::from_millis(5),
                    ..RetryConfig::default()
                }),
            )
            .await
            .unwrap();
        assert_eq!(resp["ok"], true);
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let http = http_in(&dir, &server.uri());

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let url = http.url("/missing").await;
        let err = http
            .get::<Value>(&url, RetryPolicy::Idempotent)
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::NotFound(_)));
    }

    #[tokio::test]
    async fn set_base_url_redirects_subsequent_requests() {
        let first = MockServer::start().await;
        let second = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let http = http_in(&dir, &first.uri());

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"from": "a"})))
            .expect(1)
            .mount(&first)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"from": "b"})))
            .expect(1)
            .mount(&second)
            .await;

        let url = http.url("/where").await;
        let a: Value = http.get(&url, RetryPolicy::None).await.unwrap();
        assert_eq!(a["from"], "a");

        http.set_base_url(&format!("{}/", second.uri())).await;
        assert_eq!(http.base_url().await, second.uri());

        let url = http.url("/where").await;
        let b: Value = http.get(&url, RetryPolicy::None).await.unwrap();
        assert_eq!(b["from"], "b");
    }
}
