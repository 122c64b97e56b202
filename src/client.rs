//! High-level client — `FreightlineClient` with nested sub-client accessors.
//!
//! Built once from a [`ClientConfig`] and passed around explicitly; the
//! process-wide [`shared`](FreightlineClient::shared) accessor exists for
//! hosts that want exactly one instance without threading it through every
//! call site.

use std::future::Future;
use std::path::PathBuf;
use std::sync::OnceLock;

use tokio::task::JoinHandle;

use crate::config::ClientConfig;
use crate::connectivity::Connectivity;
use crate::domain::account::Accounts;
use crate::domain::waybill::Waybills;
use crate::error::SdkError;
use crate::http::FreightlineHttp;
use crate::task::{self, Observer};

static SHARED: OnceLock<FreightlineClient> = OnceLock::new();

/// The primary entry point for the Freightline SDK.
///
/// Provides nested sub-client accessors per domain: `client.accounts()`,
/// `client.waybills()`. Cloning is cheap; clones share the transport, cache,
/// token and connectivity state.
#[derive(Debug, Clone)]
pub struct FreightlineClient {
    pub(crate) http: FreightlineHttp,
    retry_count: u32,
}

impl FreightlineClient {
    pub fn builder() -> FreightlineClientBuilder {
        FreightlineClientBuilder::default()
    }

    /// The process-wide instance, constructed with defaults on first access.
    pub fn shared() -> &'static FreightlineClient {
        SHARED.get_or_init(|| Self::from_config(ClientConfig::default()))
    }

    fn from_config(config: ClientConfig) -> Self {
        Self {
            http: FreightlineHttp::new(&config),
            retry_count: config.retry_count,
        }
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn accounts(&self) -> Accounts<'_> {
        Accounts { client: self }
    }

    pub fn waybills(&self) -> Waybills<'_> {
        Waybills { client: self }
    }

    // ── Shared state ─────────────────────────────────────────────────────

    /// Current access token, generated and cached on first use.
    pub async fn access_token(&self) -> String {
        self.http.token().get().await
    }

    /// Overwrite the shared access token; future requests carry it.
    pub async fn set_access_token(&self, token: impl Into<String>) {
        self.http.token().set(token).await;
    }

    pub async fn base_url(&self) -> String {
        self.http.base_url().await
    }

    /// Rebind the typed API to a new base URL, reusing the configured
    /// transport and cache.
    pub async fn set_base_url(&self, url: &str) {
        self.http.set_base_url(url).await;
    }

    /// Connectivity flag for the host application's reachability hooks.
    pub fn connectivity(&self) -> &Connectivity {
        self.http.connectivity()
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub(crate) fn http(&self) -> &FreightlineHttp {
        &self.http
    }

    // ── Subscriptions ────────────────────────────────────────────────────

    /// Run `factory` on the background context, resubscribing on failure up
    /// to the configured retry count, then deliver the outcome to `observer`.
    ///
    /// ```rust,ignore
    /// let client = FreightlineClient::shared().clone();
    /// client.subscribe(
    ///     move || {
    ///         let client = client.clone();
    ///         async move { client.waybills().list(None, None).await }
    ///     },
    ///     listing_observer,
    /// );
    /// ```
    pub fn subscribe<T, F, Fut, O>(&self, factory: F, observer: O) -> JoinHandle<()>
    where
        T: Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, SdkError>> + Send + 'static,
        O: Observer<T> + 'static,
    {
        task::spawn_with_retry(self.retry_count, factory, observer)
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct FreightlineClientBuilder {
    config: ClientConfig,
}

impl FreightlineClientBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.config.base_url = url.to_string();
        self
    }

    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.cache_dir = dir.into();
        self
    }

    pub fn cache_max_bytes(mut self, max_bytes: u64) -> Self {
        self.config.cache_max_bytes = max_bytes;
        self
    }

    /// Pre-set the access token instead of generating one lazily.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.config.access_token = Some(token.into());
        self
    }

    /// How many times [`FreightlineClient::subscribe`] resubscribes on
    /// failure before surfacing the error. Defaults to 0.
    pub fn retry_count(mut self, count: u32) -> Self {
        self.config.retry_count = count;
        self
    }

    pub fn build(self) -> Result<FreightlineClient, SdkError> {
        Ok(FreightlineClient::from_config(self.config))
    }
}

impl From<ClientConfig> for FreightlineClient {
    fn from(config: ClientConfig) -> Self {
        Self::from_config(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::DEFAULT_API_URL;

    #[tokio::test]
    async fn builder_defaults_match_config_defaults() {
        let client = FreightlineClient::builder().build().unwrap();
        assert_eq!(client.base_url().await, DEFAULT_API_URL);
        assert_eq!(client.retry_count(), 0);
    }

    #[tokio::test]
    async fn builder_trims_trailing_slash() {
        let client = FreightlineClient::builder()
            .base_url("https://staging.freightline.app/")
            .build()
            .unwrap();
        assert_eq!(client.base_url().await, "https://staging.freightline.app");
    }

    #[tokio::test]
    async fn preset_token_wins_over_generation() {
        let client = FreightlineClient::builder()
            .access_token("preset")
            .build()
            .unwrap();
        assert_eq!(client.access_token().await, "preset");
    }

    #[tokio::test]
    async fn set_access_token_is_immediately_visible() {
        let client = FreightlineClient::builder().build().unwrap();
        client.set_access_token("X").await;
        assert_eq!(client.access_token().await, "X");
    }

    #[test]
    fn shared_returns_the_same_instance() {
        let a = FreightlineClient::shared();
        let b = FreightlineClient::shared();
        assert!(std::ptr::eq(a, b));
    }
}
