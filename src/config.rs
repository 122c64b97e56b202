//! Client configuration.
//!
//! Collects everything the transport is parameterized with so that a fully
//! configured client can be passed around explicitly instead of reaching for
//! global mutable state.

use std::path::PathBuf;
use std::time::Duration;

use crate::http::cache::{CACHE_DIR_NAME, DEFAULT_CACHE_MAX_BYTES};
use crate::network::DEFAULT_API_URL;

/// Connect timeout applied to every request.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Total request timeout. `reqwest` has no separate read/write timeouts;
/// this bound covers both.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Idle connections kept per host by the pool.
pub const POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Configuration for [`FreightlineClient`](crate::client::FreightlineClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL. Replaceable at runtime via the client.
    pub base_url: String,
    /// Directory holding the on-disk response cache.
    pub cache_dir: PathBuf,
    /// Total size cap for the on-disk cache, in bytes.
    pub cache_max_bytes: u64,
    /// Pre-set access token. Generated lazily on first use when `None`.
    pub access_token: Option<String>,
    /// How many times a subscription redelivers before surfacing the error.
    pub retry_count: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            cache_dir: std::env::temp_dir().join(CACHE_DIR_NAME),
            cache_max_bytes: DEFAULT_CACHE_MAX_BYTES,
            access_token: None,
            retry_count: 0,
        }
    }
}
