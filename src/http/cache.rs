//! On-disk response cache with Cache-Control freshness bookkeeping.
//!
//! Entries are keyed by a SHA3-256 digest of `method + url` and stored as a
//! metadata JSON file plus a raw body file. Online responses are recorded
//! immediately stale (`max-age=0`) so they are only ever served when
//! connectivity is down, and then only within the four-week stale window.
//! This is a best-effort offline heuristic, not a correctness guarantee.

use async_lock::Mutex;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::CacheError;

/// Directory name of the response cache under the host cache directory.
pub const CACHE_DIR_NAME: &str = "freightline-http-cache";

/// Total size cap for the cache.
pub const DEFAULT_CACHE_MAX_BYTES: u64 = 50 * 1024 * 1024;

/// How long an entry stays servable while offline: 4 weeks.
pub const OFFLINE_MAX_STALE_SECS: i64 = 2_419_200;

// ─── CachePolicy ─────────────────────────────────────────────────────────────

/// The two Cache-Control forms this client writes and honors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    pub only_if_cached: bool,
    pub max_age: Option<i64>,
    pub max_stale: Option<i64>,
}

impl CachePolicy {
    /// Policy recorded with responses received while online: immediately stale.
    pub fn online() -> Self {
        Self {
            only_if_cached: false,
            max_age: Some(0),
            max_stale: None,
        }
    }

    /// Policy applied to reads while offline: cache only, stale up to 4 weeks.
    pub fn offline() -> Self {
        Self {
            only_if_cached: true,
            max_age: None,
            max_stale: Some(OFFLINE_MAX_STALE_SECS),
        }
    }

    /// Render as a `Cache-Control` header value, e.g. `public, max-age=0`.
    pub fn header_value(&self) -> String {
        let mut parts = vec!["public".to_string()];
        if self.only_if_cached {
            parts.push("only-if-cached".to_string());
        }
        if let Some(age) = self.max_age {
            parts.push(format!("max-age={age}"));
        }
        if let Some(stale) = self.max_stale {
            parts.push(format!("max-stale={stale}"));
        }
        parts.join(", ")
    }

    /// Parse the directives this client understands; unknown ones are ignored.
    pub fn parse(value: &str) -> Self {
        let mut policy = Self {
            only_if_cached: false,
            max_age: None,
            max_stale: None,
        };
        for directive in value.split(',') {
            let directive = directive.trim();
            if directive == "only-if-cached" {
                policy.only_if_cached = true;
            } else if let Some(age) = directive.strip_prefix("max-age=") {
                policy.max_age = age.parse().ok();
            } else if let Some(stale) = directive.strip_prefix("max-stale=") {
                policy.max_stale = stale.parse().ok();
            }
        }
        policy
    }
}

// ─── Entries ─────────────────────────────────────────────────────────────────

/// Metadata stored alongside each cached body.
#[derive(Debug, Serialize, Deserialize)]
struct EntryMeta {
    url: String,
    status: u16,
    stored_at: DateTime<Utc>,
    cache_control: String,
}

/// A cached response handed back by [`DiskCache::lookup`].
#[derive(Debug)]
pub struct CachedResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub age_secs: i64,
    pub policy: CachePolicy,
}

impl CachedResponse {
    /// Fresh per the recorded policy: an entry is stale once its age reaches
    /// `max-age`. Online entries carry `max-age=0`, so this is false for them
    /// the moment they land on disk.
    pub fn is_fresh(&self) -> bool {
        self.policy.max_age.is_some_and(|age| self.age_secs < age)
    }

    /// Servable as an offline fallback: within the four-week stale window.
    pub fn servable_offline(&self) -> bool {
        self.age_secs <= OFFLINE_MAX_STALE_SECS
    }
}

// ─── DiskCache ───────────────────────────────────────────────────────────────

/// Size-capped on-disk store for GET response bodies.
///
/// Writes are serialized through an async lock; reads go straight to disk.
/// A corrupt entry is dropped and reported as a miss, never as an error.
#[derive(Debug)]
pub struct DiskCache {
    root: PathBuf,
    max_bytes: u64,
    write_lock: Mutex<()>,
}

impl DiskCache {
    pub fn new(root: PathBuf, max_bytes: u64) -> Self {
        Self {
            root,
            max_bytes,
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_key(method: &str, url: &str) -> String {
        let mut hasher = Sha3_256::new();
        hasher.update(method.as_bytes());
        hasher.update(url.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.meta.json"))
    }

    fn body_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.body"))
    }

    /// Record a response body under the given policy, then enforce the size cap.
    pub async fn store(
        &self,
        method: &str,
        url: &str,
        status: u16,
        body: &[u8],
        policy: &CachePolicy,
    ) -> Result<(), CacheError> {
        let _guard = self.write_lock.lock().await;

        fs::create_dir_all(&self.root)?;
        let key = Self::entry_key(method, url);
        let meta = EntryMeta {
            url: url.to_string(),
            status,
            stored_at: Utc::now(),
            cache_control: policy.header_value(),
        };

        fs::write(self.body_path(&key), body)?;
        fs::write(self.meta_path(&key), serde_json::to_vec(&meta)?)?;
        debug!(url, status, cache_control = %meta.cache_control, "cached response");

        self.enforce_cap()
    }

    /// Look up a cached response. Corrupt or unreadable entries are removed
    /// and reported as a miss.
    pub async fn lookup(&self, method: &str, url: &str) -> Option<CachedResponse> {
        let key = Self::entry_key(method, url);
        let meta_path = self.meta_path(&key);
        let body_path = self.body_path(&key);

        let meta_bytes = fs::read(&meta_path).ok()?;
        let meta: EntryMeta = match serde_json::from_slice(&meta_bytes) {
            Ok(meta) => meta,
            Err(err) => {
                warn!(url, error = %err, "dropping corrupt cache entry");
                let _ = fs::remove_file(&meta_path);
                let _ = fs::remove_file(&body_path);
                return None;
            }
        };

        let body = match fs::read(&body_path) {
            Ok(body) => body,
            Err(err) => {
                warn!(url, error = %err, "cache body unreadable, dropping entry");
                let _ = fs::remove_file(&meta_path);
                return None;
            }
        };

        Some(CachedResponse {
            status: meta.status,
            body,
            age_secs: (Utc::now() - meta.stored_at).num_seconds(),
            policy: CachePolicy::parse(&meta.cache_control),
        })
    }

    /// Remove every entry.
    pub async fn clear(&self) -> Result<(), CacheError> {
        let _guard = self.write_lock.lock().await;
        if self.root.exists() {
            fs::remove_dir_all(&self.root)?;
        }
        Ok(())
    }

    /// Evict oldest entries until the total size fits the cap.
    fn enforce_cap(&self) -> Result<(), CacheError> {
        let mut entries: Vec<(DateTime<Utc>, u64, PathBuf, PathBuf)> = Vec::new();
        let mut total: u64 = 0;

        for dir_entry in fs::read_dir(&self.root)? {
            let path = dir_entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(key) = name.strip_suffix(".meta.json") else {
                continue;
            };
            let body_path = self.body_path(key);
            let meta_size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            let body_size = fs::metadata(&body_path).map(|m| m.len()).unwrap_or(0);

            // Unreadable metadata sorts first so it is evicted first.
            let stored_at = fs::read(&path)
                .ok()
                .and_then(|bytes| serde_json::from_slice::<EntryMeta>(&bytes).ok())
                .map(|meta| meta.stored_at)
                .unwrap_or(DateTime::<Utc>::MIN_UTC);

            total += meta_size + body_size;
            entries.push((stored_at, meta_size + body_size, path, body_path));
        }

        if total <= self.max_bytes {
            return Ok(());
        }

        entries.sort_by_key(|(stored_at, ..)| *stored_at);
        for (stored_at, size, meta_path, body_path) in entries {
            if total <= self.max_bytes {
                break;
            }
            warn!(stored_at = %stored_at, size, "evicting cache entry over size cap");
            let _ = fs::remove_file(meta_path);
            let _ = fs::remove_file(body_path);
            total = total.saturating_sub(size);
        }
        Ok(())
    }
}
