//! Shared access-token store.
//!
//! The backend validates an opaque `ACCESS-TOKEN` header on every request.
//! Until the app logs in, a random per-process token identifies the device;
//! a successful login overwrites it with the server-issued token.

use async_lock::RwLock;
use std::sync::Arc;
use uuid::Uuid;

/// Process-wide token state behind an atomic reference swap.
///
/// Last writer wins; concurrent readers may observe a stale value but never a
/// torn one. All clones share the same underlying slot.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    token: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    pub fn new(initial: Option<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(initial)),
        }
    }

    /// Current token, generating and caching a random one if unset.
    ///
    /// Repeated calls return the same value until [`set`](Self::set) replaces it.
    pub async fn get(&self) -> String {
        {
            let token = self.token.read().await;
            if let Some(t) = token.as_ref() {
                return t.clone();
            }
        }

        let mut token = self.token.write().await;
        // A concurrent caller may have won the race to generate.
        if let Some(t) = token.as_ref() {
            return t.clone();
        }
        let generated = Uuid::new_v4().to_string();
        *token = Some(generated.clone());
        generated
    }

    /// Overwrite the shared token. Immediately visible to future requests.
    pub async fn set(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    /// Drop the token; the next [`get`](Self::get) generates a fresh one.
    pub async fn clear(&self) {
        *self.token.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn generates_once_and_sticks() {
        let store = TokenStore::default();
        let first = store.get().await;
        assert!(!first.is_empty());
        assert_eq!(store.get().await, first);
    }

    #[tokio::test]
    async fn set_overrides_generated_token() {
        let store = TokenStore::default();
        let _ = store.get().await;
        store.set("X").await;
        assert_eq!(store.get().await, "X");
    }

    #[tokio::test]
    async fn preset_token_is_returned_verbatim() {
        let store = TokenStore::new(Some("seeded".into()));
        assert_eq!(store.get().await, "seeded");
    }

    #[tokio::test]
    async fn clear_regenerates() {
        let store = TokenStore::new(Some("seeded".into()));
        store.clear().await;
        let fresh = store.get().await;
        assert_ne!(fresh, "seeded");
        assert!(!fresh.is_empty());
    }

    #[tokio::test]
    async fn clones_share_the_slot() {
        let store = TokenStore::default();
        let clone = store.clone();
        store.set("shared").await;
        assert_eq!(clone.get().await, "shared");
    }
}
