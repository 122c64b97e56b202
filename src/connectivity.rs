//! Process-wide connectivity state.
//!
//! The SDK cannot observe radio state itself — the host application wires its
//! platform reachability callbacks to [`Connectivity::set_online`]. The cache
//! stage reads this flag on every request to decide between the network and
//! a cache-only read.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared online/offline flag.
///
/// Cloning is cheap and all clones observe the same state. Defaults to online.
#[derive(Debug, Clone)]
pub struct Connectivity {
    online: Arc<AtomicBool>,
}

impl Connectivity {
    pub fn new() -> Self {
        Self {
            online: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Record a connectivity change. Immediately visible to all clones.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Release);
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::new()
    }
}
