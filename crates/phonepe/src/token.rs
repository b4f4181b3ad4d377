//! In-process access-token cache.
//!
//! Process-wide state with a refresh-before-expiry lifecycle, behind an
//! injected clock so tests can drive expiry without network calls. Refresh
//! is idempotent on the provider side, so no lock is held across a refresh:
//! concurrent requests near expiry may fetch the token twice, which is fine.

use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Refresh this many seconds before the token actually expires, to avoid
/// races between concurrent requests and the gateway's clock.
pub const REFRESH_MARGIN_SECS: u64 = 300;

/// Clock seam for token expiry.
pub trait Clock: Send + Sync {
    fn now_epoch_secs(&self) -> u64;
}

/// Wall-clock implementation used in production.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: u64,
}

/// Lock-free-in-spirit token cache: a value plus expiry timestamp. Readers
/// never block on a refresh; a stale read just triggers another fetch.
#[derive(Debug, Default)]
pub struct TokenCache {
    inner: RwLock<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached token if it is still comfortably outside the
    /// refresh margin.
    pub fn get_fresh(&self, clock: &dyn Clock) -> Option<String> {
        let guard = self.inner.read().ok()?;
        let cached = guard.as_ref()?;
        if clock.now_epoch_secs() + REFRESH_MARGIN_SECS < cached.expires_at {
            Some(cached.access_token.clone())
        } else {
            None
        }
    }

    /// Stores a freshly-exchanged token.
    pub fn store(&self, access_token: String, expires_at: u64) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = Some(CachedToken {
                access_token,
                expires_at,
            });
        }
    }
}
