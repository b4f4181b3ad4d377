//! Pending-registration continuation store.
//!
//! A payment attempt suspends the registration flow while the browser is on
//! the gateway's hosted page. The draft is persisted here, keyed by the
//! merchant order id, before the redirect out; finalization resumes it. The
//! process that resumes may not be the one that suspended, so this lives
//! behind a trait rather than in request memory.
//!
//! `take` removes the record on the first finalize attempt, which is what
//! makes finalization at-most-once: a reloaded result page finds no draft
//! and gets the explicit "contact support" terminal instead of a duplicate.
//!
//! Records only need to live for the minutes a checkout takes. Abandoned
//! attempts expire after [`PENDING_TTL`]; expired entries are swept on every
//! `put`, so the store stays bounded by the recent attempt rate.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use codemasti_core::RegistrationDraft;
use tokio::sync::RwLock;

/// How long an unfinalized draft survives. Generous against slow checkouts;
/// a finalize after this window gets the contact-support terminal.
pub const PENDING_TTL: Duration = Duration::from_secs(30 * 60);

#[async_trait]
pub trait PendingStore: Send + Sync {
    async fn put(&self, merchant_order_id: String, draft: RegistrationDraft);

    /// Removes and returns the draft for this merchant order id, if any.
    async fn take(&self, merchant_order_id: &str) -> Option<RegistrationDraft>;
}

#[derive(Debug)]
pub struct InMemoryPendingStore {
    inner: RwLock<HashMap<String, (RegistrationDraft, Instant)>>,
    ttl: Duration,
}

impl InMemoryPendingStore {
    pub fn new() -> Self {
        Self::with_ttl(PENDING_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Number of live (unexpired) records.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.inner
            .read()
            .await
            .values()
            .filter(|(_, expires_at)| now < *expires_at)
            .count()
    }
}

impl Default for InMemoryPendingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PendingStore for InMemoryPendingStore {
    async fn put(&self, merchant_order_id: String, draft: RegistrationDraft) {
        let now = Instant::now();
        let mut inner = self.inner.write().await;
        inner.retain(|_, (_, expires_at)| now < *expires_at);
        inner.insert(merchant_order_id, (draft, now + self.ttl));
    }

    async fn take(&self, merchant_order_id: &str) -> Option<RegistrationDraft> {
        let (draft, expires_at) = self.inner.write().await.remove(merchant_order_id)?;
        if Instant::now() < expires_at {
            Some(draft)
        } else {
            None
        }
    }
}
