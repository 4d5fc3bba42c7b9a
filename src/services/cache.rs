use async_trait::async_trait;
use crate::models::{MatchDecision, MatchingRequest, MatchingResult};
use crate::services::store::{MatchResultStore, StoreError, StoredMatching};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Read-through cache in front of a result store
///
/// Only stored lookups are cached. Writes go straight to the inner store and
/// evict the affected entry, so a re-run or a decision is visible on the next
/// read. Scores themselves are never cached.
///
/// Every write bumps `write_epoch` before evicting. A fill whose read raced a
/// write sees the epoch move and evicts its own entry, so an older value can
/// never outlive the write that replaced it.
pub struct CachedResultStore {
    inner: Arc<dyn MatchResultStore>,
    l1_cache: moka::future::Cache<String, StoredMatching>,
    write_epoch: AtomicU64,
}

impl CachedResultStore {
    pub fn new(inner: Arc<dyn MatchResultStore>, l1_size: u64, ttl_secs: u64) -> Self {
        let l1_cache = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            inner,
            l1_cache,
            write_epoch: AtomicU64::new(0),
        }
    }

    async fn invalidate_after_write(&self, request_id: &str) {
        self.write_epoch.fetch_add(1, Ordering::SeqCst);
        self.l1_cache.invalidate(request_id).await;
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            l1_size: self.l1_cache.entry_count(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub l1_size: u64,
}

#[async_trait]
impl MatchResultStore for CachedResultStore {
    async fn save(&self, request: &MatchingRequest, result: &MatchingResult) -> Result<(), StoreError> {
        self.inner.save(request, result).await?;
        self.invalidate_after_write(&request.id).await;
        Ok(())
    }

    async fn get(&self, request_id: &str) -> Result<Option<StoredMatching>, StoreError> {
        if let Some(stored) = self.l1_cache.get(request_id).await {
            tracing::trace!("L1 cache hit: {}", request_id);
            return Ok(Some(stored));
        }

        let epoch = self.write_epoch.load(Ordering::SeqCst);
        let stored = self.inner.get(request_id).await?;
        if let Some(stored) = &stored {
            self.l1_cache.insert(request_id.to_string(), stored.clone()).await;

            if self.write_epoch.load(Ordering::SeqCst) != epoch {
                tracing::trace!("Write raced cache fill, evicting: {}", request_id);
                self.l1_cache.invalidate(request_id).await;
            }
        }

        tracing::trace!("Cache miss: {}", request_id);
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<MatchingResult>, StoreError> {
        self.inner.list().await
    }

    async fn record_decision(&self, decision: &MatchDecision) -> Result<(), StoreError> {
        self.inner.record_decision(decision).await?;
        self.invalidate_after_write(&decision.request_id).await;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.inner.health_check().await
    }

    fn cache_stats(&self) -> Option<CacheStats> {
        Some(self.stats())
    }
}
