//! Ranked fallback chain over the configured storage backends.

use tracing::{debug, warn};

use super::FeedbackStore;
use crate::domain::{EntryId, FeedbackEntry, StoreKind};
use crate::error::{Result, StoreError};

/// Stores in fixed priority order.
///
/// Writes go to the first store that accepts them; reads come from the
/// first store with data. Per-store failures are logged and swallowed, so
/// a dead remote backend degrades the chain rather than the request. Only
/// deletes are routed to a single named store, since exactly one store is
/// authoritative for the ids it handed out.
pub struct FallbackChain {
    stores: Vec<Box<dyn FeedbackStore>>,
}

impl FallbackChain {
    pub fn new(stores: Vec<Box<dyn FeedbackStore>>) -> Self {
        Self { stores }
    }

    /// Backend kinds in priority order.
    pub fn kinds(&self) -> Vec<StoreKind> {
        self.stores.iter().map(|s| s.kind()).collect()
    }

    /// The stores themselves, in priority order.
    pub fn stores(&self) -> &[Box<dyn FeedbackStore>] {
        &self.stores
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Append to the first store that accepts the write; reports which one
    /// did. Fails only when every store failed.
    pub async fn append(&self, entry: &FeedbackEntry) -> Result<StoreKind> {
        for store in &self.stores {
            match store.append(entry).await {
                Ok(()) => {
                    debug!(store = %store.kind(), "entry appended");
                    return Ok(store.kind());
                }
                Err(e) => {
                    warn!(store = %store.kind(), error = %e, "append failed, trying next store");
                }
            }
        }
        Err(StoreError::AllStoresFailed.into())
    }

    /// Return the first non-empty result set and the store that served it.
    /// Errors count as empty. When every store is empty, the result is
    /// attributed to the last (always-available) store in the chain.
    pub async fn list(&self, limit: usize) -> Result<(StoreKind, Vec<FeedbackEntry>)> {
        for store in &self.stores {
            match store.list(limit).await {
                Ok(entries) if !entries.is_empty() => {
                    debug!(store = %store.kind(), count = entries.len(), "serving entries");
                    return Ok((store.kind(), entries));
                }
                Ok(_) => debug!(store = %store.kind(), "store empty, trying next"),
                Err(e) => {
                    warn!(store = %store.kind(), error = %e, "list failed, trying next store");
                }
            }
        }

        match self.stores.last() {
            Some(store) => Ok((store.kind(), Vec::new())),
            None => Err(StoreError::AllStoresFailed.into()),
        }
    }

    /// Delete from the named store only; no cross-store reconciliation.
    pub async fn delete(&self, kind: StoreKind, id: &EntryId) -> Result<bool> {
        let store = self
            .stores
            .iter()
            .find(|s| s.kind() == kind)
            .ok_or_else(|| StoreError::UnknownStore(kind.to_string()))?;

        store.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use chrono::Utc;

    /// Store that fails every operation, standing in for an unreachable
    /// remote backend.
    struct DeadStore(StoreKind);

    #[async_trait]
    impl FeedbackStore for DeadStore {
        fn kind(&self) -> StoreKind {
            self.0
        }

        async fn append(&self, _entry: &FeedbackEntry) -> Result<()> {
            Err(StoreError::Unavailable {
                store: self.0,
                reason: "connection refused".to_string(),
            }
            .into())
        }

        async fn list(&self, _limit: usize) -> Result<Vec<FeedbackEntry>> {
            Err(StoreError::Unavailable {
                store: self.0,
                reason: "connection refused".to_string(),
            }
            .into())
        }

        async fn delete(&self, _id: &EntryId) -> Result<bool> {
            Err(StoreError::Unavailable {
                store: self.0,
                reason: "connection refused".to_string(),
            }
            .into())
        }
    }

    fn entry(text: &str) -> FeedbackEntry {
        FeedbackEntry::new(Utc::now(), text)
    }

    #[tokio::test]
    async fn append_falls_through_dead_primary() {
        let chain = FallbackChain::new(vec![
            Box::new(DeadStore(StoreKind::Airtable)),
            Box::new(MemoryStore::new()),
        ]);

        let stored_to = chain.append(&entry("still works")).await.unwrap();
        assert_eq!(stored_to, StoreKind::Memory);

        let (source, entries) = chain.list(10).await.unwrap();
        assert_eq!(source, StoreKind::Memory);
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn append_fails_when_every_store_fails() {
        let chain = FallbackChain::new(vec![
            Box::new(DeadStore(StoreKind::Airtable)),
            Box::new(DeadStore(StoreKind::Sqlite)),
        ]);

        let result = chain.append(&entry("nowhere to go")).await;
        assert!(matches!(
            result,
            Err(Error::Store(StoreError::AllStoresFailed))
        ));
    }

    #[tokio::test]
    async fn list_skips_empty_stores() {
        let primary = MemoryStore::new();
        let secondary = MemoryStore::new();
        secondary.append(&entry("from secondary")).await.unwrap();

        // Both stores report kind Memory; the non-empty one must win.
        let chain = FallbackChain::new(vec![Box::new(primary), Box::new(secondary)]);

        let (_, entries) = chain.list(10).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "from secondary");
    }

    #[tokio::test]
    async fn empty_chain_result_is_attributed_to_last_store() {
        let chain = FallbackChain::new(vec![
            Box::new(DeadStore(StoreKind::Airtable)),
            Box::new(MemoryStore::new()),
        ]);

        let (source, entries) = chain.list(10).await.unwrap();
        assert_eq!(source, StoreKind::Memory);
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn delete_routes_to_named_store_only() {
        let memory = MemoryStore::new();
        memory.append(&entry("target")).await.unwrap();
        let id = memory.list(1).await.unwrap()[0].id.clone().unwrap();

        let chain = FallbackChain::new(vec![
            Box::new(DeadStore(StoreKind::Airtable)),
            Box::new(memory),
        ]);

        assert!(chain.delete(StoreKind::Memory, &id).await.unwrap());

        let result = chain.delete(StoreKind::Sqlite, &id).await;
        assert!(matches!(
            result,
            Err(Error::Store(StoreError::UnknownStore(_)))
        ));
    }
}
