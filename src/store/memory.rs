//! In-memory store for tests and ephemeral deployments.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::FeedbackStore;
use crate::domain::{EntryId, FeedbackEntry, StoreKind};
use crate::error::Result;

/// Volatile store backed by a `RwLock<Vec<_>>`; contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<Vec<FeedbackEntry>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedbackStore for MemoryStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Memory
    }

    async fn append(&self, entry: &FeedbackEntry) -> Result<()> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let stored = entry.clone().with_id(EntryId::new(id.to_string()));
        self.entries.write().push(stored);
        Ok(())
    }

    async fn list(&self, limit: usize) -> Result<Vec<FeedbackEntry>> {
        let mut entries = self.entries.read().clone();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(limit);
        Ok(entries)
    }

    async fn delete(&self, id: &EntryId) -> Result<bool> {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|e| e.id.as_ref() != Some(id));
        Ok(entries.len() < before)
    }
}
