//! Application service: the single dependency of the HTTP layer.

use crate::domain::{EntryId, FeedbackEntry, NewFeedback, StoreKind, MAX_ENTRIES};
use crate::error::Result;
use crate::store::FallbackChain;

/// One page of feedback, tagged with the store that served it.
#[derive(Debug)]
pub struct FeedbackPage {
    pub source: StoreKind,
    pub items: Vec<FeedbackEntry>,
}

/// Submit / fetch / delete over the fallback chain.
pub struct FeedbackService {
    chain: FallbackChain,
}

impl FeedbackService {
    pub fn new(chain: FallbackChain) -> Self {
        Self { chain }
    }

    /// Backend kinds in priority order, for status reporting.
    pub fn stores(&self) -> Vec<StoreKind> {
        self.chain.kinds()
    }

    /// Validate, stamp, and persist one submission. Returns the store that
    /// accepted the write. Validation failures never touch a store.
    pub async fn submit(&self, text: &str) -> Result<StoreKind> {
        let entry = NewFeedback::new(text)?.into_entry();
        self.chain.append(&entry).await
    }

    /// Up to [`MAX_ENTRIES`] entries, newest first, from the
    /// highest-priority store that has data.
    pub async fn fetch(&self) -> Result<FeedbackPage> {
        let (source, mut items) = self.chain.list(MAX_ENTRIES).await?;

        // Backends order their own results, but re-sort here so a store
        // with weaker ordering guarantees cannot leak out of order.
        items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        items.truncate(MAX_ENTRIES);

        Ok(FeedbackPage { source, items })
    }

    /// Delete one entry from the named store. A missing id is a clean
    /// `false`, not an error.
    pub async fn delete(&self, kind: StoreKind, id: &EntryId) -> Result<bool> {
        self.chain.delete(kind, id).await
    }
}
