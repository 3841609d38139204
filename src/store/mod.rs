//! Persistence layer with pluggable storage backends.
//!
//! Every backend exposes the same append/list/delete surface through
//! [`FeedbackStore`]; [`FallbackChain`] tries them in configured priority
//! order so a dead remote store degrades to the next one instead of
//! failing the request.

pub mod airtable;
pub mod csv;
pub mod fallback;
pub mod memory;
pub mod sqlite;

pub use airtable::AirtableStore;
pub use csv::CsvStore;
pub use fallback::FallbackChain;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;

use crate::domain::{EntryId, FeedbackEntry, StoreKind};
use crate::error::Result;

/// Storage operations for feedback entries.
///
/// Object-safe so the fallback chain can hold heterogeneous backends.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Which backend this store writes to.
    fn kind(&self) -> StoreKind;

    /// Append one entry.
    async fn append(&self, entry: &FeedbackEntry) -> Result<()>;

    /// List up to `limit` entries, newest first.
    async fn list(&self, limit: usize) -> Result<Vec<FeedbackEntry>>;

    /// Delete an entry by id. Returns true if the entry existed.
    async fn delete(&self, id: &EntryId) -> Result<bool>;
}
