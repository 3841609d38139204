//! Domain types shared by every storage backend and the HTTP layer.

mod entry;

pub use entry::{EntryId, FeedbackEntry, NewFeedback, StoreKind, MAX_ENTRIES};
