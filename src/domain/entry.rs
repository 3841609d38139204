use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Hard cap on the number of entries any listing may return.
pub const MAX_ENTRIES: usize = 200;

/// Backend-specific record identifier.
///
/// Airtable record id, SQLite rowid rendered as a string. CSV rows carry
/// no identifier at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i32> for EntryId {
    fn from(id: i32) -> Self {
        Self(id.to_string())
    }
}

/// Tag identifying which backend holds an entry.
///
/// Serialized lowercase: this is the `source` field of fetch responses and
/// the `store` selector of delete requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Airtable,
    Sqlite,
    Csv,
    Memory,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Airtable => "airtable",
            StoreKind::Sqlite => "sqlite",
            StoreKind::Csv => "csv",
            StoreKind::Memory => "memory",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "airtable" => Ok(StoreKind::Airtable),
            "sqlite" => Ok(StoreKind::Sqlite),
            "csv" => Ok(StoreKind::Csv),
            "memory" => Ok(StoreKind::Memory),
            other => Err(format!("unknown store kind: {other}")),
        }
    }
}

/// One submitted feedback record.
///
/// Entries are immutable once written; deletion is the only mutation any
/// backend supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackEntry {
    /// Writer-assigned creation time, never client-supplied.
    pub timestamp: DateTime<Utc>,
    pub text: String,
    pub id: Option<EntryId>,
}

impl FeedbackEntry {
    pub fn new(timestamp: DateTime<Utc>, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            text: text.into(),
            id: None,
        }
    }

    pub fn with_id(mut self, id: EntryId) -> Self {
        self.id = Some(id);
        self
    }
}

/// A validated, timestamped submission ready to be appended.
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

impl NewFeedback {
    /// Validate raw form input. Whitespace-only text is rejected before any
    /// store is touched; the timestamp is stamped here, at submission time.
    pub fn new(text: &str) -> Result<Self, DomainError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyFeedback);
        }
        Ok(Self {
            timestamp: Utc::now(),
            text: trimmed.to_string(),
        })
    }

    pub fn into_entry(self) -> FeedbackEntry {
        FeedbackEntry::new(self.timestamp, self.text)
    }
}
