//! Flat-file store: one CSV row per entry, the always-available last
//! resort of the fallback chain.

use std::fs::OpenOptions;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, WriterBuilder};
use tracing::debug;

use super::FeedbackStore;
use crate::domain::{EntryId, FeedbackEntry, StoreKind};
use crate::error::{Result, StoreError};

/// Local CSV file store.
///
/// Rows are `timestamp,body` with standard CSV quoting, so commas, quotes,
/// and embedded newlines round-trip losslessly. Rows carry no record
/// identifier, which is why deletion is unsupported here.
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl FeedbackStore for CsvStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Csv
    }

    async fn append(&self, entry: &FeedbackEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer.write_record([entry.timestamp.to_rfc3339().as_str(), entry.text.as_str()])?;
        writer.flush()?;
        Ok(())
    }

    async fn list(&self, limit: usize) -> Result<Vec<FeedbackEntry>> {
        // A store that has never been written to is simply empty.
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;

        let mut entries = Vec::new();
        for record in reader.records() {
            let record = record?;
            let (Some(raw_ts), Some(body)) = (record.get(0), record.get(1)) else {
                debug!(row = ?record.position(), "skipping malformed csv row");
                continue;
            };
            let Ok(timestamp) = DateTime::parse_from_rfc3339(raw_ts) else {
                debug!(raw = raw_ts, "skipping csv row with unparseable timestamp");
                continue;
            };
            entries.push(FeedbackEntry::new(
                timestamp.with_timezone(&Utc),
                body.to_string(),
            ));
        }

        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(limit);
        Ok(entries)
    }

    async fn delete(&self, _id: &EntryId) -> Result<bool> {
        Err(StoreError::DeleteUnsupported {
            store: StoreKind::Csv,
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use chrono::Duration;
    use tempfile::tempdir;

    fn entry(text: &str, minutes_ago: i64) -> FeedbackEntry {
        FeedbackEntry::new(Utc::now() - Duration::minutes(minutes_ago), text)
    }

    #[tokio::test]
    async fn round_trips_awkward_text() {
        let dir = tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("feedback.csv"));

        let awkward = "line one,\n\"quoted\", and, commas\nline three";
        store.append(&entry(awkward, 0)).await.unwrap();

        let listed = store.list(10).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].text, awkward);
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("nope.csv"));
        assert!(store.list(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn creates_parent_directory_on_first_write() {
        let dir = tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("data").join("feedback.csv"));
        store.append(&entry("hello", 0)).await.unwrap();
        assert_eq!(store.list(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_is_newest_first_and_capped() {
        let dir = tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("feedback.csv"));
        store.append(&entry("old", 20)).await.unwrap();
        store.append(&entry("new", 0)).await.unwrap();
        store.append(&entry("mid", 10)).await.unwrap();

        let listed = store.list(2).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].text, "new");
        assert_eq!(listed[1].text, "mid");
    }

    #[tokio::test]
    async fn delete_is_unsupported() {
        let dir = tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("feedback.csv"));
        let result = store.delete(&EntryId::new("0")).await;
        assert!(matches!(
            result,
            Err(Error::Store(StoreError::DeleteUnsupported {
                store: StoreKind::Csv
            }))
        ));
    }
}
