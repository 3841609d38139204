//! SQLite store implementation using Diesel.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::FeedbackStore;
use crate::db::model::{EntryRow, NewEntryRow};
use crate::db::schema::feedback_entries;
use crate::db::DbPool;
use crate::domain::{EntryId, FeedbackEntry, StoreKind};
use crate::error::{Error, Result};

/// SQLite-backed feedback store. The autoincrement primary key doubles as
/// the record identifier.
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    /// Create a new SQLite feedback store.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn to_row(entry: &FeedbackEntry) -> NewEntryRow {
        NewEntryRow {
            timestamp: entry.timestamp.to_rfc3339(),
            body: entry.text.clone(),
        }
    }

    fn from_row(row: EntryRow) -> Result<FeedbackEntry> {
        let timestamp: DateTime<Utc> = DateTime::parse_from_rfc3339(&row.timestamp)
            .map_err(|e| Error::Parse(e.to_string()))?
            .with_timezone(&Utc);

        Ok(FeedbackEntry::new(timestamp, row.body).with_id(EntryId::from(row.id)))
    }
}

#[async_trait]
impl FeedbackStore for SqliteStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Sqlite
    }

    async fn append(&self, entry: &FeedbackEntry) -> Result<()> {
        let row = Self::to_row(entry);
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        diesel::insert_into(feedback_entries::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }

    async fn list(&self, limit: usize) -> Result<Vec<FeedbackEntry>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        // The autoincrement id tracks insertion order, which the
        // writer-assigned timestamps follow.
        let rows: Vec<EntryRow> = feedback_entries::table
            .order(feedback_entries::id.desc())
            .limit(limit as i64)
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Self::from_row).collect()
    }

    async fn delete(&self, id: &EntryId) -> Result<bool> {
        // Non-numeric ids belong to some other backend.
        let Ok(row_id) = id.as_str().parse::<i32>() else {
            return Ok(false);
        };

        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let deleted = diesel::delete(feedback_entries::table.find(row_id))
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations};
    use chrono::Duration;

    fn setup_test_db() -> DbPool {
        let pool = create_pool(":memory:").expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        pool
    }

    fn entry(text: &str, minutes_ago: i64) -> FeedbackEntry {
        FeedbackEntry::new(Utc::now() - Duration::minutes(minutes_ago), text)
    }

    #[tokio::test]
    async fn sqlite_entry_roundtrip() {
        let pool = setup_test_db();
        let store = SqliteStore::new(pool);

        store.append(&entry("works with sqlite", 0)).await.unwrap();

        let listed = store.list(10).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].text, "works with sqlite");
        assert!(listed[0].id.is_some());
    }

    #[tokio::test]
    async fn sqlite_delete_by_rowid() {
        let pool = setup_test_db();
        let store = SqliteStore::new(pool);

        store.append(&entry("to delete", 0)).await.unwrap();
        let id = store.list(10).await.unwrap()[0].id.clone().unwrap();

        assert!(store.delete(&id).await.unwrap());
        assert!(!store.delete(&id).await.unwrap()); // Already deleted
        assert!(store.list(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sqlite_delete_with_foreign_id_is_not_found() {
        let pool = setup_test_db();
        let store = SqliteStore::new(pool);

        store.append(&entry("kept", 0)).await.unwrap();
        assert!(!store.delete(&EntryId::new("recXYZ")).await.unwrap());
        assert_eq!(store.list(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn sqlite_list_is_newest_first_and_capped() {
        let pool = setup_test_db();
        let store = SqliteStore::new(pool);

        store.append(&entry("old", 20)).await.unwrap();
        store.append(&entry("mid", 10)).await.unwrap();
        store.append(&entry("new", 0)).await.unwrap();

        let listed = store.list(2).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].text, "new");
        assert_eq!(listed[1].text, "mid");
    }
}
