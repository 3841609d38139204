//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::feedback_entries;

/// Database row for a feedback entry (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = feedback_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EntryRow {
    pub id: i32,
    pub timestamp: String,
    pub body: String,
}

/// Database row for a feedback entry (insertable; the id is assigned by
/// SQLite's autoincrement).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = feedback_entries)]
pub struct NewEntryRow {
    pub timestamp: String,
    pub body: String,
}
