//! End-to-end flows across real backends (in-memory SQLite + tempdir CSV).

use candor::db::{create_pool, run_migrations, DbPool};
use candor::domain::{EntryId, StoreKind};
use candor::error::{Error, StoreError};
use candor::service::FeedbackService;
use candor::store::{CsvStore, FallbackChain, FeedbackStore, SqliteStore};
use tempfile::TempDir;

fn sqlite_pool() -> DbPool {
    let pool = create_pool(":memory:").expect("pool");
    run_migrations(&pool).expect("migrations");
    pool
}

fn service_over(dir: &TempDir) -> FeedbackService {
    let chain = FallbackChain::new(vec![
        Box::new(SqliteStore::new(sqlite_pool())),
        Box::new(CsvStore::new(dir.path().join("feedback.csv"))),
    ]);
    FeedbackService::new(chain)
}

#[tokio::test]
async fn submit_lands_in_the_primary_store() {
    let dir = TempDir::new().unwrap();
    let service = service_over(&dir);

    let stored_to = service.submit("primary takes it").await.unwrap();
    assert_eq!(stored_to, StoreKind::Sqlite);

    let page = service.fetch().await.unwrap();
    assert_eq!(page.source, StoreKind::Sqlite);
    assert_eq!(page.items.len(), 1);

    // Nothing leaked into the fallback file.
    let csv = CsvStore::new(dir.path().join("feedback.csv"));
    assert!(csv.list(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn fetch_falls_back_when_the_primary_is_empty() {
    let dir = TempDir::new().unwrap();
    let service = service_over(&dir);

    // Seed the fallback file directly, as an earlier deployment would have.
    let csv = CsvStore::new(dir.path().join("feedback.csv"));
    csv.append(&candor::domain::FeedbackEntry::new(
        chrono::Utc::now(),
        "from an older csv deployment",
    ))
    .await
    .unwrap();

    let page = service.fetch().await.unwrap();
    assert_eq!(page.source, StoreKind::Csv);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].text, "from an older csv deployment");
}

#[tokio::test]
async fn delete_is_routed_and_csv_refuses() {
    let dir = TempDir::new().unwrap();
    let service = service_over(&dir);

    service.submit("short-lived").await.unwrap();
    let id = service.fetch().await.unwrap().items[0].id.clone().unwrap();

    assert!(service.delete(StoreKind::Sqlite, &id).await.unwrap());
    assert!(service.fetch().await.unwrap().items.is_empty());

    let result = service.delete(StoreKind::Csv, &EntryId::new("0")).await;
    assert!(matches!(
        result,
        Err(Error::Store(StoreError::DeleteUnsupported {
            store: StoreKind::Csv
        }))
    ));
}

#[tokio::test]
async fn csv_entries_survive_a_new_store_instance() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("feedback.csv");

    let first = CsvStore::new(&path);
    first
        .append(&candor::domain::FeedbackEntry::new(
            chrono::Utc::now(),
            "persisted, with \"quotes\"\nand a newline",
        ))
        .await
        .unwrap();
    drop(first);

    let second = CsvStore::new(&path);
    let listed = second.list(10).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].text, "persisted, with \"quotes\"\nand a newline");
}
