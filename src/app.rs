//! Wires configuration into a running service.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::db;
use crate::domain::StoreKind;
use crate::error::{ConfigError, Result};
use crate::http;
use crate::service::FeedbackService;
use crate::store::{AirtableStore, CsvStore, FallbackChain, FeedbackStore, MemoryStore, SqliteStore};

/// Build the fallback chain from the configured store order.
///
/// A store whose credentials are missing or whose setup fails is skipped
/// with a warning rather than aborting startup; missing configuration is
/// just another reason to fall back. Startup only fails when no store at
/// all can be built.
pub fn build_chain(config: &Config) -> Result<FallbackChain> {
    let mut stores: Vec<Box<dyn FeedbackStore>> = Vec::new();

    for kind in &config.storage.order {
        match kind {
            StoreKind::Airtable => match (&config.airtable.base_id, &config.airtable.api_token) {
                (Some(base_id), Some(token)) => {
                    stores.push(Box::new(AirtableStore::new(
                        base_id,
                        &config.airtable.table,
                        token.clone(),
                    )));
                }
                _ => warn!("airtable credentials not configured, skipping store"),
            },
            StoreKind::Sqlite => match build_sqlite(&config.storage.database_url) {
                Ok(store) => stores.push(Box::new(store)),
                Err(e) => warn!(error = %e, "sqlite store setup failed, skipping store"),
            },
            StoreKind::Csv => stores.push(Box::new(CsvStore::new(config.storage.csv_path.clone()))),
            StoreKind::Memory => stores.push(Box::new(MemoryStore::new())),
        }
    }

    if stores.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "storage.order",
            reason: "no usable store could be configured".to_string(),
        }
        .into());
    }

    Ok(FallbackChain::new(stores))
}

fn build_sqlite(database_url: &str) -> Result<SqliteStore> {
    if let Some(parent) = std::path::Path::new(database_url).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let pool = db::create_pool(database_url)?;
    db::run_migrations(&pool)?;
    Ok(SqliteStore::new(pool))
}

/// Build the feedback service from configuration.
pub fn build_service(config: &Config) -> Result<FeedbackService> {
    let chain = build_chain(config)?;
    info!(stores = ?chain.kinds(), "storage chain ready");
    Ok(FeedbackService::new(chain))
}

/// Build everything and serve until shutdown.
pub async fn run(config: Config) -> Result<()> {
    let service = Arc::new(build_service(&config)?);
    http::serve(&config.server.bind, service).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::tempdir;

    #[test]
    fn default_config_skips_unconfigured_airtable() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.storage.csv_path = dir.path().join("feedback.csv");
        config.storage.database_url = dir.path().join("feedback.db").display().to_string();

        let chain = build_chain(&config).unwrap();
        // Airtable has no credentials, so only sqlite and csv survive.
        assert_eq!(chain.kinds(), vec![StoreKind::Sqlite, StoreKind::Csv]);
    }

    #[test]
    fn memory_only_order_builds() {
        let mut config = Config::default();
        config.storage.order = vec![StoreKind::Memory];

        let chain = build_chain(&config).unwrap();
        assert_eq!(chain.kinds(), vec![StoreKind::Memory]);
    }

    #[test]
    fn airtable_only_without_credentials_fails() {
        let mut config = Config::default();
        config.storage.order = vec![StoreKind::Airtable];

        assert!(build_chain(&config).is_err());
    }
}
