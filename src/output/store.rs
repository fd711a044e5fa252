//! Document-store sink.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, warn};
use sqlx::SqlitePool;

use crate::config::TargetFamily;
use crate::error_handling::{ErrorType, InfoType, ProcessingStats};
use crate::models::ScanResult;
use crate::storage::{init_db_pool_with_path, insert_document, run_migrations, InsertOutcome};

/// Inserts records into the family's results table.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    pool: Arc<SqlitePool>,
    family: TargetFamily,
}

impl DocumentStore {
    pub async fn open(db_path: &Path, family: TargetFamily) -> Result<Self> {
        let pool = init_db_pool_with_path(db_path)
            .await
            .with_context(|| format!("Failed to open database {}", db_path.display()))?;
        run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(DocumentStore { pool, family })
    }

    /// Stores one record. Failures are logged and counted, never returned.
    pub async fn insert(&self, record: &ScanResult, stats: &ProcessingStats) {
        match insert_document(&self.pool, self.family, record).await {
            Ok(InsertOutcome::Inserted) => {}
            Ok(InsertOutcome::Duplicate) => {
                debug!("{} is already stored", record.root_url);
                stats.increment_info(InfoType::DuplicateRecord);
            }
            Err(e) => {
                warn!("Failed to store {}: {}", record.root_url, e);
                stats.increment_error(ErrorType::StoreInsertError);
            }
        }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
