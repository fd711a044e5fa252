//! Record insertion.

use std::time::Duration;

use sqlx::SqlitePool;

use crate::config::{TargetFamily, STORE_INSERT_TIMEOUT_SECS};
use crate::error_handling::DatabaseError;
use crate::models::ScanResult;

/// What happened to an inserted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A record with the same root URL is already stored
    Duplicate,
}

fn table_for(family: TargetFamily) -> String {
    format!("{}_results", family.as_str())
}

/// Stores a record as `{"scanResult": <record>}`.
///
/// Transient lock errors are retried up to 3 times with exponential backoff.
/// A unique-key conflict on the root URL is not an error.
///
/// # Errors
///
/// Returns `DatabaseError::Timeout` when one attempt exceeds
/// `STORE_INSERT_TIMEOUT_SECS`, or the underlying error otherwise.
pub async fn insert_document(
    pool: &SqlitePool,
    family: TargetFamily,
    record: &ScanResult,
) -> Result<InsertOutcome, DatabaseError> {
    const MAX_RETRIES: usize = 3;
    const INITIAL_DELAY_MS: u64 = 50;

    let document = serde_json::to_string(&serde_json::json!({ "scanResult": record }))?;

    let mut attempt = 0;
    loop {
        let result = tokio::time::timeout(
            Duration::from_secs(STORE_INSERT_TIMEOUT_SECS),
            insert_once(pool, family, record, &document),
        )
        .await
        .map_err(|_| DatabaseError::Timeout(STORE_INSERT_TIMEOUT_SECS))?;

        match result {
            Ok(()) => return Ok(InsertOutcome::Inserted),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Ok(InsertOutcome::Duplicate)
            }
            Err(e) if attempt < MAX_RETRIES && is_lock_contention(&e) => {
                let delay_ms = INITIAL_DELAY_MS * (1 << attempt);
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
            Err(e) => return Err(DatabaseError::SqlError(e)),
        }
    }
}

fn is_lock_contention(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_err) => {
            db_err.message().contains("database is locked")
                || db_err.message().contains("database is busy")
        }
        _ => false,
    }
}

async fn insert_once(
    pool: &SqlitePool,
    family: TargetFamily,
    record: &ScanResult,
    document: &str,
) -> Result<(), sqlx::Error> {
    let sql = format!(
        "INSERT INTO {} (root_url, document, created_at) VALUES (?, ?, ?)",
        table_for(family)
    );
    sqlx::query(&sql)
        .bind(&record.root_url)
        .bind(document)
        .bind(record.created_at.to_rfc3339())
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_helpers::create_test_pool;
    use sqlx::Row;

    #[tokio::test]
    async fn test_insert_wraps_record() {
        let (_dir, pool) = create_test_pool().await;
        let mut record = ScanResult::new("http://1.2.3.4:9200");
        record.is_initialized = true;

        let outcome = insert_document(&pool, TargetFamily::Elasticsearch, &record)
            .await
            .unwrap();
        assert_eq!(outcome, InsertOutcome::Inserted);

        let row = sqlx::query("SELECT document FROM elasticsearch_results WHERE root_url = ?")
            .bind("http://1.2.3.4:9200")
            .fetch_one(&pool)
            .await
            .unwrap();
        let document: serde_json::Value =
            serde_json::from_str(&row.get::<String, _>("document")).unwrap();
        assert_eq!(document["scanResult"]["rootUrl"], "http://1.2.3.4:9200");
        assert_eq!(document["scanResult"]["isInitialized"], true);
    }

    #[tokio::test]
    async fn test_duplicate_root_url_is_not_an_error() {
        let (_dir, pool) = create_test_pool().await;
        let record = ScanResult::new("http://5.6.7.8:5601");

        let first = insert_document(&pool, TargetFamily::Kibana, &record).await;
        let second = insert_document(&pool, TargetFamily::Kibana, &record).await;
        assert_eq!(first.unwrap(), InsertOutcome::Inserted);
        assert_eq!(second.unwrap(), InsertOutcome::Duplicate);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kibana_results")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_non_lock_errors_are_returned_as_is() {
        let (_dir, pool) = create_test_pool().await;
        sqlx::query("DROP TABLE elasticsearch_results")
            .execute(&pool)
            .await
            .unwrap();

        let err = insert_document(
            &pool,
            TargetFamily::Elasticsearch,
            &ScanResult::new("http://1.2.3.4:9200"),
        )
        .await
        .unwrap_err();
        match err {
            DatabaseError::SqlError(sqlx::Error::Database(db_err)) => {
                assert!(db_err.message().contains("no such table"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_only_database_errors_count_as_lock_contention() {
        assert!(!is_lock_contention(&sqlx::Error::PoolClosed));
        assert!(!is_lock_contention(&sqlx::Error::RowNotFound));
    }

    #[tokio::test]
    async fn test_families_use_separate_tables() {
        let (_dir, pool) = create_test_pool().await;
        let record = ScanResult::new("http://9.9.9.9:9200");
        insert_document(&pool, TargetFamily::Elasticsearch, &record)
            .await
            .unwrap();
        let outcome = insert_document(&pool, TargetFamily::Kibana, &record)
            .await
            .unwrap();
        assert_eq!(outcome, InsertOutcome::Inserted);
    }
}
