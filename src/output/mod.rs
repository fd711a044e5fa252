//! Output sinks.
//!
//! One sink is selected per run from the output mode:
//! - `json`: appended record stream, finalized into a JSON array at the end
//! - `plain`: the same stream, never finalized
//! - `store`: one document per record in SQLite

mod json_file;
mod store;

use anyhow::Result;
use log::warn;

use crate::config::{Config, OutputMode};
use crate::error_handling::{ErrorType, ProcessingStats};
use crate::models::ScanResult;

pub use json_file::JsonFile;
pub use store::DocumentStore;

/// Where finished records go.
#[derive(Debug)]
pub enum Sink {
    Json(JsonFile),
    Plain(JsonFile),
    Store(DocumentStore),
}

impl Sink {
    /// Opens the sink the configuration asks for.
    pub async fn open(config: &Config) -> Result<Sink> {
        Ok(match config.output_mode {
            OutputMode::Json => Sink::Json(JsonFile::open(&config.output_file, true).await?),
            OutputMode::Plain => Sink::Plain(JsonFile::open(&config.output_file, false).await?),
            OutputMode::Store => {
                Sink::Store(DocumentStore::open(&config.db_path, config.family).await?)
            }
        })
    }

    /// Hands one finished record to the sink. Failures are logged and counted.
    pub async fn write(&self, record: &ScanResult, stats: &ProcessingStats) {
        match self {
            Sink::Json(file) | Sink::Plain(file) => {
                let result = match serde_json::to_string(record) {
                    Ok(serialized) => file.append(&serialized).await,
                    Err(e) => Err(e.into()),
                };
                if let Err(e) = result {
                    warn!("Failed to write {}: {:#}", record.root_url, e);
                    stats.increment_error(ErrorType::OutputWriteError);
                }
            }
            Sink::Store(store) => store.insert(record, stats).await,
        }
    }

    /// Finishes the output. Only the `json` mode has work to do besides
    /// closing the store.
    pub async fn finalize(&self) -> Result<()> {
        match self {
            Sink::Json(file) => file.finalize().await,
            Sink::Plain(_) => Ok(()),
            Sink::Store(store) => {
                store.close().await;
                Ok(())
            }
        }
    }

    /// Human-readable destination for logs and the run report.
    pub fn describe(&self) -> String {
        match self {
            Sink::Json(file) | Sink::Plain(file) => file.path().display().to_string(),
            Sink::Store(_) => "document store".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetFamily;

    fn config_in(dir: &std::path::Path, mode: OutputMode) -> Config {
        Config {
            family: TargetFamily::Elasticsearch,
            output_mode: mode,
            output_file: dir.join("out.json"),
            db_path: dir.join("out.db"),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_plain_mode_never_finalizes() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), OutputMode::Plain);
        let sink = Sink::open(&config).await.unwrap();
        let stats = ProcessingStats::new();

        sink.write(&ScanResult::new("http://1.2.3.4:9200"), &stats).await;
        sink.finalize().await.unwrap();

        let raw = std::fs::read_to_string(&config.output_file).unwrap();
        assert!(raw.starts_with('{'));
        assert!(raw.ends_with(",\n"));
        assert_eq!(stats.total_errors(), 0);
    }

    #[tokio::test]
    async fn test_plain_mode_leaves_finalized_file_valid() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), OutputMode::Plain);
        let previous = r#"[{"rootUrl":"http://9.9.9.9:9200"}]"#;
        std::fs::write(&config.output_file, previous).unwrap();

        let sink = Sink::open(&config).await.unwrap();
        sink.finalize().await.unwrap();

        assert_eq!(std::fs::read_to_string(&config.output_file).unwrap(), previous);
        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&config.output_file).unwrap()).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_json_mode_writes_array() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), OutputMode::Json);
        let sink = Sink::open(&config).await.unwrap();
        let stats = ProcessingStats::new();

        sink.write(&ScanResult::new("http://1.2.3.4:9200"), &stats).await;
        sink.write(&ScanResult::new("http://5.6.7.8:9200"), &stats).await;
        sink.finalize().await.unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&config.output_file).unwrap()).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[0]["isInitialized"], false);
    }

    #[tokio::test]
    async fn test_store_mode_counts_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), OutputMode::Store);
        let sink = Sink::open(&config).await.unwrap();
        let stats = ProcessingStats::new();

        let record = ScanResult::new("http://1.2.3.4:9200");
        sink.write(&record, &stats).await;
        sink.write(&record, &stats).await;
        sink.finalize().await.unwrap();

        assert_eq!(
            stats.get_info_count(crate::error_handling::InfoType::DuplicateRecord),
            1
        );
        assert_eq!(stats.get_error_count(ErrorType::StoreInsertError), 0);
        assert!(!config.output_file.exists());
    }
}
