//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration. `Opt` is the clap-facing surface; `Config` is the
//! library-level configuration it converts into.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;

use crate::config::constants::{
    DB_PATH, DEFAULT_CONSOLE_OUTPUT, DEFAULT_MAX_COLLECTIONS, DEFAULT_SAMPLE_SIZE,
    DEFAULT_SEARCH_OUTPUT, DEFAULT_THREADS,
};
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Server family a target list belongs to.
///
/// Both families expose the same index data; they differ in how it is
/// reached. The search engine answers its REST API directly, while the
/// dashboard console only forwards requests through its proxy endpoint and
/// that endpoint changed shape across releases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFamily {
    /// Search engine REST API (default port 9200)
    Elasticsearch,
    /// Dashboard console proxying to a search engine (default port 5601)
    Kibana,
}

impl TargetFamily {
    /// Name used for logs and the document-store table.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetFamily::Elasticsearch => "elasticsearch",
            TargetFamily::Kibana => "kibana",
        }
    }

    /// Default output file for this family.
    pub fn default_output(&self) -> &'static str {
        match self {
            TargetFamily::Elasticsearch => DEFAULT_SEARCH_OUTPUT,
            TargetFamily::Kibana => DEFAULT_CONSOLE_OUTPUT,
        }
    }
}

/// Where finished scan results go.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Append to a file, then rewrite it as one JSON array when the run ends
    Json,
    /// Append to a file as comma-terminated JSON objects, one per line
    Plain,
    /// Insert each result as a document into the SQLite store
    #[value(alias = "mongo")]
    Store,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use index_harvest::{Config, TargetFamily};
/// use std::path::PathBuf;
///
/// let config = Config {
///     file: PathBuf::from("targets.txt"),
///     family: TargetFamily::Kibana,
///     threads: 40,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// File to read targets from (one per line)
    pub file: PathBuf,

    /// Server family every target in the file belongs to
    pub family: TargetFamily,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Output mode
    pub output_mode: OutputMode,

    /// Output file (json and plain modes)
    pub output_file: PathBuf,

    /// SQLite database path (store mode)
    pub db_path: PathBuf,

    /// Number of targets scanned concurrently
    pub threads: usize,

    /// Maximum number of collections sampled per target
    pub max_collections: usize,

    /// Number of documents requested per collection sample
    pub sample_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from("targets.txt"),
            family: TargetFamily::Elasticsearch,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            output_mode: OutputMode::Json,
            output_file: PathBuf::from(DEFAULT_SEARCH_OUTPUT),
            db_path: PathBuf::from(DB_PATH),
            threads: DEFAULT_THREADS,
            max_collections: DEFAULT_MAX_COLLECTIONS,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl Config {
    /// Rejects values that would make the run meaningless.
    ///
    /// Called by `run_scan` before any file is opened or request is sent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.file.as_os_str().is_empty() {
            return Err(ConfigError::MissingValue("input file"));
        }
        for (name, value) in [
            ("threads", self.threads),
            ("max-collections", self.max_collections),
            ("sample-size", self.sample_size),
        ] {
            if value < 1 {
                return Err(ConfigError::NotPositive(name));
            }
        }
        if self.output_mode != OutputMode::Store && self.output_file.as_os_str().is_empty() {
            return Err(ConfigError::MissingValue("output file"));
        }
        Ok(())
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Scan search-engine targets with 40 concurrent targets
/// index_harvest elasticsearch -f targets.txt -t 40
///
/// # Scan consoles and store results in SQLite
/// index_harvest kibana -f consoles.txt --output-mode store
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "index_harvest",
    about = "Fingerprints exposed search-engine and console instances and harvests artifacts from their indices."
)]
pub struct Opt {
    /// Server family of the targets: elasticsearch|kibana
    #[arg(value_enum)]
    pub family: TargetFamily,

    /// File with one target (host[:port], optional scheme) per line
    #[arg(short = 'f', long = "file", value_parser)]
    pub file: PathBuf,

    /// Number of targets scanned concurrently
    #[arg(short = 't', long, default_value_t = DEFAULT_THREADS)]
    pub threads: usize,

    /// Output mode: json|plain|store
    #[arg(long = "output-mode", visible_alias = "om", value_enum, default_value_t = OutputMode::Json)]
    pub output_mode: OutputMode,

    /// Output file. Defaults to elasticsearch.json or kibana.json; ignored in store mode
    #[arg(long = "output-file", visible_alias = "of", value_parser)]
    pub output_file: Option<PathBuf>,

    /// SQLite database used by the store output mode
    #[arg(long, value_parser, default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Maximum number of collections (indices) sampled per target.
    ///
    /// Collections are taken in the order the server lists them.
    #[arg(long = "max-collections", visible_alias = "max-i", default_value_t = DEFAULT_MAX_COLLECTIONS)]
    pub max_collections: usize,

    /// Number of documents requested from each sampled collection
    #[arg(long = "sample-size", visible_alias = "max-is", default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub sample_size: usize,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        if opt.output_mode == OutputMode::Store && opt.output_file.is_some() {
            log::warn!("--output-file is ignored because --output-mode is store");
        }
        let output_file = opt
            .output_file
            .unwrap_or_else(|| PathBuf::from(opt.family.default_output()));
        Config {
            file: opt.file,
            family: opt.family,
            log_level: opt.log_level,
            log_format: opt.log_format,
            output_mode: opt.output_mode,
            output_file,
            db_path: opt.db_path,
            threads: opt.threads,
            max_collections: opt.max_collections,
            sample_size: opt.sample_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default_is_valid() {
        let config = Config::default();
        assert_eq!(config.threads, 8);
        assert_eq!(config.max_collections, 5);
        assert_eq!(config.sample_size, 70);
        assert_eq!(config.output_mode, OutputMode::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_zero_threads() {
        let config = Config {
            threads: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive("threads"))
        ));
    }

    #[test]
    fn test_config_rejects_zero_sample_size() {
        let config = Config {
            sample_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive("sample-size"))
        ));
    }

    #[test]
    fn test_store_mode_does_not_need_output_file() {
        let config = Config {
            output_mode: OutputMode::Store,
            output_file: PathBuf::new(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_opt_defaults_output_file_per_family() {
        let opt = Opt::parse_from(["index_harvest", "kibana", "-f", "targets.txt"]);
        let config = Config::from(opt);
        assert_eq!(config.family, TargetFamily::Kibana);
        assert_eq!(config.output_file, PathBuf::from("kibana.json"));
        assert_eq!(config.threads, 8);
    }

    #[test]
    fn test_opt_accepts_mongo_alias_for_store() {
        let opt = Opt::parse_from([
            "index_harvest",
            "elasticsearch",
            "-f",
            "targets.txt",
            "--output-mode",
            "mongo",
        ]);
        assert_eq!(opt.output_mode, OutputMode::Store);
    }

    #[test]
    fn test_opt_rejects_unknown_output_mode() {
        let result = Opt::try_parse_from([
            "index_harvest",
            "elasticsearch",
            "-f",
            "targets.txt",
            "--output-mode",
            "csv",
        ]);
        assert!(result.is_err());
    }
}
