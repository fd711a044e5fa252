//! Append-only JSON record file.
//!
//! Records are appended as `<json>,\n` while the scan runs. Finalizing turns
//! the stream into one JSON array by stripping the last separator and
//! wrapping everything in brackets.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

const RECORD_SEPARATOR: &str = ",\n";

/// A record file shared by every target task.
#[derive(Debug)]
pub struct JsonFile {
    path: PathBuf,
    /// Set once the file holds a finished array; guards appends too
    finalized: Mutex<bool>,
}

impl JsonFile {
    /// Opens `path` for appending.
    ///
    /// With `reopen`, a file left finalized by an earlier run is turned back
    /// into an appendable stream so new records land inside the same array.
    /// Only a sink that finalizes again may reopen.
    pub async fn open(path: &Path, reopen: bool) -> Result<Self> {
        if reopen {
            if let Ok(existing) = tokio::fs::read_to_string(path).await {
                if let Some(stream) = reopened_text(&existing) {
                    debug!("Reopening finalized output {}", path.display());
                    tokio::fs::write(path, stream)
                        .await
                        .with_context(|| format!("Failed to reopen {}", path.display()))?;
                }
            }
        }
        tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .with_context(|| format!("Failed to open output file {}", path.display()))?;
        Ok(JsonFile {
            path: path.to_path_buf(),
            finalized: Mutex::new(false),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one serialized record. Writes never interleave.
    pub async fn append(&self, serialized: &str) -> Result<()> {
        let finalized = self.finalized.lock().await;
        if *finalized {
            warn!(
                "Dropping a record completed after {} was finalized",
                self.path.display()
            );
            return Ok(());
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        let mut line = String::with_capacity(serialized.len() + RECORD_SEPARATOR.len());
        line.push_str(serialized);
        line.push_str(RECORD_SEPARATOR);
        file.write_all(line.as_bytes())
            .await
            .with_context(|| format!("Failed to append to {}", self.path.display()))?;
        file.flush().await?;
        Ok(())
    }

    /// Rewrites the stream as a JSON array. Safe to call more than once.
    pub async fn finalize(&self) -> Result<()> {
        let mut finalized = self.finalized.lock().await;
        if *finalized {
            return Ok(());
        }

        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        if let Some(array) = finalized_text(&content) {
            let tmp = tmp_path(&self.path);
            tokio::fs::write(&tmp, array)
                .await
                .with_context(|| format!("Failed to write {}", tmp.display()))?;
            match tokio::fs::remove_file(&self.path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to remove {}", self.path.display()))
                }
            }
            tokio::fs::rename(&tmp, &self.path)
                .await
                .with_context(|| format!("Failed to move {} into place", tmp.display()))?;
        }

        *finalized = true;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

fn is_array_text(content: &str) -> bool {
    let trimmed = content.trim();
    trimmed.starts_with('[') && trimmed.ends_with(']')
}

/// The array form of a record stream, or `None` when it already is one.
fn finalized_text(content: &str) -> Option<String> {
    if is_array_text(content) {
        return None;
    }
    let body = content.trim_end();
    let body = body.strip_suffix(',').unwrap_or(body);
    Some(format!("[{}]", body))
}

/// The stream form of a finalized array, or `None` when it is not one.
fn reopened_text(content: &str) -> Option<String> {
    if !is_array_text(content) {
        return None;
    }
    let trimmed = content.trim();
    let inner = trimmed[1..trimmed.len() - 1].trim();
    if inner.is_empty() {
        Some(String::new())
    } else {
        Some(format!("{}{}", inner, RECORD_SEPARATOR))
    }
}
