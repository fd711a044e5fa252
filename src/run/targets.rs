//! Target list parsing.

use std::path::Path;

use anyhow::{Context, Result};

/// Reads the target list: one target per line.
pub async fn read_targets(path: &Path) -> Result<Vec<String>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    Ok(parse_targets(&content))
}

/// Trims each line, skips blank lines and `#` comments, and strips one trailing `/`.
pub fn parse_targets(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.strip_suffix('/').unwrap_or(line).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_targets() {
        let content = "\
# exposed search engines
1.2.3.4:9200
  http://5.6.7.8:9200/  

https://es.example.com//
";
        assert_eq!(
            parse_targets(content),
            vec![
                "1.2.3.4:9200",
                "http://5.6.7.8:9200",
                "https://es.example.com/",
            ]
        );
    }

    #[tokio::test]
    async fn test_read_targets_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_targets(&dir.path().join("nope.txt")).await.unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read input file"));
    }
}
