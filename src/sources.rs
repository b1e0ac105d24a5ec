//! Source-list file reader.

use std::path::Path;

use anyhow::{Context, Result};

/// Reads the newline-delimited list of feed source URLs.
///
/// Blank lines and comment lines starting with `#` are ignored and
/// surrounding whitespace is trimmed. The order of the remaining lines is
/// preserved; it determines fetch order and therefore which duplicate
/// entry wins deduplication. A missing or unreadable file is fatal.
pub async fn load(path: &Path) -> Result<Vec<String>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read source list: {}", path.display()))?;
    Ok(parse(&content))
}

fn parse(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
