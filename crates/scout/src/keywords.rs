// ABOUTME: Keyword list loading from a plain text file, one keyword per line.
// ABOUTME: Lines are trimmed and blank lines skipped; order is preserved.

use std::fs;
use std::path::Path;

use crate::error::{Result, ScoutError};

/// Splits keyword list text into keywords.
pub fn parse_keywords(text: &str) -> Vec<String> {
    text.trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads a keyword list file.
pub fn load_keywords(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|e| {
        ScoutError::input(path.display().to_string(), "read keywords", Some(anyhow::Error::new(e)))
    })?;
    Ok(parse_keywords(&text))
}
