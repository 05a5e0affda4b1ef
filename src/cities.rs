//! City list input: one `"<city>, <region>"` per line.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// One line of the city list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityEntry {
    /// Zero-based line number in the input
    pub line: usize,
    pub city: String,
    pub region: String,
}

/// Parse a city list. Blank lines and lines without a `", "` separator
/// come back as `None` so line positions are preserved for checkpointing.
pub fn parse_cities(text: &str) -> Vec<Option<CityEntry>> {
    text.lines()
        .enumerate()
        .map(|(line, raw)| {
            let (city, region) = raw.trim().split_once(", ")?;
            let (city, region) = (city.trim(), region.trim());
            if city.is_empty() {
                return None;
            }
            Some(CityEntry {
                line,
                city: city.to_string(),
                region: region.to_string(),
            })
        })
        .collect()
}

pub fn load_cities<P: AsRef<Path>>(path: P) -> Result<Vec<Option<CityEntry>>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read city list: {}", path.display()))?;
    Ok(parse_cities(&text))
}
