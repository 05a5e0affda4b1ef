//! Intermediate POI file: one `City: "a | b | c"` line per city.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::models::{CityPoiRecord, PoiAssociation};

/// Rewrite `path` with one line per record.
pub fn write_records<P: AsRef<Path>>(path: P, records: &[CityPoiRecord]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create POI file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for record in records {
        writeln!(writer, "{}", record.to_line())?;
    }
    writer.flush()?;
    info!("Saved {} results to {}", records.len(), path.display());
    Ok(())
}

/// Read records back, skipping malformed lines.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<CityPoiRecord>> {
    let text = read(path.as_ref())?;
    Ok(text.lines().filter_map(CityPoiRecord::parse_line).collect())
}

/// Read the file as an ordered city → POI string association.
pub fn load_association<P: AsRef<Path>>(path: P) -> Result<PoiAssociation> {
    let text = read(path.as_ref())?;
    Ok(PoiAssociation::parse(&text))
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read POI file: {}", path.display()))
}
