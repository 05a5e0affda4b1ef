//! Progress snapshots for long scrape runs.
//!
//! A checkpoint is a complete POI file named `<prefix>_<n>.txt`, where `n`
//! is the number of input lines consumed. Writes are full rewrites and are
//! not atomic.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::CheckpointConfig;
use crate::models::CityPoiRecord;
use crate::poi_file;

pub struct Checkpointer {
    dir: PathBuf,
    prefix: String,
    every: usize,
}

/// State recovered from a checkpoint file.
#[derive(Debug)]
pub struct Resume {
    /// Input lines already consumed
    pub processed: usize,
    pub records: Vec<CityPoiRecord>,
}

impl Checkpointer {
    pub fn new(dir: impl Into<PathBuf>, config: &CheckpointConfig) -> Self {
        Self {
            dir: dir.into(),
            prefix: config.prefix.clone(),
            every: config.every,
        }
    }

    pub fn path_for(&self, processed: usize) -> PathBuf {
        self.dir.join(format!("{}_{}.txt", self.prefix, processed))
    }

    /// Write a checkpoint when `processed` lands on the interval.
    pub fn maybe_write(
        &self,
        processed: usize,
        records: &[CityPoiRecord],
    ) -> Result<Option<PathBuf>> {
        if self.every == 0 || processed == 0 || processed % self.every != 0 {
            return Ok(None);
        }
        let path = self.path_for(processed);
        poi_file::write_records(&path, records)?;
        info!("Progress saved at {} locations", processed);
        Ok(Some(path))
    }
}

/// Load a checkpoint; the processed count comes from the `_<n>` file name suffix.
pub fn resume<P: AsRef<Path>>(path: P) -> Result<Resume> {
    let path = path.as_ref();
    let processed = processed_from_name(path).with_context(|| {
        format!(
            "Checkpoint name must end in _<count>.txt: {}",
            path.display()
        )
    })?;
    let records = poi_file::read_records(path)?;
    info!(
        "Resuming after {} locations with {} saved results",
        processed,
        records.len()
    );
    Ok(Resume { processed, records })
}

fn processed_from_name(path: &Path) -> Option<usize> {
    let stem = path.file_stem()?.to_str()?;
    let (_, count) = stem.rsplit_once('_')?;
    count.parse().ok()
}
