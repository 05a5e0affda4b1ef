//! JSON summary of a merge run.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::align::{AlignReport, MismatchPolicy};

#[derive(Debug, Serialize)]
pub struct MergeReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub pois: &'a str,
    pub dataset: &'a str,
    pub policy: &'static str,
    #[serde(flatten)]
    pub result: &'a AlignReport,
}

impl<'a> MergeReport<'a> {
    pub fn new(
        pois: &'a str,
        dataset: &'a str,
        policy: MismatchPolicy,
        result: &'a AlignReport,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            pois,
            dataset,
            policy: match policy {
                MismatchPolicy::Proceed => "proceed",
                MismatchPolicy::Abort => "abort",
            },
            result,
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create report: {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}
