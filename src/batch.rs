//! Sequential scrape over a city list.

use anyhow::Result;
use indicatif::ProgressBar;
use std::path::PathBuf;
use tracing::info;

use crate::aggregate::Aggregator;
use crate::checkpoint::Checkpointer;
use crate::cities::CityEntry;
use crate::models::CityPoiRecord;
use crate::pacing::Pacer;
use crate::search::PlaceSearch;

/// What a batch run produced.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Resumed records followed by this run's records
    pub records: Vec<CityPoiRecord>,
    /// Cities aggregated in this run (blank and malformed lines excluded)
    pub processed: usize,
    pub checkpoints: Vec<PathBuf>,
}

pub struct BatchRunner<'a, 'b, S: PlaceSearch + ?Sized> {
    aggregator: &'a Aggregator<'b, S>,
    pacer: &'a Pacer,
    checkpointer: &'a Checkpointer,
    progress: ProgressBar,
}

impl<'a, 'b, S: PlaceSearch + ?Sized> BatchRunner<'a, 'b, S> {
    pub fn new(
        aggregator: &'a Aggregator<'b, S>,
        pacer: &'a Pacer,
        checkpointer: &'a Checkpointer,
    ) -> Self {
        Self {
            aggregator,
            pacer,
            checkpointer,
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Process `locations` from line `start` onward, appending to `records`.
    ///
    /// Line numbers count every input line, but pauses and checkpoints only
    /// follow a real city.
    pub async fn run(
        &self,
        locations: &[Option<CityEntry>],
        start: usize,
        records: Vec<CityPoiRecord>,
    ) -> Result<BatchOutcome> {
        let mut outcome = BatchOutcome {
            records,
            ..BatchOutcome::default()
        };
        self.progress.set_position(start.min(locations.len()) as u64);

        for (i, entry) in locations.iter().enumerate().skip(start) {
            self.progress.inc(1);

            let Some(entry) = entry else {
                continue;
            };

            info!(
                "Processing {}/{}: {}, {}",
                i + 1,
                locations.len(),
                entry.city,
                entry.region
            );

            let aggregation = self.aggregator.aggregate(&entry.city, &entry.region).await;
            let found = aggregation.places.len();
            let summary = aggregation.tally.to_string();

            match aggregation.into_record(&entry.city) {
                Some(record) => {
                    info!("  Found {} unique places ({})", found, summary);
                    outcome.records.push(record);
                }
                None => info!("  No places found"),
            }
            outcome.processed += 1;

            self.pacer.pause().await;
            if let Some(path) = self.checkpointer.maybe_write(i + 1, &outcome.records)? {
                outcome.checkpoints.push(path);
            }
        }

        self.progress.finish_with_message("Processing complete");
        Ok(outcome)
    }
}
