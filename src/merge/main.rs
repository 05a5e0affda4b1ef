//! POI merge.
//!
//! Overwrites `properties.POI` in a feature collection with the lines of a
//! scraped POI file, pairing records by position from an anchor feature.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use poi_enrich::align::{align, find_anchor, preview, MismatchPolicy};
use poi_enrich::dataset::GeoDataset;
use poi_enrich::poi_file::load_association;
use poi_enrich::report::MergeReport;

#[derive(Parser, Debug)]
#[command(name = "merge")]
#[command(about = "Merge scraped POIs into a feature collection by position")]
struct Args {
    /// Scraped POI file (City: "a | b" lines)
    pois: PathBuf,

    /// Feature collection to update
    dataset: PathBuf,

    /// Name of the feature the first POI line belongs to
    #[arg(short, long)]
    anchor: String,

    /// Write the updated dataset here instead of in place
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fail without writing if any paired keys differ
    #[arg(long)]
    abort_on_mismatch: bool,

    /// Write a JSON report of the merge
    #[arg(long)]
    report: Option<PathBuf>,

    /// Number of pairings to show before merging
    #[arg(long, default_value = "10")]
    preview: usize,

    /// Align and report without saving the dataset
    #[arg(long)]
    dry_run: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let source = load_association(&args.pois)?;
    info!("Loaded {} cities from {}", source.len(), args.pois.display());

    let mut dataset = GeoDataset::load(&args.dataset)
        .with_context(|| format!("Failed to load dataset: {}", args.dataset.display()))?;

    let anchor_position = find_anchor(dataset.features(), &args.anchor)?;
    info!("Found {} at position {}", args.anchor, anchor_position);
    info!(
        "Records from {} onward: {}, POI lines available: {}",
        args.anchor,
        dataset.features().len() - anchor_position,
        source.len()
    );

    let pairs = preview(dataset.features(), &source, &args.anchor, args.preview)?;
    for (i, pair) in pairs.iter().enumerate() {
        info!(
            "  {}: {} vs {} {}",
            i,
            pair.target_key,
            pair.source_key,
            if pair.matches { "✓" } else { "✗" }
        );
    }

    let policy = if args.abort_on_mismatch {
        MismatchPolicy::Abort
    } else {
        MismatchPolicy::Proceed
    };

    let outcome = align(dataset.features_mut(), &source, &args.anchor, policy);

    // A refused merge still reports every mismatch it found
    let result = match &outcome {
        Ok(report) => Some(report),
        Err(e) => e.report(),
    };
    if let (Some(path), Some(result)) = (&args.report, result) {
        let pois = args.pois.display().to_string();
        let dataset_name = args.dataset.display().to_string();
        MergeReport::new(&pois, &dataset_name, policy, result).write(path)?;
        info!("Wrote merge report to {}", path.display());
    }

    let report = outcome.map_err(|e| {
        error!("Merge aborted: {}", e);
        e
    })?;

    info!("Updated {} cities", report.updated);
    if report.mismatch_count() > 0 {
        warn!(
            "{} updated records had a different name than their POI line",
            report.mismatch_count()
        );
    }

    if args.dry_run {
        info!("Dry run; dataset not written");
        return Ok(());
    }

    let output = args.output.as_ref().unwrap_or(&args.dataset);
    dataset
        .save(output)
        .with_context(|| format!("Failed to save dataset: {}", output.display()))?;

    Ok(())
}
