//! City POI scraper.
//!
//! Queries the places API for every city in a list, keeps a small
//! deduplicated set of names per city, and writes them as
//! `City: "a | b | c"` lines, checkpointing along the way.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use poi_enrich::batch::BatchRunner;
use poi_enrich::checkpoint::{self, Checkpointer};
use poi_enrich::cities::load_cities;
use poi_enrich::config::Config;
use poi_enrich::pacing::Pacer;
use poi_enrich::poi_file::write_records;
use poi_enrich::search::FoursquareClient;
use poi_enrich::{Aggregator, CityPoiRecord};

#[derive(Parser, Debug)]
#[command(name = "scrape")]
#[command(about = "Collect points of interest for a list of cities")]
struct Args {
    /// Places API key
    api_key: String,

    /// City list, one "<city>, <region>" per line
    locations: PathBuf,

    /// Final output file
    #[arg(short, long, default_value = "foursquare_data_final.txt")]
    output: PathBuf,

    /// Directory for progress checkpoints
    #[arg(long, default_value = ".")]
    checkpoint_dir: PathBuf,

    /// Resume from a checkpoint file (named <prefix>_<count>.txt)
    #[arg(long)]
    resume: Option<PathBuf>,

    /// TOML config file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    let locations = load_cities(&args.locations)?;
    info!("Processing {} locations...", locations.len());

    let client = FoursquareClient::new(&args.api_key, &config.api)
        .context("Failed to set up places API client")?;
    let aggregator = Aggregator::new(&client, config.aggregate.clone());
    let pacer = Pacer::new(&config.pacing);
    let checkpointer = Checkpointer::new(&args.checkpoint_dir, &config.checkpoint);

    let (start, results): (usize, Vec<CityPoiRecord>) = match &args.resume {
        Some(path) => {
            let resumed = checkpoint::resume(path)?;
            (resumed.processed, resumed.records)
        }
        None => (0, Vec::new()),
    };

    let pb = ProgressBar::new(locations.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
            )?
            .progress_chars("#>-"),
    );

    let runner = BatchRunner::new(&aggregator, &pacer, &checkpointer).with_progress(pb);
    let outcome = runner.run(&locations, start, results).await?;
    let results = outcome.records;
    info!("Processed {} cities this run", outcome.processed);

    write_records(&args.output, &results)?;
    info!(
        "Scraping completed: {} cities with places written to {}",
        results.len(),
        args.output.display()
    );

    Ok(())
}
