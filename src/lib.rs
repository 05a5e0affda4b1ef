//! POI enrichment - gathers points of interest per city from a places API
//! and merges them into a geographic dataset.
//!
//! This library provides shared types and modules for the scrape and merge binaries.

pub mod aggregate;
pub mod align;
pub mod batch;
pub mod checkpoint;
pub mod cities;
pub mod config;
pub mod dataset;
pub mod error;
pub mod models;
pub mod naming;
pub mod pacing;
pub mod poi_file;
pub mod report;
pub mod search;

pub use aggregate::{Aggregation, Aggregator, AggregatorConfig};
pub use align::{align, AlignReport, MismatchPolicy};
pub use models::{CategoryId, CityPoiRecord, PlaceQuery, PoiAssociation, RawPlace};
