//! Error types shared by the library modules.

use std::io;

use thiserror::Error;

use crate::align::AlignReport;
use crate::models::CategoryId;

/// Failure of a single category search. Never fatal to a run.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("request for {category} near '{near}' failed: {source}")]
    Transport {
        category: CategoryId,
        near: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request for {category} near '{near}' returned status {status}")]
    Status {
        category: CategoryId,
        near: String,
        status: u16,
    },
    #[error("could not decode response for {category} near '{near}': {reason}")]
    Decode {
        category: CategoryId,
        near: String,
        reason: String,
    },
}

/// Failure of a positional merge.
#[derive(Debug, Error)]
pub enum AlignError {
    #[error("anchor record '{0}' not found in target dataset")]
    AnchorNotFound(String),
    #[error("{} key mismatches from anchor '{}'", .0.mismatch_count(), .0.anchor)]
    KeyMismatch(Box<AlignReport>),
}

impl AlignError {
    /// The pairing report behind a refused merge
    pub fn report(&self) -> Option<&AlignReport> {
        match self {
            AlignError::KeyMismatch(report) => Some(report),
            AlignError::AnchorNotFound(_) => None,
        }
    }
}

/// Failure loading or saving the target dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dataset has no 'features' array")]
    MissingFeatures,
    #[error("feature {0} has no string 'properties.name'")]
    MissingName(usize),
}
