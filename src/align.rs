//! Positional merge of POI strings into a target dataset.
//!
//! Records are joined by position, not by key: the source association is
//! laid over the target sequence starting at an anchor record, and entry
//! `i` overwrites target `anchor + i`. Keys are compared only to report
//! mismatches; whether a mismatch stops the merge is up to the caller's
//! [`MismatchPolicy`].

use serde::Serialize;
use tracing::{info, warn};

use crate::dataset::TargetRecord;
use crate::error::AlignError;
use crate::models::PoiAssociation;

/// What to do when a paired source and target key differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MismatchPolicy {
    /// Overwrite regardless and report the mismatches
    #[default]
    Proceed,
    /// Refuse to touch the dataset if any pair mismatches
    Abort,
}

/// One source/target pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pairing {
    /// Index into the target sequence
    pub position: usize,
    pub source_key: String,
    pub target_key: String,
    pub matches: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlignReport {
    pub anchor: String,
    pub anchor_position: usize,
    pub updated: usize,
    /// Source entries left over once the target sequence ran out
    pub unpaired: usize,
    /// Set when the mismatch policy stopped the merge before any write
    pub aborted: bool,
    pub mismatches: Vec<Pairing>,
}

impl AlignReport {
    pub fn mismatch_count(&self) -> usize {
        self.mismatches.len()
    }
}

/// Position of the first record whose key equals `anchor` exactly.
pub fn find_anchor<R: TargetRecord>(targets: &[R], anchor: &str) -> Result<usize, AlignError> {
    targets
        .iter()
        .position(|r| r.key() == anchor)
        .ok_or_else(|| AlignError::AnchorNotFound(anchor.to_string()))
}

fn pairings<'a, R: TargetRecord>(
    targets: &'a [R],
    source: &'a PoiAssociation,
    anchor_position: usize,
) -> impl Iterator<Item = Pairing> + 'a {
    source
        .iter()
        .zip(targets[anchor_position..].iter())
        .enumerate()
        .map(move |(i, (entry, target))| Pairing {
            position: anchor_position + i,
            source_key: entry.key.clone(),
            target_key: target.key().to_string(),
            matches: entry.key == target.key(),
        })
}

/// The first `n` pairings from the anchor, without modifying anything.
pub fn preview<R: TargetRecord>(
    targets: &[R],
    source: &PoiAssociation,
    anchor: &str,
    n: usize,
) -> Result<Vec<Pairing>, AlignError> {
    let anchor_position = find_anchor(targets, anchor)?;
    Ok(pairings(targets, source, anchor_position).take(n).collect())
}

/// Overwrite the POI of each target from the anchor onward with the
/// source entry at the same offset.
///
/// Stops at whichever sequence ends first. With [`MismatchPolicy::Abort`]
/// any key mismatch fails the merge before a single record is written.
pub fn align<R: TargetRecord>(
    targets: &mut [R],
    source: &PoiAssociation,
    anchor: &str,
    policy: MismatchPolicy,
) -> Result<AlignReport, AlignError> {
    let anchor_position = find_anchor(targets, anchor)?;
    let mismatches: Vec<Pairing> = pairings(targets, source, anchor_position)
        .filter(|p| !p.matches)
        .collect();

    let paired = source.len().min(targets.len() - anchor_position);
    let unpaired = source.len() - paired;

    if policy == MismatchPolicy::Abort && !mismatches.is_empty() {
        return Err(AlignError::KeyMismatch(Box::new(AlignReport {
            anchor: anchor.to_string(),
            anchor_position,
            updated: 0,
            unpaired,
            aborted: true,
            mismatches,
        })));
    }

    let mut updated = 0;
    for (entry, target) in source.iter().zip(targets[anchor_position..].iter_mut()) {
        target.set_poi(&entry.poi);
        updated += 1;

        if is_logged_update(updated) {
            info!(
                "  {}: {} vs {} {}",
                updated,
                target.key(),
                entry.key,
                if target.key() == entry.key { "✓" } else { "✗" }
            );
        }
    }

    if unpaired > 0 {
        info!(
            "Reached end of target records at index {}; {} source entries unused",
            targets.len(),
            unpaired
        );
    }
    if !mismatches.is_empty() {
        warn!(
            "{} of {} positional pairs have differing keys",
            mismatches.len(),
            updated
        );
    }

    Ok(AlignReport {
        anchor: anchor.to_string(),
        anchor_position,
        updated,
        unpaired,
        aborted: false,
        mismatches,
    })
}

/// The first five updates and every hundredth after that are logged.
fn is_logged_update(updated: usize) -> bool {
    updated <= 5 || updated % 100 == 0
}
