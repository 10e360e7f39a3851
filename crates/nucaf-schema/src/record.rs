//! Root analysis record and its per-event header branches, plus the
//! run-level summary record.

use serde::{Deserialize, Serialize};

use crate::reco::CommonRecoBranch;
use crate::truth::TruthBranch;
use crate::types::SCHEMA_VERSION;

/// Per-event identifiers and status for one detector configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetectorMeta {
    /// Whether this detector configuration produced data for the event.
    pub enabled: bool,
    /// Run number.
    pub run: u32,
    /// Subrun number.
    pub subrun: u32,
    /// Event number.
    pub event: u32,
    /// Sub-event index within the event. Always 0 today.
    pub subevt: u32,
}

/// Event metadata, one slot per detector configuration.
///
/// Only the far-detector horizontal-drift slot is filled today; further
/// configurations get their own slot when their producers come online.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetaBranch {
    /// Far detector, horizontal drift.
    pub fd_hd: DetectorMeta,
}

/// Beam-related flags.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BeamBranch {
    /// Whether the event is simulated.
    pub ismc: bool,
}

/// One unified analysis record per event.
///
/// The record owns every branch below it; both on-disk representations
/// (nested and flat columnar) are derived from a single instance of this
/// type per event.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StandardRecord {
    /// Output-format version tag.
    pub version: u32,
    /// Event metadata.
    pub meta: MetaBranch,
    /// Beam flags.
    pub beam: BeamBranch,
    /// Simulation truth.
    pub mc: TruthBranch,
    /// Common reconstruction outputs.
    pub common: CommonRecoBranch,
}

impl Default for StandardRecord {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            meta: MetaBranch::default(),
            beam: BeamBranch::default(),
            mc: TruthBranch::default(),
            common: CommonRecoBranch::default(),
        }
    }
}

/// Run-level summary, written exactly once at the end of a job.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    /// Accumulated exposure \[protons on target\].
    pub pot: f64,
    /// Run number of the last processed subrun.
    pub run: u32,
    /// Subrun number of the last processed subrun.
    pub subrun: u32,
    /// Output-format version tag.
    pub version: u32,
}
