//! Exposure accumulation across subrun boundaries.

use nucaf_schema::{RunSummary, SCHEMA_VERSION};

use crate::event::SubrunSummary;

/// Running exposure total plus the most recent run/subrun identifiers.
///
/// Fed once per subrun boundary, independent of the per-event path;
/// flushed exactly once into the job's [`RunSummary`] at the end.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExposureTally {
    pot: f64,
    run: u32,
    subrun: u32,
}

impl ExposureTally {
    /// Fold one subrun boundary into the tally.
    ///
    /// A subrun without a reported exposure leaves the total unchanged;
    /// the identifiers are updated either way.
    pub fn accumulate(&mut self, summary: &SubrunSummary) {
        if let Some(pot) = summary.totpot {
            self.pot += pot;
        }
        self.run = summary.run;
        self.subrun = summary.subrun;
    }

    /// Total exposure accumulated so far.
    #[inline]
    #[must_use]
    pub const fn pot(&self) -> f64 {
        self.pot
    }

    /// Snapshot as the run-level summary record.
    #[must_use]
    pub const fn summary(&self) -> RunSummary {
        RunSummary {
            pot: self.pot,
            run: self.run,
            subrun: self.subrun,
            version: SCHEMA_VERSION,
        }
    }
}
