//! Per-event driver: assembles one record per event and hands it to the
//! sink.
//!
//! Events are fully mapped and written one at a time, in arrival order;
//! partial records are never observed outside [`CafMaker::process_frame`].
//! Truth-level failures (a missing raw generator record, a malformed
//! provenance string) abort the current event with a warning and the job
//! continues; sink I/O failures propagate and end the job.

use anyhow::Result;
use tracing::warn;

use nucaf_schema::{BeamBranch, DetectorMeta, RunSummary, StandardRecord};

use crate::event::{EventId, EventInputs, Frame};
use crate::reco::fill_reco;
use crate::sink::OutputSink;
use crate::subrun::ExposureTally;
use crate::truth::fill_truth;

/// Labels of the optional upstream products, plus the output switches.
#[derive(Clone, Debug)]
pub struct MakerConfig {
    /// Flavor-classifier producer label.
    pub cvn_label: String,
    /// Energy-regression producer label.
    pub regcnn_label: String,
    /// Electron-sample calorimetric estimator label. Recognized but not
    /// read yet; reserved for the calorimetric energy methods.
    pub energy_nue_label: String,
    /// Muon-sample calorimetric estimator label. Recognized but not read
    /// yet; reserved for the calorimetric energy methods.
    pub energy_numu_label: String,
    /// Pattern-recognition producer label (particles and vertices).
    pub vertex_label: String,
    /// Whether the nested record stream is produced.
    pub create_caf: bool,
    /// Whether the flat columnar stream is produced.
    pub create_flat: bool,
}

impl Default for MakerConfig {
    fn default() -> Self {
        Self {
            cvn_label: "cvn".to_string(),
            regcnn_label: "regcnn".to_string(),
            energy_nue_label: "energyreconue".to_string(),
            energy_numu_label: "energyreconumu".to_string(),
            vertex_label: "pandora".to_string(),
            create_caf: true,
            create_flat: true,
        }
    }
}

/// The record-construction pipeline for one job.
#[derive(Debug)]
pub struct CafMaker {
    cfg: MakerConfig,
    sink: OutputSink,
    tally: ExposureTally,
    dropped: u64,
}

impl CafMaker {
    /// Bind a configuration to an opened sink.
    #[must_use]
    pub fn new(cfg: MakerConfig, sink: OutputSink) -> Self {
        Self {
            cfg,
            sink,
            tally: ExposureTally::default(),
            dropped: 0,
        }
    }

    /// Dispatch one input frame.
    pub fn process_frame(&mut self, frame: &Frame) -> Result<()> {
        match frame {
            Frame::Subrun(summary) => {
                self.tally.accumulate(summary);
                Ok(())
            }
            Frame::Event(inputs) => self.process_event(inputs),
        }
    }

    /// Map and persist one detector event.
    ///
    /// An event whose truth branch cannot be constructed is dropped with a
    /// warning; nothing is written for it and the returned result is still
    /// `Ok`. Only sink I/O failures surface as errors.
    pub fn process_event(&mut self, ev: &EventInputs) -> Result<()> {
        let rec = match self.build_record(ev) {
            Ok(rec) => rec,
            Err(err) => {
                self.dropped += 1;
                warn!(
                    run = ev.id.run,
                    subrun = ev.id.subrun,
                    event = ev.id.event,
                    error = %format!("{err:#}"),
                    "event construction failed; record dropped"
                );
                return Ok(());
            }
        };
        self.sink.write(&rec)
    }

    /// Number of events dropped due to construction failures.
    #[inline]
    #[must_use]
    pub const fn events_dropped(&self) -> u64 {
        self.dropped
    }

    /// Number of events written so far.
    #[inline]
    #[must_use]
    pub const fn events_written(&self) -> u64 {
        self.sink.events_written()
    }

    /// Exposure accumulated so far.
    #[inline]
    #[must_use]
    pub const fn pot(&self) -> f64 {
        self.tally.pot()
    }

    /// Close the sink, writing the run summary exactly once.
    ///
    /// Consumes the maker; no further frames can be processed afterwards.
    pub fn finish(self) -> Result<RunSummary> {
        let summary = self.tally.summary();
        self.sink.close(&summary)?;
        Ok(summary)
    }

    fn build_record(&mut self, ev: &EventInputs) -> Result<StandardRecord> {
        let mut rec = StandardRecord::default();
        fill_meta(&mut rec.meta.fd_hd, &ev.id);
        fill_beam(&mut rec.beam);

        match (&ev.mctruth, &ev.gtruth) {
            (None, _) => {
                warn!(
                    event = ev.id.event,
                    "no generator truth collection; truth branch left empty"
                );
            }
            (_, None) => {
                warn!(
                    event = ev.id.event,
                    "no generator-specific truth collection; truth branch left empty"
                );
            }
            (Some(mctruth), Some(gtruth)) => {
                fill_truth(
                    &mut rec.mc,
                    mctruth,
                    gtruth,
                    &ev.flux,
                    &ev.ghep,
                    self.sink.side_table(),
                )?;
            }
        }

        fill_reco(&mut rec.common, ev, &self.cfg);
        Ok(rec)
    }
}

/// Fill per-event identifiers for the active detector configuration.
fn fill_meta(meta: &mut DetectorMeta, id: &EventId) {
    meta.enabled = true;
    meta.run = id.run;
    meta.subrun = id.subrun;
    meta.event = id.event;
    meta.subevt = 0;
}

/// Fill beam flags. Only simulation passes through this pipeline today.
fn fill_beam(beam: &mut BeamBranch) {
    beam.ismc = true;
}
