//! Output sink: the job-scoped writer context.
//!
//! Owns the nested record stream, the flat columnar stream, and the side
//! table for the lifetime of a job. Both event streams are derived from the
//! same in-memory record in the same call, so any field read back from
//! either target yields the same value. Closing consumes the sink, which
//! makes writes after the final flush unrepresentable.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use nucaf_schema::io::JsonlWriter;
use nucaf_schema::{io, FlatRecord, RunSummary, StandardRecord};

use crate::sidetable::SideTable;

/// Filesystem targets for one job. `None` disables that target.
#[derive(Clone, Debug)]
pub struct SinkConfig {
    /// Nested record stream (JSON-Lines).
    pub caf_path: Option<PathBuf>,
    /// Flat columnar record stream (JSON-Lines).
    pub flat_path: Option<PathBuf>,
    /// Raw-generator-record side table (JSON-Lines).
    pub genie_path: Option<PathBuf>,
    /// Run summary, written once at close (`.json` or `.cbor`).
    pub summary_path: PathBuf,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            caf_path: Some(PathBuf::from("caf.jsonl")),
            flat_path: Some(PathBuf::from("flatcaf.jsonl")),
            genie_path: Some(PathBuf::from("genie.jsonl")),
            summary_path: PathBuf::from("summary.json"),
        }
    }
}

/// Job-scoped writer context over both event streams and the side table.
#[derive(Debug)]
pub struct OutputSink {
    caf: Option<JsonlWriter<StandardRecord>>,
    flat: Option<JsonlWriter<FlatRecord>>,
    table: SideTable,
    summary_path: PathBuf,
    events: u64,
}

impl OutputSink {
    /// Acquire every configured target. Streams are created (truncated)
    /// here and stay open until [`OutputSink::close`].
    pub fn open(cfg: &SinkConfig) -> Result<Self> {
        let caf = cfg
            .caf_path
            .as_ref()
            .map(JsonlWriter::create)
            .transpose()
            .with_context(|| "open nested record stream")?;
        let flat = cfg
            .flat_path
            .as_ref()
            .map(JsonlWriter::create)
            .transpose()
            .with_context(|| "open flat record stream")?;
        let table = match &cfg.genie_path {
            Some(path) => SideTable::create(path)?,
            None => SideTable::detached(),
        };

        Ok(Self {
            caf,
            flat,
            table,
            summary_path: cfg.summary_path.clone(),
            events: 0,
        })
    }

    /// The side table owned by this job.
    pub fn side_table(&mut self) -> &mut SideTable {
        &mut self.table
    }

    /// Persist one completed record to every enabled target.
    ///
    /// The flat form is derived from `rec` here, in the same call, never
    /// re-derived independently per target. A disabled target is a no-op
    /// for that target only.
    pub fn write(&mut self, rec: &StandardRecord) -> Result<()> {
        if let Some(w) = &mut self.caf {
            w.write(rec).with_context(|| "write nested record")?;
        }
        if let Some(w) = &mut self.flat {
            let flat = FlatRecord::from_record(rec);
            w.write(&flat).with_context(|| "write flat record")?;
        }
        self.events += 1;
        Ok(())
    }

    /// Number of records written so far.
    #[inline]
    #[must_use]
    pub const fn events_written(&self) -> u64 {
        self.events
    }

    /// Flush and close every stream and write the run summary exactly once.
    pub fn close(self, summary: &RunSummary) -> Result<()> {
        let events = self.events;
        if let Some(w) = self.caf {
            w.finish().with_context(|| "close nested record stream")?;
        }
        if let Some(w) = self.flat {
            w.finish().with_context(|| "close flat record stream")?;
        }
        let correlated = self.table.len();
        self.table.finish().with_context(|| "close side table")?;
        io::write_auto(&self.summary_path, summary).with_context(|| "write run summary")?;

        info!(
            events,
            correlated,
            pot = summary.pot,
            "output sink closed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nucaf_schema::io::JsonlReader;
    use nucaf_schema::{TrueInteraction, SCHEMA_VERSION};

    fn record_with_event(event: u32) -> StandardRecord {
        let mut rec = StandardRecord::default();
        rec.meta.fd_hd.event = event;
        rec.mc.nu.push(TrueInteraction {
            id: 0,
            e: 1.0 + event as f32,
            ..TrueInteraction::default()
        });
        rec.mc.nnu = 1;
        rec
    }

    #[test]
    fn both_targets_receive_the_same_record() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let cfg = SinkConfig {
            caf_path: Some(dir.path().join("caf.jsonl")),
            flat_path: Some(dir.path().join("flatcaf.jsonl")),
            genie_path: Some(dir.path().join("genie.jsonl")),
            summary_path: dir.path().join("summary.json"),
        };

        let mut sink = OutputSink::open(&cfg)?;
        let recs = vec![record_with_event(1), record_with_event(2)];
        for rec in &recs {
            sink.write(rec)?;
        }
        assert_eq!(sink.events_written(), 2);
        sink.close(&RunSummary::default())?;

        let nested: Vec<StandardRecord> =
            JsonlReader::open(dir.path().join("caf.jsonl"))?.collect::<Result<_>>()?;
        let flat: Vec<FlatRecord> =
            JsonlReader::open(dir.path().join("flatcaf.jsonl"))?.collect::<Result<_>>()?;

        assert_eq!(nested, recs);
        assert_eq!(flat.len(), 2);
        for (n, f) in nested.iter().zip(&flat) {
            assert_eq!(&FlatRecord::from_record(n), f);
        }
        Ok(())
    }

    #[test]
    fn disabled_targets_produce_no_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let cfg = SinkConfig {
            caf_path: None,
            flat_path: None,
            genie_path: None,
            summary_path: dir.path().join("summary.json"),
        };

        let mut sink = OutputSink::open(&cfg)?;
        sink.write(&record_with_event(1))?;
        let summary = RunSummary {
            pot: 5.0e16,
            run: 1,
            subrun: 1,
            version: SCHEMA_VERSION,
        };
        sink.close(&summary)?;

        assert!(!dir.path().join("caf.jsonl").exists());
        assert!(!dir.path().join("flatcaf.jsonl").exists());
        assert!(!dir.path().join("genie.jsonl").exists());

        let back: RunSummary = io::read_auto(dir.path().join("summary.json"))?;
        assert_eq!(back, summary);
        Ok(())
    }
}
