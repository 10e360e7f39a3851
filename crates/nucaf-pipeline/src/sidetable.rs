//! Append-only side table of raw generator event records.
//!
//! Each append durably stores one raw record keyed by its 0-based append
//! order and returns that index, which stays valid for the lifetime of the
//! output artifact: indices are never reused and never reordered. The truth
//! mapper embeds the returned index in the interaction it is building,
//! before that interaction is appended to the truth branch.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use nucaf_schema::io::JsonlWriter;

/// One side-table row: the raw record and its append index.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SideTableEntry {
    /// 0-based append order; equals the row's position in the stream.
    pub idx: u64,
    /// Raw generator event record, carried opaquely.
    pub record: serde_json::Value,
}

/// Append-only correlator over a JSON-Lines stream.
#[derive(Debug)]
pub struct SideTable {
    next: u64,
    writer: Option<JsonlWriter<SideTableEntry>>,
}

impl SideTable {
    /// Open a durable side table backed by `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let writer = JsonlWriter::create(path).with_context(|| "open side table")?;
        Ok(Self {
            next: 0,
            writer: Some(writer),
        })
    }

    /// Index-only table with no backing stream.
    ///
    /// Indices behave identically to the durable form; nothing is persisted.
    #[must_use]
    pub const fn detached() -> Self {
        Self {
            next: 0,
            writer: None,
        }
    }

    /// Append one raw record and return its stable 0-based index.
    pub fn append(&mut self, record: &serde_json::Value) -> Result<i64> {
        let idx = self.next;
        if let Some(w) = &mut self.writer {
            let entry = SideTableEntry {
                idx,
                record: record.clone(),
            };
            w.write(&entry)
                .with_context(|| format!("append side-table entry {idx}"))?;
        }
        self.next += 1;
        Ok(idx as i64)
    }

    /// Number of entries appended so far, across all events of the job.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.next
    }

    /// Whether nothing has been appended yet.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.next == 0
    }

    /// Flush and close the backing stream, if any.
    pub fn finish(self) -> Result<()> {
        if let Some(w) = self.writer {
            w.finish()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nucaf_schema::io::JsonlReader;
    use serde_json::json;

    #[test]
    fn append_indices_are_sequential_and_stable() {
        let mut table = SideTable::detached();
        for expect in 0..5i64 {
            let idx = table.append(&json!({"n": expect})).unwrap();
            assert_eq!(idx, expect);
        }
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn durable_entries_are_index_aligned() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("genie.jsonl");

        let mut table = SideTable::create(&path)?;
        let records = vec![json!({"evt": 0}), json!({"evt": 1}), json!({"evt": 2})];
        for rec in &records {
            table.append(rec)?;
        }
        table.finish()?;

        let entries: Vec<SideTableEntry> =
            JsonlReader::open(&path)?.collect::<Result<_>>()?;
        assert_eq!(entries.len(), 3);
        for (line, entry) in entries.iter().enumerate() {
            assert_eq!(entry.idx, line as u64);
            assert_eq!(entry.record, records[line]);
        }
        Ok(())
    }
}
