//! Serialization helpers: JSON/CBOR single-value files with extension-based
//! auto-detection, and generic JSON-Lines streams for per-event records.
//!
//! Unknown/missing extensions are rejected for reads and default to JSON
//! for writes, so a misnamed output never silently changes format.

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::Path;

/// Ensure the parent directory for a file exists (no-op if none).
fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating parent directory {}", dir.display()))?;
        }
    }
    Ok(())
}

/// Lower-cased file extension, if any.
fn ext_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/* ---------------- single-value JSON / CBOR ---------------- */

/// Read one value from a **JSON** file.
pub fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let rdr = BufReader::new(f);
    serde_json::from_reader(rdr).with_context(|| format!("deserialize JSON {}", path.display()))
}

/// Write one value to a **JSON** file (pretty).
pub fn write_json<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, value)
        .with_context(|| format!("serialize JSON {}", path.display()))?;
    w.flush().with_context(|| "flush JSON writer")?;
    Ok(())
}

/// Read one value from a **CBOR** file.
pub fn read_cbor<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut rdr = BufReader::new(f);
    ciborium::de::from_reader(&mut rdr)
        .with_context(|| format!("deserialize CBOR {}", path.display()))
}

/// Write one value to a **CBOR** file.
pub fn write_cbor<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    ciborium::ser::into_writer(value, &mut w)
        .with_context(|| format!("serialize CBOR {}", path.display()))?;
    w.flush().with_context(|| "flush CBOR writer")?;
    Ok(())
}

/// Auto-detect **read** by extension (`.json` / `.cbor`, case-insensitive).
pub fn read_auto<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    match ext_lower(path.as_ref()).as_deref() {
        Some("json") => read_json(path),
        Some("cbor") => read_cbor(path),
        Some(other) => Err(anyhow!(
            "unsupported extension: {other} (supported: .json, .cbor)"
        )),
        None => Err(anyhow!("path has no extension (expected .json or .cbor)")),
    }
}

/// Auto-detect **write** by extension (defaults to JSON if unknown).
pub fn write_auto<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> Result<()> {
    match ext_lower(path.as_ref()).as_deref() {
        Some("cbor") => write_cbor(path, value),
        _ => write_json(path, value),
    }
}

/* ---------------- JSON Lines streams ---------------- */

/// Append-only JSON-Lines writer: one serialized value per line.
///
/// Buffered; [`JsonlWriter::finish`] flushes and returns the line count.
#[derive(Debug)]
pub struct JsonlWriter<T> {
    w: BufWriter<File>,
    lines: u64,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Serialize> JsonlWriter<T> {
    /// Create (truncate) the stream at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        ensure_parent_dir(path)?;
        let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
        Ok(Self {
            w: BufWriter::new(f),
            lines: 0,
            _marker: PhantomData,
        })
    }

    /// Append one value as a single line.
    pub fn write(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer(&mut self.w, value)
            .with_context(|| format!("serialize jsonl line {}", self.lines + 1))?;
        self.w.write_all(b"\n").with_context(|| "write newline")?;
        self.lines += 1;
        Ok(())
    }

    /// Number of lines written so far.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.lines
    }

    /// Whether nothing has been written yet.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lines == 0
    }

    /// Flush and close, returning the number of lines written.
    pub fn finish(mut self) -> Result<u64> {
        self.w.flush().with_context(|| "flush jsonl writer")?;
        Ok(self.lines)
    }
}

/// Owning JSON-Lines reader yielding `Result<T>` per line.
///
/// Holds the file and buffer internally so the iterator has no borrowed
/// state; parse errors carry the 1-based line number.
#[derive(Debug)]
pub struct JsonlReader<T> {
    rdr: BufReader<File>,
    buf: String,
    line_no: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    /// Open the stream at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
        Ok(Self {
            rdr: BufReader::new(f),
            buf: String::with_capacity(8 << 10),
            line_no: 0,
            _marker: PhantomData,
        })
    }
}

impl<T: DeserializeOwned> Iterator for JsonlReader<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.rdr.read_line(&mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                self.line_no += 1;
                if self.buf.ends_with('\n') {
                    self.buf.pop();
                    if self.buf.ends_with('\r') {
                        self.buf.pop();
                    }
                }
                if self.buf.is_empty() {
                    return Some(Err(anyhow!("parse jsonl line {}: empty line", self.line_no)));
                }
                let parsed: Result<T> = serde_json::from_str(&self.buf)
                    .with_context(|| format!("parse jsonl line {}", self.line_no));
                Some(parsed)
            }
            Err(e) => Some(Err(e).with_context(|| format!("read line {}", self.line_no + 1))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{RunSummary, StandardRecord};

    #[test]
    fn json_and_cbor_round_trip() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let summary = RunSummary {
            pot: 1.25e17,
            run: 7,
            subrun: 3,
            version: 1,
        };

        let jpath = dir.path().join("summary.json");
        write_auto(&jpath, &summary)?;
        let back: RunSummary = read_auto(&jpath)?;
        assert_eq!(back, summary);

        let cpath = dir.path().join("summary.cbor");
        write_auto(&cpath, &summary)?;
        let back: RunSummary = read_auto(&cpath)?;
        assert_eq!(back, summary);
        Ok(())
    }

    #[test]
    fn unknown_extension_is_rejected_for_reads() {
        let err = read_auto::<RunSummary, _>("summary.toml").unwrap_err();
        assert!(err.to_string().contains("unsupported extension"));
    }

    #[test]
    fn jsonl_round_trip_preserves_order() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("recs.jsonl");

        let mut w = JsonlWriter::create(&path)?;
        let mut recs = Vec::new();
        for event in 0..3u32 {
            let mut rec = StandardRecord::default();
            rec.meta.fd_hd.event = event;
            w.write(&rec)?;
            recs.push(rec);
        }
        assert_eq!(w.finish()?, 3);

        let back: Vec<StandardRecord> =
            JsonlReader::open(&path)?.collect::<Result<_>>()?;
        assert_eq!(back, recs);
        Ok(())
    }
}
