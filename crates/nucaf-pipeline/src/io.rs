//! I/O helpers for the frame input stream (format-level).
//!
//! Frames travel as JSON-Lines, one frame per line, so arbitrarily long
//! jobs can be consumed without materializing the stream.

use anyhow::Result;
use std::path::Path;

use nucaf_schema::io::{JsonlReader, JsonlWriter};

use crate::event::Frame;

/// Stream frames from `path`, one `Result<Frame>` per line.
pub fn stream_frames<P: AsRef<Path>>(path: P) -> Result<JsonlReader<Frame>> {
    JsonlReader::open(path)
}

/// Write a frame stream to `path`.
pub fn write_frames<P: AsRef<Path>>(path: P, frames: &[Frame]) -> Result<u64> {
    let mut w = JsonlWriter::create(path)?;
    for frame in frames {
        w.write(frame)?;
    }
    w.finish()
}
