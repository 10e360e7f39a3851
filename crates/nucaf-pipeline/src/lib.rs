//! nucaf-pipeline — the record-construction pipeline.
//!
//! Converts per-event simulation-truth and reconstruction products into one
//! versioned [`nucaf_schema::StandardRecord`] per event and persists it to
//! the enabled output targets, under a "never crash on missing input"
//! contract: optional products degrade to defaults, missing mandatory truth
//! collections degrade the truth branch with a warning, and only
//! correlation or provenance-parse failures abort an event (never the job).
//!
//! The crate is single-threaded by design: it is driven by an external
//! sequential event loop, one event fully mapped and written before the
//! next begins. The side table, the two output streams, and the exposure
//! tally are the only state shared across events, each mutated by exactly
//! one component.
//!
//! We intentionally avoid broad re-exports so callers use stable paths
//! like `nucaf_pipeline::pipeline::CafMaker`.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation
)]

/// Upstream product model and the frame input envelope.
pub mod event;
/// Deterministic synthetic frame generator (for sims and tests).
pub mod generator;
/// JSON-Lines helpers for the frame stream.
pub mod io;
/// Per-event driver and configuration surface.
pub mod pipeline;
/// Reco mapper.
pub mod reco;
/// Append-only side table of raw generator records.
pub mod sidetable;
/// Output sink owning both record streams and the side table.
pub mod sink;
/// Exposure accumulation across subruns.
pub mod subrun;
/// Truth mapper.
pub mod truth;
