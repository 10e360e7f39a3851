//! nucaf-schema — the versioned analysis-record schema and its two on-disk
//! forms.
//!
//! This crate defines the **stable boundary** used across nucaf crates:
//! - the hierarchical per-event record ([`StandardRecord`]) with total
//!   default coverage, so a partially-filled record is always well-formed
//!   and serializable,
//! - the flattened columnar mirror ([`FlatRecord`]), derived from the
//!   nested record by a single total function, and
//! - JSON/CBOR/JSON-Lines I/O helpers shared by the pipeline and CLI.
//!
//! No behavior lives here beyond default-initialization and flattening;
//! the mappers that populate records are in `nucaf-pipeline`.

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

/// Flattened columnar mirror of the record.
pub mod flat;
/// JSON/CBOR single-value helpers and JSON-Lines streams.
pub mod io;
/// Common reconstruction branch types.
pub mod reco;
/// Root record, header branches, and run summary.
pub mod record;
/// Truth branch types.
pub mod truth;
/// Shared primitives, enumerations, and the schema version.
pub mod types;

pub use flat::FlatRecord;
pub use record::{BeamBranch, DetectorMeta, MetaBranch, RunSummary, StandardRecord};
pub use reco::{
    CommonRecoBranch, CvnScoreBranch, InteractionBranch, InteractionHypothesis,
    NeutrinoEnergyBranch, NuHypothesisBranch, RecoParticle, RecoParticlesBranch,
};
pub use truth::{TrueInteraction, TrueParticle, TruthBranch, NO_GENIE_IDX};
pub use types::{Generator, LorentzVector, ParticleProcess, Vector3, SCHEMA_VERSION};
