//! Truth branch: true interactions and their final-state particle arenas.
//!
//! Counter fields are maintained by the truth mapper and must stay equal to
//! the classification they summarize: `nprim == prim.len()`,
//! `nprefsi == prefsi.len()`, and the species counters partition the subset
//! of `prim` with a matching PDG code.

use serde::{Deserialize, Serialize};

use crate::types::{Generator, LorentzVector, ParticleProcess, Vector3};

/// Sentinel for "no side-table entry is available for this interaction".
pub const NO_GENIE_IDX: i64 = -1;

/// One simulated particle attached to a true interaction.
///
/// Parent/daughter relationships are integer indices into the generator's
/// particle numbering, never references. Daughter indices are copied
/// verbatim from the generator record and are **not** remapped after the
/// status filter, so they refer to the unfiltered particle list.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TrueParticle {
    /// PDG code.
    pub pdg: i32,
    /// Tracking identifier assigned by the simulation.
    pub g4id: i32,
    /// Identifier of the owning [`TrueInteraction`] (back-reference, not an
    /// ownership edge).
    pub interaction_id: i64,
    /// Production time \[ns\].
    pub time: f32,
    /// Four-momentum at production.
    pub p: LorentzVector,
    /// Start position.
    pub start_pos: Vector3,
    /// End position.
    pub end_pos: Vector3,
    /// Index of the mother particle in the generator numbering.
    pub parent: i32,
    /// Indices of daughter particles in the generator numbering.
    pub daughters: Vec<i32>,
    /// Process that created the particle.
    pub start_process: ParticleProcess,
    /// Process that destroyed the particle.
    pub end_process: ParticleProcess,
}

/// One true neutrino interaction.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrueInteraction {
    /// 0-based sequential identifier, unique within the event.
    pub id: i64,
    /// Index into the raw-generator-record side table, or
    /// [`NO_GENIE_IDX`] if no correlation was established.
    pub genie_idx: i64,

    /// Neutrino PDG code at the interaction.
    pub pdg: i32,
    /// Neutrino PDG code at the flux parent (before oscillation).
    pub pdgorig: i32,
    /// Charged-current interaction flag.
    pub iscc: bool,
    /// Scattering-mode code as reported by the generator.
    pub mode: i32,
    /// Target nucleus PDG code.
    pub target_pdg: i32,
    /// Struck nucleon PDG code.
    pub hitnuc: i32,

    /// Neutrino energy \[GeV\].
    pub e: f32,
    /// Interaction vertex.
    pub vtx: Vector3,
    /// Interaction time \[ns\].
    pub time: f32,
    /// Neutrino three-momentum \[GeV\].
    pub momentum: Vector3,
    /// Hadronic invariant mass W \[GeV\].
    pub w: f32,
    /// Squared four-momentum transfer \[GeV^2\].
    pub q2: f32,
    /// Bjorken x.
    pub bjorken_x: f32,
    /// Inelasticity y.
    pub inelasticity: f32,
    /// Energy transfer q0 \[GeV\].
    pub q0: f32,
    /// Magnitude of the three-momentum transfer \[GeV\].
    pub modq: f32,
    /// Kinematic t \[GeV^2\].
    pub t: f32,

    /// Charm production flag.
    pub ischarm: bool,
    /// Sea-quark scattering flag.
    pub isseaquark: bool,
    /// Resonance number for resonant production.
    pub resnum: i32,
    /// Cross section for this event kinematics.
    pub xsec: f32,
    /// Generator event weight.
    pub genweight: f32,

    /// Generator identity.
    pub generator: Generator,
    /// Generator version split into ordered integer segments.
    pub gen_version: Vec<u32>,
    /// Generator tune/configuration string (empty if not reported).
    pub gen_config: String,

    /// Number of primary protons.
    pub nproton: u32,
    /// Number of primary neutrons.
    pub nneutron: u32,
    /// Number of primary pi+.
    pub npip: u32,
    /// Number of primary pi-.
    pub npim: u32,
    /// Number of primary pi0.
    pub npi0: u32,
    /// Number of primary final-state particles (`prim.len()`).
    pub nprim: u32,
    /// Number of pre-final-state-interaction hadrons (`prefsi.len()`).
    pub nprefsi: u32,
    /// Number of secondary particles. Reserved; stays 0 until secondaries
    /// are propagated into the record.
    pub nsec: u32,

    /// Primary (stable final-state) particles.
    pub prim: Vec<TrueParticle>,
    /// Pre-final-state-interaction hadrons.
    pub prefsi: Vec<TrueParticle>,
}

impl Default for TrueInteraction {
    fn default() -> Self {
        Self {
            id: 0,
            genie_idx: NO_GENIE_IDX,
            pdg: 0,
            pdgorig: 0,
            iscc: false,
            mode: 0,
            target_pdg: 0,
            hitnuc: 0,
            e: 0.0,
            vtx: Vector3::default(),
            time: 0.0,
            momentum: Vector3::default(),
            w: 0.0,
            q2: 0.0,
            bjorken_x: 0.0,
            inelasticity: 0.0,
            q0: 0.0,
            modq: 0.0,
            t: 0.0,
            ischarm: false,
            isseaquark: false,
            resnum: 0,
            xsec: 0.0,
            genweight: 0.0,
            generator: Generator::Unknown,
            gen_version: Vec::new(),
            gen_config: String::new(),
            nproton: 0,
            nneutron: 0,
            npip: 0,
            npim: 0,
            npi0: 0,
            nprim: 0,
            nprefsi: 0,
            nsec: 0,
            prim: Vec::new(),
            prefsi: Vec::new(),
        }
    }
}

/// Ordered sequence of true interactions plus its count field.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TruthBranch {
    /// True interactions in generator order.
    pub nu: Vec<TrueInteraction>,
    /// Number of entries in `nu`.
    pub nnu: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_interaction_has_sentinel_index() {
        let inter = TrueInteraction::default();
        assert_eq!(inter.genie_idx, NO_GENIE_IDX);
        assert!(inter.prim.is_empty());
        assert_eq!(inter.nprim, 0);
    }
}
