//! Common reconstruction branch: interaction hypotheses and their
//! classifier/energy sub-branches.

use serde::{Deserialize, Serialize};

use crate::types::{LorentzVector, Vector3};

/// Flavor-classifier scores for one interaction hypothesis.
///
/// Default-constructed scores are all zero; an absent classifier product
/// leaves the whole branch in exactly this state.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CvnScoreBranch {
    /// Antineutrino hypothesis (probability thresholded at 0.5).
    pub isnubar: bool,
    /// Electron-neutrino score.
    pub nue: f32,
    /// Muon-neutrino score.
    pub numu: f32,
    /// Tau-neutrino score.
    pub nutau: f32,
    /// Neutral-current score.
    pub nc: f32,

    /// 0-proton final-state score.
    pub protons0: f32,
    /// 1-proton final-state score.
    pub protons1: f32,
    /// 2-proton final-state score.
    pub protons2: f32,
    /// >2-proton final-state score.
    pub protons_n: f32,

    /// 0 charged-pion score.
    pub chgpi0: f32,
    /// 1 charged-pion score.
    pub chgpi1: f32,
    /// 2 charged-pion score.
    pub chgpi2: f32,
    /// >2 charged-pion score.
    pub chgpi_n: f32,

    /// 0 neutral-pion score.
    pub pizero0: f32,
    /// 1 neutral-pion score.
    pub pizero1: f32,
    /// 2 neutral-pion score.
    pub pizero2: f32,
    /// >2 neutral-pion score.
    pub pizero_n: f32,

    /// 0-neutron score.
    pub neutron0: f32,
    /// 1-neutron score.
    pub neutron1: f32,
    /// 2-neutron score.
    pub neutron2: f32,
    /// >2-neutron score.
    pub neutron_n: f32,
}

/// Neutrino-flavor hypothesis sub-branch.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct NuHypothesisBranch {
    /// Convolutional-classifier scores.
    pub cvn: CvnScoreBranch,
}

/// Neutrino-energy estimates for one hypothesis.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct NeutrinoEnergyBranch {
    /// Regression-network estimate \[GeV\]. 0 when no estimator ran.
    pub regcnn: f32,
}

/// One reconstructed particle descriptor.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RecoParticle {
    /// Hypothesized PDG code.
    pub pdg: i32,
    /// Reconstructed four-momentum.
    pub p: LorentzVector,
}

/// Reconstructed particles attached to a hypothesis.
///
/// The producer for this branch is not wired up yet; the container exists
/// so the serialized layout is stable once it is.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RecoParticlesBranch {
    /// Particle descriptors.
    pub particles: Vec<RecoParticle>,
    /// Number of entries in `particles`.
    pub nparticles: u32,
}

/// One reconstructed candidate neutrino interaction.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct InteractionHypothesis {
    /// Reconstructed vertex; `None` when not uniquely determined.
    pub vtx: Option<Vector3>,
    /// Flavor hypothesis scores.
    pub nuhyp: NuHypothesisBranch,
    /// Energy estimates.
    pub enu: NeutrinoEnergyBranch,
    /// Reconstructed particles.
    pub part: RecoParticlesBranch,
}

/// Interaction hypotheses per reconstruction source, with count fields.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct InteractionBranch {
    /// Hypotheses from the pattern-recognition reconstruction.
    pub pandora: Vec<InteractionHypothesis>,
    /// Number of entries in `pandora`.
    pub npandora: u32,
    /// Hypotheses from the deep-learning reconstruction. Reserved; no
    /// producer fills it yet.
    pub dlp: Vec<InteractionHypothesis>,
    /// Number of entries in `dlp`.
    pub ndlp: u32,
}

/// Reconstruction outputs common to all detector configurations.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CommonRecoBranch {
    /// Interaction hypotheses.
    pub ixn: InteractionBranch,
}
