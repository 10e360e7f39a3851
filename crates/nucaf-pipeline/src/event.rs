//! Modeled upstream products and the per-event input envelope.
//!
//! The host event-processing loop is external to this crate; what arrives
//! here is a stream of [`Frame`]s, one per subrun boundary or detector
//! event. Product collections mirror what the upstream producers hand over:
//! generator truth, generator-specific truth and flux records as
//! index-aligned sequences, raw generator records for side-table
//! correlation, and label-keyed optional reconstruction products.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use nucaf_schema::{LorentzVector, Vector3};

/// Run/subrun/event identifiers for one detector event.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventId {
    /// Run number.
    pub run: u32,
    /// Subrun number.
    pub subrun: u32,
    /// Event number.
    pub event: u32,
}

/// Generator identity as reported by the upstream truth producer.
///
/// This is the producer-side enumeration; the output format maps it onto
/// its own closed [`nucaf_schema::Generator`] set.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorId {
    /// GENIE.
    Genie,
    /// CRY cosmic-ray generator.
    Cry,
    /// GiBUU.
    Gibuu,
    /// NuWro.
    Nuwro,
    /// MARLEY.
    Marley,
    /// NEUT.
    Neut,
    /// CORSIKA.
    Corsika,
    /// Geant4 particle gun.
    Geant,
    /// Not recorded.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Generator status code of a truth particle.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum McStatus {
    /// Initial-state particle.
    InitialState,
    /// Stable final-state particle.
    StableFinalState,
    /// Intermediate generator bookkeeping entry.
    IntermediateState,
    /// Decayed before leaving the nucleus.
    DecayedState,
    /// Nucleon correlated with the struck one.
    CorrelatedNucleon,
    /// Hadron inside the nucleus, before final-state interactions.
    HadronInTheNucleus,
    /// Anything the classification does not model.
    #[default]
    #[serde(other)]
    Other,
}

/// Kinematic state of the incoming neutrino or outgoing lepton.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct McStateVector {
    /// PDG code.
    pub pdg: i32,
    /// Energy \[GeV\].
    pub energy: f32,
    /// Four-momentum \[GeV\].
    pub momentum: LorentzVector,
    /// Position \[cm\].
    pub position: Vector3,
    /// Time \[ns\].
    pub time: f32,
}

/// Neutrino-level kinematics of one truth interaction.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct McNeutrino {
    /// Incoming neutrino state.
    pub nu: McStateVector,
    /// Outgoing lepton state.
    pub lepton: McStateVector,
    /// Current type: 0 = charged current, 1 = neutral current.
    pub ccnc: u8,
    /// Scattering-mode code.
    pub mode: i32,
    /// Hadronic invariant mass W \[GeV\].
    pub w: f32,
    /// Squared four-momentum transfer \[GeV^2\].
    pub q2: f32,
    /// Bjorken x.
    pub x: f32,
    /// Inelasticity y.
    pub y: f32,
}

/// One particle in the generator truth record.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct McParticle {
    /// PDG code.
    pub pdg: i32,
    /// Tracking identifier.
    pub track_id: i32,
    /// Generator status.
    pub status: McStatus,
    /// Production time \[ns\].
    pub time: f32,
    /// Four-momentum \[GeV\].
    pub momentum: LorentzVector,
    /// Start position \[cm\].
    pub start: Vector3,
    /// End position \[cm\].
    pub end: Vector3,
    /// Mother index in the generator numbering.
    pub mother: i32,
    /// Daughter indices in the generator numbering.
    pub daughters: Vec<i32>,
}

/// Generator provenance attached to a truth record.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct GeneratorInfo {
    /// Which generator produced the interaction.
    pub generator: GeneratorId,
    /// Dotted version string, e.g. `"3.2.1"`.
    pub version: String,
    /// Free-form generator configuration; the tune lives under `"tune"`.
    pub config: BTreeMap<String, String>,
}

/// Generator truth for one interaction.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct McTruth {
    /// Neutrino-level kinematics.
    pub neutrino: McNeutrino,
    /// Full generator particle list (all statuses).
    pub particles: Vec<McParticle>,
    /// Generator provenance.
    pub generator: GeneratorInfo,
}

/// Generator-specific truth for one interaction.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct GTruth {
    /// Target nucleus PDG code.
    pub tgt_pdg: i32,
    /// Struck nucleon PDG code.
    pub hit_nuc_pdg: i32,
    /// Kinematic t \[GeV^2\].
    pub gt: f32,
    /// Charm production flag.
    pub is_charm: bool,
    /// Sea-quark scattering flag.
    pub is_seaquark: bool,
    /// Resonance number.
    pub res_num: i32,
    /// Cross section for this event kinematics.
    pub xsec: f32,
    /// Generator event weight.
    pub weight: f32,
}

/// Flux record for one interaction.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct McFlux {
    /// Neutrino PDG code at the flux parent.
    pub ntype: i32,
}

/// One reconstructed particle from the pattern-recognition producer, with
/// its associated-vertex collection already resolved.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PfParticle {
    /// Identifier within the hierarchy.
    pub id: u32,
    /// Hypothesized PDG code.
    pub pdg: i32,
    /// Whether this particle is a primary of the hierarchy.
    pub is_primary: bool,
    /// Associated reconstructed vertices.
    pub vertices: Vec<Vector3>,
}

/// Flavor-classifier output vector.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CvnOutput {
    /// Antineutrino probability.
    pub antinu: f32,
    /// Electron-neutrino probability.
    pub nue: f32,
    /// Muon-neutrino probability.
    pub numu: f32,
    /// Tau-neutrino probability.
    pub nutau: f32,
    /// Neutral-current probability.
    pub nc: f32,
    /// 0/1/2/N proton-count probabilities.
    pub protons: [f32; 4],
    /// 0/1/2/N charged-pion-count probabilities.
    pub chgpi: [f32; 4],
    /// 0/1/2/N neutral-pion-count probabilities.
    pub pizero: [f32; 4],
    /// 0/1/2/N neutron-count probabilities.
    pub neutron: [f32; 4],
}

/// Energy-regression output vector; the estimate of record is `output[0]`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RegCnnOutput {
    /// Raw network outputs \[GeV\].
    pub output: Vec<f32>,
}

/// Exposure summary delivered at a subrun boundary.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SubrunSummary {
    /// Run number.
    pub run: u32,
    /// Subrun number.
    pub subrun: u32,
    /// Protons on target for this subrun, if the producer reported one.
    pub totpot: Option<f64>,
}

/// Everything the pipeline may consume for one detector event.
///
/// `mctruth`, `gtruth`, `flux` and `ghep` are index-aligned; that alignment
/// is an input precondition and is not re-validated here. Reconstruction
/// products are keyed by producer label and all optional.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct EventInputs {
    /// Event identifiers.
    pub id: EventId,
    /// Generator truth records, if the producer ran.
    pub mctruth: Option<Vec<McTruth>>,
    /// Generator-specific truth records, if the producer ran.
    pub gtruth: Option<Vec<GTruth>>,
    /// Flux records.
    pub flux: Vec<McFlux>,
    /// Raw generator event records, index-aligned with `mctruth`. Treated
    /// as opaque payloads; a missing entry is fatal for that interaction.
    pub ghep: Vec<serde_json::Value>,
    /// Reconstructed-particle hierarchies by producer label.
    pub reco: BTreeMap<String, Vec<PfParticle>>,
    /// Flavor-classifier products by producer label.
    pub cvn: BTreeMap<String, Vec<CvnOutput>>,
    /// Energy-regression products by producer label.
    pub energy: BTreeMap<String, Vec<RegCnnOutput>>,
}

/// One element of the pipeline input stream.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Frame {
    /// Subrun boundary with its exposure summary.
    Subrun(SubrunSummary),
    /// One detector event.
    Event(Box<EventInputs>),
}
