//! Flattened columnar mirror of [`StandardRecord`].
//!
//! The flat form removes variable-cardinality nesting: every leaf is either
//! a scalar or a flat column vector. Ragged boundaries are recovered from
//! explicit count columns — per-interaction particle counts slice the
//! concatenated particle columns, per-particle daughter counts slice the
//! concatenated daughter column, and so on.
//!
//! [`FlatRecord::from_record`] is the only way a flat record is produced:
//! both on-disk representations of an event are derived from the same
//! in-memory [`StandardRecord`], never re-derived independently.

use serde::{Deserialize, Serialize};

use crate::record::StandardRecord;
use crate::reco::InteractionHypothesis;
use crate::truth::TrueParticle;
use crate::types::{Generator, LorentzVector, ParticleProcess, Vector3};

/// Column triple for a [`Vector3`] leaf.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FlatVector3 {
    /// x components.
    pub x: Vec<f32>,
    /// y components.
    pub y: Vec<f32>,
    /// z components.
    pub z: Vec<f32>,
}

impl FlatVector3 {
    fn push(&mut self, v: &Vector3) {
        self.x.push(v.x);
        self.y.push(v.y);
        self.z.push(v.z);
    }
}

/// Column triple for an optional [`Vector3`] leaf; `None` rows carry null.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FlatOptVector3 {
    /// x components.
    pub x: Vec<Option<f32>>,
    /// y components.
    pub y: Vec<Option<f32>>,
    /// z components.
    pub z: Vec<Option<f32>>,
}

impl FlatOptVector3 {
    fn push(&mut self, v: Option<&Vector3>) {
        self.x.push(v.map(|v| v.x));
        self.y.push(v.map(|v| v.y));
        self.z.push(v.map(|v| v.z));
    }
}

/// Column quadruple for a [`LorentzVector`] leaf.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FlatLorentz {
    /// px components.
    pub px: Vec<f32>,
    /// py components.
    pub py: Vec<f32>,
    /// pz components.
    pub pz: Vec<f32>,
    /// Energies.
    pub e: Vec<f32>,
}

impl FlatLorentz {
    fn push(&mut self, v: &LorentzVector) {
        self.px.push(v.px);
        self.py.push(v.py);
        self.pz.push(v.pz);
        self.e.push(v.e);
    }
}

/// Columns for a true-particle sequence, concatenated across interactions.
///
/// The owning record's per-interaction counts (`nprim`/`nprefsi`) give the
/// boundaries between interactions; `ndaughters` gives the boundaries in
/// the concatenated `daughters` column.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FlatParticleColumns {
    /// PDG codes.
    pub pdg: Vec<i32>,
    /// Tracking identifiers.
    pub g4id: Vec<i32>,
    /// Owning interaction identifiers.
    pub interaction_id: Vec<i64>,
    /// Production times.
    pub time: Vec<f32>,
    /// Four-momenta.
    pub p: FlatLorentz,
    /// Start positions.
    pub start_pos: FlatVector3,
    /// End positions.
    pub end_pos: FlatVector3,
    /// Mother indices (generator numbering).
    pub parent: Vec<i32>,
    /// Daughter counts per particle.
    pub ndaughters: Vec<u32>,
    /// Daughter indices, concatenated across particles.
    pub daughters: Vec<i32>,
    /// Creation process tags.
    pub start_process: Vec<ParticleProcess>,
    /// Destruction process tags.
    pub end_process: Vec<ParticleProcess>,
}

impl FlatParticleColumns {
    fn push(&mut self, part: &TrueParticle) {
        self.pdg.push(part.pdg);
        self.g4id.push(part.g4id);
        self.interaction_id.push(part.interaction_id);
        self.time.push(part.time);
        self.p.push(&part.p);
        self.start_pos.push(&part.start_pos);
        self.end_pos.push(&part.end_pos);
        self.parent.push(part.parent);
        self.ndaughters.push(part.daughters.len() as u32);
        self.daughters.extend_from_slice(&part.daughters);
        self.start_process.push(part.start_process);
        self.end_process.push(part.end_process);
    }
}

/// Flattened truth branch. Per-interaction columns have length `nnu`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FlatTruth {
    /// Number of true interactions.
    pub nnu: u32,
    /// Sequential interaction identifiers.
    pub id: Vec<i64>,
    /// Side-table indices (or the sentinel).
    pub genie_idx: Vec<i64>,
    /// Neutrino PDG codes.
    pub pdg: Vec<i32>,
    /// Flux-parent PDG codes.
    pub pdgorig: Vec<i32>,
    /// Charged-current flags.
    pub iscc: Vec<bool>,
    /// Scattering-mode codes.
    pub mode: Vec<i32>,
    /// Target PDG codes.
    pub target_pdg: Vec<i32>,
    /// Struck-nucleon PDG codes.
    pub hitnuc: Vec<i32>,
    /// Neutrino energies.
    pub e: Vec<f32>,
    /// Interaction vertices.
    pub vtx: FlatVector3,
    /// Interaction times.
    pub time: Vec<f32>,
    /// Neutrino three-momenta.
    pub momentum: FlatVector3,
    /// Hadronic invariant masses.
    pub w: Vec<f32>,
    /// Squared four-momentum transfers.
    pub q2: Vec<f32>,
    /// Bjorken x values.
    pub bjorken_x: Vec<f32>,
    /// Inelasticity values.
    pub inelasticity: Vec<f32>,
    /// Energy transfers.
    pub q0: Vec<f32>,
    /// Three-momentum-transfer magnitudes.
    pub modq: Vec<f32>,
    /// Kinematic t values.
    pub t: Vec<f32>,
    /// Charm-production flags.
    pub ischarm: Vec<bool>,
    /// Sea-quark flags.
    pub isseaquark: Vec<bool>,
    /// Resonance numbers.
    pub resnum: Vec<i32>,
    /// Cross sections.
    pub xsec: Vec<f32>,
    /// Generator weights.
    pub genweight: Vec<f32>,
    /// Generator identities.
    pub generator: Vec<Generator>,
    /// Version-segment counts per interaction.
    pub gen_version_len: Vec<u32>,
    /// Version segments, concatenated across interactions.
    pub gen_version: Vec<u32>,
    /// Generator tune strings.
    pub gen_config: Vec<String>,
    /// Primary proton counts.
    pub nproton: Vec<u32>,
    /// Primary neutron counts.
    pub nneutron: Vec<u32>,
    /// Primary pi+ counts.
    pub npip: Vec<u32>,
    /// Primary pi- counts.
    pub npim: Vec<u32>,
    /// Primary pi0 counts.
    pub npi0: Vec<u32>,
    /// Primary particle counts (boundaries into `prim`).
    pub nprim: Vec<u32>,
    /// Pre-FSI hadron counts (boundaries into `prefsi`).
    pub nprefsi: Vec<u32>,
    /// Secondary counts (reserved).
    pub nsec: Vec<u32>,
    /// Primary particles, concatenated across interactions.
    pub prim: FlatParticleColumns,
    /// Pre-FSI hadrons, concatenated across interactions.
    pub prefsi: FlatParticleColumns,
}

/// Flavor-classifier score columns, one row per hypothesis.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FlatCvnColumns {
    /// Antineutrino flags.
    pub isnubar: Vec<bool>,
    /// Electron-neutrino scores.
    pub nue: Vec<f32>,
    /// Muon-neutrino scores.
    pub numu: Vec<f32>,
    /// Tau-neutrino scores.
    pub nutau: Vec<f32>,
    /// Neutral-current scores.
    pub nc: Vec<f32>,
    /// 0-proton scores.
    pub protons0: Vec<f32>,
    /// 1-proton scores.
    pub protons1: Vec<f32>,
    /// 2-proton scores.
    pub protons2: Vec<f32>,
    /// >2-proton scores.
    pub protons_n: Vec<f32>,
    /// 0 charged-pion scores.
    pub chgpi0: Vec<f32>,
    /// 1 charged-pion scores.
    pub chgpi1: Vec<f32>,
    /// 2 charged-pion scores.
    pub chgpi2: Vec<f32>,
    /// >2 charged-pion scores.
    pub chgpi_n: Vec<f32>,
    /// 0 neutral-pion scores.
    pub pizero0: Vec<f32>,
    /// 1 neutral-pion scores.
    pub pizero1: Vec<f32>,
    /// 2 neutral-pion scores.
    pub pizero2: Vec<f32>,
    /// >2 neutral-pion scores.
    pub pizero_n: Vec<f32>,
    /// 0-neutron scores.
    pub neutron0: Vec<f32>,
    /// 1-neutron scores.
    pub neutron1: Vec<f32>,
    /// 2-neutron scores.
    pub neutron2: Vec<f32>,
    /// >2-neutron scores.
    pub neutron_n: Vec<f32>,
}

/// Columns for one hypothesis sequence (shared by all reco sources).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FlatHypothesisColumns {
    /// Reconstructed vertices (null where not uniquely determined).
    pub vtx: FlatOptVector3,
    /// Classifier scores.
    pub cvn: FlatCvnColumns,
    /// Regression energy estimates.
    pub regcnn: Vec<f32>,
    /// Reconstructed-particle counts per hypothesis.
    pub nparticles: Vec<u32>,
    /// Reconstructed-particle PDG codes, concatenated.
    pub part_pdg: Vec<i32>,
    /// Reconstructed-particle four-momenta, concatenated.
    pub part_p: FlatLorentz,
}

impl FlatHypothesisColumns {
    fn push(&mut self, hyp: &InteractionHypothesis) {
        self.vtx.push(hyp.vtx.as_ref());
        let cvn = &hyp.nuhyp.cvn;
        self.cvn.isnubar.push(cvn.isnubar);
        self.cvn.nue.push(cvn.nue);
        self.cvn.numu.push(cvn.numu);
        self.cvn.nutau.push(cvn.nutau);
        self.cvn.nc.push(cvn.nc);
        self.cvn.protons0.push(cvn.protons0);
        self.cvn.protons1.push(cvn.protons1);
        self.cvn.protons2.push(cvn.protons2);
        self.cvn.protons_n.push(cvn.protons_n);
        self.cvn.chgpi0.push(cvn.chgpi0);
        self.cvn.chgpi1.push(cvn.chgpi1);
        self.cvn.chgpi2.push(cvn.chgpi2);
        self.cvn.chgpi_n.push(cvn.chgpi_n);
        self.cvn.pizero0.push(cvn.pizero0);
        self.cvn.pizero1.push(cvn.pizero1);
        self.cvn.pizero2.push(cvn.pizero2);
        self.cvn.pizero_n.push(cvn.pizero_n);
        self.cvn.neutron0.push(cvn.neutron0);
        self.cvn.neutron1.push(cvn.neutron1);
        self.cvn.neutron2.push(cvn.neutron2);
        self.cvn.neutron_n.push(cvn.neutron_n);
        self.regcnn.push(hyp.enu.regcnn);
        self.nparticles.push(hyp.part.nparticles);
        for part in &hyp.part.particles {
            self.part_pdg.push(part.pdg);
            self.part_p.push(&part.p);
        }
    }
}

/// Flattened reconstruction branch.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FlatReco {
    /// Number of pattern-recognition hypotheses.
    pub npandora: u32,
    /// Pattern-recognition hypothesis columns.
    pub pandora: FlatHypothesisColumns,
    /// Number of deep-learning hypotheses.
    pub ndlp: u32,
    /// Deep-learning hypothesis columns.
    pub dlp: FlatHypothesisColumns,
}

/// Flattened columnar form of one event record.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FlatRecord {
    /// Output-format version tag.
    pub version: u32,
    /// Detector-configuration enabled flag.
    pub meta_enabled: bool,
    /// Run number.
    pub meta_run: u32,
    /// Subrun number.
    pub meta_subrun: u32,
    /// Event number.
    pub meta_event: u32,
    /// Sub-event index.
    pub meta_subevt: u32,
    /// Simulated-event flag.
    pub beam_ismc: bool,
    /// Flattened truth branch.
    pub mc: FlatTruth,
    /// Flattened reconstruction branch.
    pub common: FlatReco,
}

impl FlatRecord {
    /// Derive the flat columnar form of `rec`.
    ///
    /// This is total: any well-formed [`StandardRecord`] flattens, including
    /// the default-constructed one (all columns empty).
    #[must_use]
    pub fn from_record(rec: &StandardRecord) -> Self {
        let mut flat = Self {
            version: rec.version,
            meta_enabled: rec.meta.fd_hd.enabled,
            meta_run: rec.meta.fd_hd.run,
            meta_subrun: rec.meta.fd_hd.subrun,
            meta_event: rec.meta.fd_hd.event,
            meta_subevt: rec.meta.fd_hd.subevt,
            beam_ismc: rec.beam.ismc,
            ..Self::default()
        };

        flat.mc.nnu = rec.mc.nnu;
        for inter in &rec.mc.nu {
            let mc = &mut flat.mc;
            mc.id.push(inter.id);
            mc.genie_idx.push(inter.genie_idx);
            mc.pdg.push(inter.pdg);
            mc.pdgorig.push(inter.pdgorig);
            mc.iscc.push(inter.iscc);
            mc.mode.push(inter.mode);
            mc.target_pdg.push(inter.target_pdg);
            mc.hitnuc.push(inter.hitnuc);
            mc.e.push(inter.e);
            mc.vtx.push(&inter.vtx);
            mc.time.push(inter.time);
            mc.momentum.push(&inter.momentum);
            mc.w.push(inter.w);
            mc.q2.push(inter.q2);
            mc.bjorken_x.push(inter.bjorken_x);
            mc.inelasticity.push(inter.inelasticity);
            mc.q0.push(inter.q0);
            mc.modq.push(inter.modq);
            mc.t.push(inter.t);
            mc.ischarm.push(inter.ischarm);
            mc.isseaquark.push(inter.isseaquark);
            mc.resnum.push(inter.resnum);
            mc.xsec.push(inter.xsec);
            mc.genweight.push(inter.genweight);
            mc.generator.push(inter.generator);
            mc.gen_version_len.push(inter.gen_version.len() as u32);
            mc.gen_version.extend_from_slice(&inter.gen_version);
            mc.gen_config.push(inter.gen_config.clone());
            mc.nproton.push(inter.nproton);
            mc.nneutron.push(inter.nneutron);
            mc.npip.push(inter.npip);
            mc.npim.push(inter.npim);
            mc.npi0.push(inter.npi0);
            mc.nprim.push(inter.nprim);
            mc.nprefsi.push(inter.nprefsi);
            mc.nsec.push(inter.nsec);
            for part in &inter.prim {
                mc.prim.push(part);
            }
            for part in &inter.prefsi {
                mc.prefsi.push(part);
            }
        }

        flat.common.npandora = rec.common.ixn.npandora;
        for hyp in &rec.common.ixn.pandora {
            flat.common.pandora.push(hyp);
        }
        flat.common.ndlp = rec.common.ixn.ndlp;
        for hyp in &rec.common.ixn.dlp {
            flat.common.dlp.push(hyp);
        }

        flat
    }
}

impl From<&StandardRecord> for FlatRecord {
    fn from(rec: &StandardRecord) -> Self {
        Self::from_record(rec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::StandardRecord;
    use crate::reco::InteractionHypothesis;
    use crate::truth::{TrueInteraction, TrueParticle};
    use crate::types::SCHEMA_VERSION;

    fn particle(pdg: i32, daughters: Vec<i32>) -> TrueParticle {
        TrueParticle {
            pdg,
            daughters,
            ..TrueParticle::default()
        }
    }

    #[test]
    fn default_record_flattens_to_empty_columns() {
        let flat = FlatRecord::from_record(&StandardRecord::default());
        assert_eq!(flat.version, SCHEMA_VERSION);
        assert_eq!(flat.mc.nnu, 0);
        assert!(flat.mc.e.is_empty());
        assert!(flat.mc.prim.pdg.is_empty());
        assert!(flat.common.pandora.regcnn.is_empty());
    }

    #[test]
    fn particle_columns_concatenate_across_interactions() {
        let mut rec = StandardRecord::default();

        let mut first = TrueInteraction {
            id: 0,
            e: 1.5,
            ..TrueInteraction::default()
        };
        first.prim.push(particle(2212, vec![3, 4]));
        first.prim.push(particle(211, vec![]));
        first.nprim = 2;

        let mut second = TrueInteraction {
            id: 1,
            e: 2.5,
            ..TrueInteraction::default()
        };
        second.prim.push(particle(2112, vec![7]));
        second.nprim = 1;
        second.gen_version = vec![3, 2, 1];

        rec.mc.nu = vec![first, second];
        rec.mc.nnu = 2;

        let flat = FlatRecord::from_record(&rec);
        assert_eq!(flat.mc.e, vec![1.5, 2.5]);
        assert_eq!(flat.mc.nprim, vec![2, 1]);
        assert_eq!(flat.mc.prim.pdg, vec![2212, 211, 2112]);
        assert_eq!(flat.mc.prim.ndaughters, vec![2, 0, 1]);
        assert_eq!(flat.mc.prim.daughters, vec![3, 4, 7]);
        assert_eq!(flat.mc.gen_version_len, vec![0, 3]);
        assert_eq!(flat.mc.gen_version, vec![3, 2, 1]);
    }

    #[test]
    fn optional_vertex_flattens_to_null_rows() {
        let mut rec = StandardRecord::default();
        rec.common.ixn.pandora.push(InteractionHypothesis {
            vtx: Some(crate::types::Vector3::new(1.0, 2.0, 3.0)),
            ..InteractionHypothesis::default()
        });
        rec.common.ixn.pandora.push(InteractionHypothesis::default());
        rec.common.ixn.npandora = 2;

        let flat = FlatRecord::from_record(&rec);
        assert_eq!(flat.common.pandora.vtx.x, vec![Some(1.0), None]);
        assert_eq!(flat.common.pandora.vtx.z, vec![Some(3.0), None]);
    }
}
