//! Reco mapper: builds interaction hypotheses from reconstruction outputs.
//!
//! One hypothesis is produced per primary-tagged reconstructed particle.
//! Every sub-fill (vertex, flavor scores, energy estimate, particle list)
//! degrades independently: an absent or empty product leaves its sub-branch
//! at the default value and never blocks the others.

use nucaf_schema::{
    CommonRecoBranch, CvnScoreBranch, InteractionHypothesis, NeutrinoEnergyBranch,
    RecoParticlesBranch,
};

use crate::event::EventInputs;
use crate::pipeline::MakerConfig;

/// Build the common reconstruction branch for one event.
pub fn fill_reco(branch: &mut CommonRecoBranch, ev: &EventInputs, cfg: &MakerConfig) {
    let ixn = &mut branch.ixn;

    if let Some(particles) = ev.reco.get(&cfg.vertex_label) {
        for particle in particles.iter().filter(|p| p.is_primary) {
            let mut hyp = InteractionHypothesis::default();

            // The vertex is set only when it is uniquely determined; zero
            // or several candidates leave it unset.
            if let [vtx] = particle.vertices.as_slice() {
                hyp.vtx = Some(*vtx);
            }

            // The classifier applies to the whole event, so every
            // hypothesis carries the same scores.
            fill_cvn(&mut hyp.nuhyp.cvn, ev, &cfg.cvn_label);
            fill_energy(&mut hyp.enu, ev, &cfg.regcnn_label);
            fill_reco_particles(&mut hyp.part);

            ixn.pandora.push(hyp);
        }
    }

    ixn.npandora = ixn.pandora.len() as u32;
    ixn.ndlp = ixn.dlp.len() as u32;
}

/// Copy classifier scores from the labeled product, if present and
/// non-empty. Absence leaves the branch default-constructed.
fn fill_cvn(cvn: &mut CvnScoreBranch, ev: &EventInputs, label: &str) {
    let Some(scores) = ev.cvn.get(label).and_then(|v| v.first()) else {
        return;
    };

    cvn.isnubar = scores.antinu > 0.5;
    cvn.nue = scores.nue;
    cvn.numu = scores.numu;
    cvn.nutau = scores.nutau;
    cvn.nc = scores.nc;

    [cvn.protons0, cvn.protons1, cvn.protons2, cvn.protons_n] = scores.protons;
    [cvn.chgpi0, cvn.chgpi1, cvn.chgpi2, cvn.chgpi_n] = scores.chgpi;
    [cvn.pizero0, cvn.pizero1, cvn.pizero2, cvn.pizero_n] = scores.pizero;
    [cvn.neutron0, cvn.neutron1, cvn.neutron2, cvn.neutron_n] = scores.neutron;
}

/// Copy the first regression estimate from the labeled product, if present
/// and non-empty.
fn fill_energy(enu: &mut NeutrinoEnergyBranch, ev: &EventInputs, label: &str) {
    if let Some(estimate) = ev
        .energy
        .get(label)
        .and_then(|v| v.first())
        .and_then(|r| r.output.first())
    {
        enu.regcnn = *estimate;
    }
}

/// Placeholder: no reconstructed-particle producer is wired up yet.
///
/// TODO: fill from the track/shower products once their labels are part of
/// the configuration surface.
#[allow(clippy::missing_const_for_fn)]
fn fill_reco_particles(_part: &mut RecoParticlesBranch) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{CvnOutput, PfParticle, RegCnnOutput};
    use nucaf_schema::Vector3;

    fn primary_with_vertices(vertices: Vec<Vector3>) -> PfParticle {
        PfParticle {
            id: 0,
            pdg: 14,
            is_primary: true,
            vertices,
        }
    }

    fn event_with_reco(particles: Vec<PfParticle>) -> EventInputs {
        let mut ev = EventInputs::default();
        ev.reco.insert("pandora".to_string(), particles);
        ev
    }

    #[test]
    fn hypothesis_per_primary_even_without_classifier() {
        let ev = event_with_reco(vec![
            primary_with_vertices(vec![]),
            PfParticle {
                is_primary: false,
                ..PfParticle::default()
            },
        ]);

        let mut branch = CommonRecoBranch::default();
        fill_reco(&mut branch, &ev, &MakerConfig::default());

        assert_eq!(branch.ixn.npandora, 1);
        assert_eq!(branch.ixn.pandora.len(), 1);
        // Absent classifier leaves the whole sub-branch default-constructed.
        assert_eq!(branch.ixn.pandora[0].nuhyp.cvn, CvnScoreBranch::default());
        assert_eq!(branch.ixn.ndlp, 0);
    }

    #[test]
    fn vertex_is_set_only_when_unique() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        let ev = event_with_reco(vec![
            primary_with_vertices(vec![]),
            primary_with_vertices(vec![v, Vector3::new(4.0, 5.0, 6.0)]),
            primary_with_vertices(vec![v]),
        ]);

        let mut branch = CommonRecoBranch::default();
        fill_reco(&mut branch, &ev, &MakerConfig::default());

        let hyps = &branch.ixn.pandora;
        assert_eq!(hyps[0].vtx, None);
        assert_eq!(hyps[1].vtx, None);
        assert_eq!(hyps[2].vtx, Some(v));
    }

    #[test]
    fn classifier_scores_are_copied_and_thresholded() {
        let mut ev = event_with_reco(vec![primary_with_vertices(vec![])]);
        ev.cvn.insert(
            "cvn".to_string(),
            vec![CvnOutput {
                antinu: 0.7,
                nue: 0.1,
                numu: 0.8,
                nutau: 0.05,
                nc: 0.05,
                protons: [0.4, 0.3, 0.2, 0.1],
                ..CvnOutput::default()
            }],
        );

        let mut branch = CommonRecoBranch::default();
        fill_reco(&mut branch, &ev, &MakerConfig::default());

        let cvn = &branch.ixn.pandora[0].nuhyp.cvn;
        assert!(cvn.isnubar);
        assert_eq!(cvn.numu, 0.8);
        assert_eq!(cvn.protons1, 0.3);
    }

    #[test]
    fn empty_classifier_product_is_treated_as_absent() {
        let mut ev = event_with_reco(vec![primary_with_vertices(vec![])]);
        ev.cvn.insert("cvn".to_string(), Vec::new());

        let mut branch = CommonRecoBranch::default();
        fill_reco(&mut branch, &ev, &MakerConfig::default());
        assert_eq!(branch.ixn.pandora[0].nuhyp.cvn, CvnScoreBranch::default());
    }

    #[test]
    fn energy_estimate_takes_the_first_output() {
        let mut ev = event_with_reco(vec![primary_with_vertices(vec![])]);
        ev.energy.insert(
            "regcnn".to_string(),
            vec![RegCnnOutput {
                output: vec![2.4, 9.9],
            }],
        );

        let mut branch = CommonRecoBranch::default();
        fill_reco(&mut branch, &ev, &MakerConfig::default());
        assert_eq!(branch.ixn.pandora[0].enu.regcnn, 2.4);
    }

    #[test]
    fn missing_reco_hierarchy_yields_zero_hypotheses() {
        let ev = EventInputs::default();
        let mut branch = CommonRecoBranch::default();
        fill_reco(&mut branch, &ev, &MakerConfig::default());
        assert_eq!(branch.ixn.npandora, 0);
        assert!(branch.ixn.pandora.is_empty());
    }
}
