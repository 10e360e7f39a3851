//! Truth mapper: builds the truth branch from generator-truth inputs.
//!
//! One [`TrueInteraction`] is produced per input index. For each one the
//! raw generator record is appended to the side table first, so the
//! returned index can be embedded in the interaction before it joins the
//! branch. Particles are classified by generator status: stable final-state
//! particles land in `prim` (and drive the species counters), pre-FSI
//! hadrons land in `prefsi`, every other status is dropped entirely.

use anyhow::{Context, Result};
use tracing::debug;

use nucaf_schema::{Generator, ParticleProcess, TrueInteraction, TrueParticle, TruthBranch};

use crate::event::{GTruth, GeneratorId, McFlux, McStatus, McTruth};
use crate::sidetable::SideTable;

/// Map the producer-side generator identity onto the output enumeration.
///
/// Total with an explicit default: identities the output format does not
/// model collapse to [`Generator::Unknown`].
#[must_use]
pub const fn map_generator(id: GeneratorId) -> Generator {
    match id {
        GeneratorId::Genie => Generator::Genie,
        GeneratorId::Gibuu => Generator::Gibuu,
        GeneratorId::Neut => Generator::Neut,
        _ => Generator::Unknown,
    }
}

/// Split a dotted generator version string into integer segments.
///
/// `"3.2.1"` becomes `[3, 2, 1]`. Every segment must parse as a
/// non-negative integer; a malformed segment (as in `"3..1"`) is an error.
pub fn parse_gen_version(version: &str) -> Result<Vec<u32>> {
    version
        .split('.')
        .map(|seg| {
            seg.parse::<u32>().with_context(|| {
                format!("parse generator version segment {seg:?} of {version:?}")
            })
        })
        .collect()
}

/// Build the truth branch from index-aligned truth, generator-specific
/// truth, flux and raw-record collections.
///
/// Alignment of the four input sequences is a precondition of the caller
/// and is not re-validated here. Grows the side table by exactly one entry
/// per interaction processed. Errors (a missing raw record, a malformed
/// version string) abort construction of the whole event.
pub fn fill_truth(
    branch: &mut TruthBranch,
    mctruth: &[McTruth],
    gtruth: &[GTruth],
    flux: &[McFlux],
    ghep: &[serde_json::Value],
    table: &mut SideTable,
) -> Result<()> {
    debug!(
        ninteractions = mctruth.len(),
        "mapping generator truth into the record"
    );

    for (i, (mc, gt)) in mctruth.iter().zip(gtruth).enumerate() {
        let raw = ghep
            .get(i)
            .with_context(|| format!("no raw generator record for interaction {i}"))?;

        let mut inter = TrueInteraction {
            id: i as i64,
            ..TrueInteraction::default()
        };
        inter.genie_idx = table
            .append(raw)
            .with_context(|| format!("correlate interaction {i}"))?;

        let nu = &mc.neutrino;
        inter.pdg = nu.nu.pdg;
        inter.pdgorig = flux[i].ntype;
        inter.iscc = nu.ccnc == 0;
        inter.mode = nu.mode;
        inter.target_pdg = gt.tgt_pdg;
        inter.hitnuc = gt.hit_nuc_pdg;

        inter.e = nu.nu.energy;
        inter.vtx = nu.lepton.position;
        inter.time = nu.lepton.time;
        inter.momentum = nu.nu.momentum.vect();
        inter.w = nu.w;
        inter.q2 = nu.q2;
        inter.bjorken_x = nu.x;
        inter.inelasticity = nu.y;

        let q = nu.nu.momentum - nu.lepton.momentum;
        inter.q0 = q.e;
        inter.modq = q.p_mag();
        inter.t = gt.gt;

        inter.ischarm = gt.is_charm;
        inter.isseaquark = gt.is_seaquark;
        inter.resnum = gt.res_num;
        inter.xsec = gt.xsec;
        inter.genweight = gt.weight;

        inter.generator = map_generator(mc.generator.generator);
        inter.gen_version = parse_gen_version(&mc.generator.version)
            .with_context(|| format!("interaction {i}"))?;
        inter.gen_config = mc
            .generator
            .config
            .get("tune")
            .cloned()
            .unwrap_or_default();

        for part in &mc.particles {
            if part.status != McStatus::StableFinalState
                && part.status != McStatus::HadronInTheNucleus
            {
                continue;
            }

            let tp = TrueParticle {
                pdg: part.pdg,
                g4id: part.track_id,
                interaction_id: inter.id,
                time: part.time,
                p: part.momentum,
                start_pos: part.start,
                end_pos: part.end,
                parent: part.mother,
                // Indices refer to the generator numbering, not to
                // positions in the filtered sequences below.
                daughters: part.daughters.clone(),
                start_process: ParticleProcess::Primary,
                end_process: ParticleProcess::Unknown,
            };

            if part.status == McStatus::StableFinalState {
                match tp.pdg {
                    2212 => inter.nproton += 1,
                    2112 => inter.nneutron += 1,
                    211 => inter.npip += 1,
                    -211 => inter.npim += 1,
                    111 => inter.npi0 += 1,
                    _ => {}
                }
                inter.prim.push(tp);
                inter.nprim += 1;
            } else {
                inter.prefsi.push(tp);
                inter.nprefsi += 1;
            }
        }

        branch.nu.push(inter);
    }

    branch.nnu = mctruth.len() as u32;
    Ok(())
}
