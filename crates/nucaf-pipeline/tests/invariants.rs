//! End-to-end invariants of the record-construction pipeline.
//!
//! These run whole synthetic jobs through the real sink and read every
//! output stream back, treating:
//! - the nested stream as authoritative for record content, and
//! - the flat stream and side table as derived views that must stay in
//!   lockstep with it.

use proptest::prelude::*;
use tempfile::TempDir;

use nucaf_pipeline::event::Frame;
use nucaf_pipeline::generator::{generate_frames, SimConfig};
use nucaf_pipeline::pipeline::{CafMaker, MakerConfig};
use nucaf_pipeline::sidetable::SideTableEntry;
use nucaf_pipeline::sink::{OutputSink, SinkConfig};
use nucaf_schema::io::JsonlReader;
use nucaf_schema::{FlatRecord, RunSummary, StandardRecord};

struct JobOutput {
    frames: Vec<Frame>,
    nested: Vec<StandardRecord>,
    flat: Vec<FlatRecord>,
    side_table: Vec<SideTableEntry>,
    summary: RunSummary,
}

/// Run one synthetic job end to end and read every output back.
fn run_job(cfg: &SimConfig) -> anyhow::Result<JobOutput> {
    let dir = TempDir::new()?;
    let frames = generate_frames(cfg);

    let sink = OutputSink::open(&SinkConfig {
        caf_path: Some(dir.path().join("caf.jsonl")),
        flat_path: Some(dir.path().join("flatcaf.jsonl")),
        genie_path: Some(dir.path().join("genie.jsonl")),
        summary_path: dir.path().join("summary.json"),
    })?;
    let mut maker = CafMaker::new(MakerConfig::default(), sink);
    for frame in &frames {
        maker.process_frame(frame)?;
    }
    let summary = maker.finish()?;

    let nested = JsonlReader::open(dir.path().join("caf.jsonl"))?
        .collect::<anyhow::Result<Vec<StandardRecord>>>()?;
    let flat = JsonlReader::open(dir.path().join("flatcaf.jsonl"))?
        .collect::<anyhow::Result<Vec<FlatRecord>>>()?;
    let side_table = JsonlReader::open(dir.path().join("genie.jsonl"))?
        .collect::<anyhow::Result<Vec<SideTableEntry>>>()?;

    Ok(JobOutput {
        frames,
        nested,
        flat,
        side_table,
        summary,
    })
}

fn assert_job_invariants(job: &JobOutput) {
    let n_events = job
        .frames
        .iter()
        .filter(|f| matches!(f, Frame::Event(_)))
        .count();
    assert_eq!(job.nested.len(), n_events, "no synthetic event is dropped");
    assert_eq!(job.flat.len(), n_events);

    // Count fields equal their sequence lengths; species counters are
    // consistent with the classification.
    for rec in &job.nested {
        assert_eq!(rec.mc.nnu as usize, rec.mc.nu.len());
        assert_eq!(rec.common.ixn.npandora as usize, rec.common.ixn.pandora.len());
        assert_eq!(rec.common.ixn.ndlp as usize, rec.common.ixn.dlp.len());
        for inter in &rec.mc.nu {
            let species =
                inter.nproton + inter.nneutron + inter.npip + inter.npim + inter.npi0;
            assert!(species <= inter.nprim);
            assert_eq!(inter.nprim as usize, inter.prim.len());
            assert_eq!(inter.nprefsi as usize, inter.prefsi.len());
            assert_eq!(inter.nsec, 0);
            for part in inter.prim.iter().chain(&inter.prefsi) {
                assert_eq!(part.interaction_id, inter.id);
            }
        }
    }

    // Side-table indices equal append order across the whole job, and the
    // table length equals the total number of interactions.
    let mut expected_idx = 0i64;
    for rec in &job.nested {
        for inter in &rec.mc.nu {
            assert_eq!(inter.genie_idx, expected_idx);
            expected_idx += 1;
        }
    }
    assert_eq!(job.side_table.len() as i64, expected_idx);
    for (line, entry) in job.side_table.iter().enumerate() {
        assert_eq!(entry.idx, line as u64);
    }

    // The flat stream is exactly the flattening of the nested stream.
    for (nested, flat) in job.nested.iter().zip(&job.flat) {
        assert_eq!(&FlatRecord::from_record(nested), flat);
    }

    // The summary exposure is the sum of the reported subrun exposures.
    let expected_pot: f64 = job
        .frames
        .iter()
        .filter_map(|f| match f {
            Frame::Subrun(s) => s.totpot,
            Frame::Event(_) => None,
        })
        .sum();
    assert!((job.summary.pot - expected_pot).abs() < 1e-3);
}

#[test]
fn default_synthetic_job_upholds_all_invariants() {
    let job = run_job(&SimConfig::default()).unwrap();
    assert_job_invariants(&job);
}

#[test]
fn single_subrun_empty_job_produces_only_a_summary() {
    let job = run_job(&SimConfig {
        events: 0,
        subruns: 1,
        ..SimConfig::default()
    })
    .unwrap();
    assert!(job.nested.is_empty());
    assert!(job.flat.is_empty());
    assert!(job.side_table.is_empty());
    assert_eq!(job.summary.subrun, 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn invariants_hold_for_arbitrary_seeds(seed in any::<u64>()) {
        let job = run_job(&SimConfig {
            events: 8,
            subruns: 2,
            max_interactions: 3,
            seed,
        }).unwrap();
        assert_job_invariants(&job);
    }
}
