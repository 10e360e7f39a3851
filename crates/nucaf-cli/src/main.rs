// crates/nucaf-cli/src/main.rs

#![forbid(unsafe_code)]
#![deny(
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo
)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nucaf_pipeline::generator::{generate_frames, SimConfig};
use nucaf_pipeline::io::{stream_frames, write_frames};
use nucaf_pipeline::pipeline::{CafMaker, MakerConfig};
use nucaf_pipeline::sink::{OutputSink, SinkConfig};
use nucaf_schema::io::JsonlReader;
use nucaf_schema::StandardRecord;

#[derive(Parser, Debug)]
#[command(
    name = "nucaf",
    about = "Build unified analysis records from truth and reconstruction products",
    version = env!("CARGO_PKG_VERSION"),
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Generate a deterministic synthetic input frame stream.
    Simulate {
        /// Events per subrun.
        #[arg(long, default_value_t = 16)]
        events: u32,

        /// Number of subruns.
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..))]
        subruns: u32,

        /// Maximum true interactions per event.
        #[arg(long, default_value_t = 3)]
        max_interactions: u32,

        /// RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output path for the frame stream (JSONL).
        #[arg(long, default_value = "frames.jsonl")]
        out: PathBuf,
    },

    /// Run the record-construction pipeline over an input frame stream.
    Convert {
        /// Input frame stream (JSONL).
        #[arg(long)]
        input: PathBuf,

        /// Nested record stream output.
        #[arg(long, default_value = "caf.jsonl")]
        caf: PathBuf,

        /// Flat columnar record stream output.
        #[arg(long, default_value = "flatcaf.jsonl")]
        flat: PathBuf,

        /// Raw-generator-record side table output.
        #[arg(long, default_value = "genie.jsonl")]
        genie: PathBuf,

        /// Run summary output (.json or .cbor).
        #[arg(long, default_value = "summary.json")]
        summary: PathBuf,

        /// Disable the nested record stream.
        #[arg(long, default_value_t = false)]
        no_caf: bool,

        /// Disable the flat columnar stream.
        #[arg(long, default_value_t = false)]
        no_flat: bool,

        /// Flavor-classifier producer label.
        #[arg(long, default_value = "cvn")]
        cvn_label: String,

        /// Energy-regression producer label.
        #[arg(long, default_value = "regcnn")]
        regcnn_label: String,

        /// Pattern-recognition producer label (particles and vertices).
        #[arg(long, default_value = "pandora")]
        vertex_label: String,
    },

    /// Summarize a nested record stream.
    Inspect {
        /// Nested record stream (JSONL).
        #[arg(long)]
        input: PathBuf,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Simulate {
            events,
            subruns,
            max_interactions,
            seed,
            out,
        } => {
            let frames = generate_frames(&SimConfig {
                events,
                subruns,
                max_interactions,
                seed,
            });
            let written = write_frames(&out, &frames)
                .with_context(|| format!("write frames to {}", out.display()))?;
            info!(frames = written, out = %out.display(), "synthetic stream written");
            Ok(())
        }

        Cmd::Convert {
            input,
            caf,
            flat,
            genie,
            summary,
            no_caf,
            no_flat,
            cvn_label,
            regcnn_label,
            vertex_label,
        } => {
            let sink_cfg = SinkConfig {
                caf_path: (!no_caf).then_some(caf),
                flat_path: (!no_flat).then_some(flat),
                genie_path: Some(genie),
                summary_path: summary,
            };
            let maker_cfg = MakerConfig {
                cvn_label,
                regcnn_label,
                vertex_label,
                ..MakerConfig::default()
            };

            let sink = OutputSink::open(&sink_cfg).with_context(|| "open output sink")?;
            let mut maker = CafMaker::new(maker_cfg, sink);

            for frame in
                stream_frames(&input).with_context(|| format!("open {}", input.display()))?
            {
                let frame = frame.with_context(|| "read input frame")?;
                maker.process_frame(&frame)?;
            }

            let written = maker.events_written();
            let dropped = maker.events_dropped();
            let summary = maker.finish().with_context(|| "finalize outputs")?;
            info!(
                events = written,
                dropped,
                pot = summary.pot,
                "conversion finished"
            );
            Ok(())
        }

        Cmd::Inspect { input } => {
            let mut events = 0u64;
            let mut interactions = 0u64;
            let mut hypotheses = 0u64;
            let reader: JsonlReader<StandardRecord> =
                JsonlReader::open(&input).with_context(|| format!("open {}", input.display()))?;
            for rec in reader {
                let rec = rec.with_context(|| "read record")?;
                events += 1;
                interactions += u64::from(rec.mc.nnu);
                hypotheses += u64::from(rec.common.ixn.npandora);
            }
            println!("events:       {events}");
            println!("interactions: {interactions}");
            println!("hypotheses:   {hypotheses}");
            Ok(())
        }
    }
}
