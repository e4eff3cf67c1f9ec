//! higgsjets CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod run;
mod source;

use run::{ConfigOverrides, cmd_run, resolve_config};

#[derive(Parser)]
#[command(name = "higgsjets")]
#[command(about = "Fill Higgs pT, jet pT and jet multiplicity histograms from event files")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process event files and write the histograms
    Run {
        /// Output file (pretty JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Input event files (JSON Lines), chained in the given order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Analysis configuration (JSON). Missing keys take default values.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Minimum jet pT
        #[arg(long)]
        jet_pt_min: Option<f64>,

        /// Maximum jet pseudorapidity (one-sided cut)
        #[arg(long, allow_hyphen_values = true)]
        jet_eta_max: Option<f64>,

        /// Number of leading jet-index slots with their own pT histogram
        #[arg(long)]
        jet_slots: Option<usize>,

        /// Particle capacity per record
        #[arg(long)]
        max_particles: Option<usize>,
    },

    /// Print the default analysis configuration as JSON
    DefaultConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            output,
            inputs,
            config,
            jet_pt_min,
            jet_eta_max,
            jet_slots,
            max_particles,
        } => {
            let overrides = ConfigOverrides { jet_pt_min, jet_eta_max, jet_slots, max_particles };
            let cfg = resolve_config(config.as_deref(), &overrides)?;
            cmd_run(&output, &inputs, cfg)
        }
        Commands::DefaultConfig => {
            let cfg = hj_hist::AnalysisConfig::default();
            println!("{}", serde_json::to_string_pretty(&cfg)?);
            Ok(())
        }
    }
}
