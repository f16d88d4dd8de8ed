use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use macdft_algos::{
    DetectionAlgorithm, FiveStageAlgorithm, FourStageAlgorithm, MajorityDetector,
    ParityDetector, WeightedSumDetector,
};
use macdft_engine::{report, EngineConfig, TestEngine};
use macdft_faults::BridgeVariant;

/// MACDFT - directed-test fault coverage for two-row MAC arrays
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a fault campaign
    Run {
        /// Weight bit width of each row
        #[arg(short, long, default_value = "6")]
        bit_width: usize,

        /// Detection algorithm to drive
        #[arg(short, long, default_value = "five-stage")]
        algorithm: Algorithm,

        /// Bridge variant indices to enumerate (comma separated, default all)
        #[arg(long, value_delimiter = ',')]
        bridge_variants: Option<Vec<u8>>,

        /// Write full campaign results as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// List the fault targets a campaign would enumerate
    Faults {
        /// Weight bit width of each row
        #[arg(short, long, default_value = "6")]
        bit_width: usize,

        /// Bridge variant indices to enumerate (comma separated, default all)
        #[arg(long, value_delimiter = ',')]
        bridge_variants: Option<Vec<u8>>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    /// Four stuck-at probes plus a bridging sweep
    FiveStage,
    /// Stuck-at probes only
    FourStage,
    /// Single-shot weighted-sum comparison
    WeightedSum,
    /// Single-shot parity comparison
    Parity,
    /// Single-shot majority vote over sum bits
    Majority,
}

impl Algorithm {
    fn build(&self, bit_width: usize) -> Box<dyn DetectionAlgorithm> {
        match self {
            Algorithm::FiveStage => Box::new(FiveStageAlgorithm::new(bit_width)),
            Algorithm::FourStage => Box::new(FourStageAlgorithm::new(bit_width)),
            Algorithm::WeightedSum => Box::new(WeightedSumDetector::new(bit_width)),
            Algorithm::Parity => Box::new(ParityDetector::new(bit_width)),
            Algorithm::Majority => Box::new(MajorityDetector::new(bit_width)),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt().with_env_filter(log_level).init();

    match cli.command {
        Commands::Run {
            bit_width,
            algorithm,
            bridge_variants,
            json,
        } => {
            let config = campaign_config(bit_width, bridge_variants)?;
            run_campaign(config, algorithm, json.as_deref(), cli.verbose)?;
        }

        Commands::Faults {
            bit_width,
            bridge_variants,
        } => {
            let config = campaign_config(bit_width, bridge_variants)?;
            list_faults(&config);
        }
    }

    Ok(())
}

/// Resolve CLI arguments into a validated engine configuration
fn campaign_config(bit_width: usize, bridge_variants: Option<Vec<u8>>) -> Result<EngineConfig> {
    let variants = match bridge_variants {
        Some(indices) => indices
            .into_iter()
            .map(BridgeVariant::from_index)
            .collect::<macdft_faults::Result<Vec<_>>>()
            .context("invalid bridge variant list")?,
        None => BridgeVariant::ALL.to_vec(),
    };

    EngineConfig::new(bit_width, variants).context("invalid campaign configuration")
}

fn run_campaign(
    config: EngineConfig,
    algorithm: Algorithm,
    json: Option<&std::path::Path>,
    verbose: u8,
) -> Result<()> {
    let mut algo = algorithm.build(config.bit_width);
    let engine = TestEngine::new(config);

    let results = engine
        .run(algo.as_mut())
        .context("fault campaign failed")?;

    report::print_summary(&results);
    if verbose > 0 {
        report::print_fault_outcomes(&results);
    }

    if let Some(path) = json {
        let payload = report::to_json(&results).context("serializing campaign results")?;
        fs::write(path, payload)
            .with_context(|| format!("writing results to {}", path.display()))?;
        info!(path = %path.display(), "campaign results written");
    }

    Ok(())
}

fn list_faults(config: &EngineConfig) {
    let faults = macdft_faults::generate_fault_list(config.bit_width, &config.bridge_variants);
    println!("Fault list ({} targets):", faults.len());
    for fault in &faults {
        println!("  {fault}");
    }
}
