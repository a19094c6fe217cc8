//! DRAM controller scheduler CLI.
//!
//! This binary replays a request trace through the controller model. It provides:
//! 1. **Run:** Read a request trace, write the issued command trace, optionally print statistics.
//! 2. **Config:** Print the effective configuration as JSON, as a starting point for `--config`.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dramsched_core::Config;
use dramsched_core::Simulator;
use dramsched_core::common::SimError;
use dramsched_core::trace::{FileTraceSink, TraceFileSource};

#[derive(Parser, Debug)]
#[command(
    name = "dramsched",
    author,
    version,
    about = "Cycle-accurate DRAM controller command scheduler",
    long_about = "Replay a memory request trace through the controller model and record every DRAM command it issues.\n\nExamples:\n  dramsched run -t trace.txt -o dram.txt\n  dramsched run -t trace.txt -o dram.txt --config ddr4.json --stats\n  dramsched config > ddr4.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a request trace and write the command trace.
    Run {
        /// Request trace (`<time> <core> <op> <hex address>` per line).
        #[arg(short, long)]
        trace: PathBuf,

        /// Command trace output file.
        #[arg(short, long, default_value = "dram.txt")]
        output: PathBuf,

        /// JSON configuration file; built-in defaults when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print statistics when the run completes.
        #[arg(long)]
        stats: bool,

        /// Only print these statistics sections (summary, requests, row_buffer, commands).
        #[arg(long, value_delimiter = ',')]
        sections: Vec<String>,

        /// Abort if controller time reaches this many cycles.
        #[arg(long)]
        max_cycles: Option<u64>,
    },

    /// Print the configuration as JSON.
    Config {
        /// Configuration file to validate and echo; defaults when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(?cli, "arguments parsed");
    let result = match cli.command {
        Commands::Run {
            trace,
            output,
            config,
            stats,
            sections,
            max_cycles,
        } => cmd_run(&trace, &output, config, stats, &sections, max_cycles),
        Commands::Config { config } => cmd_config(config),
    };

    if let Err(e) = result {
        eprintln!("[!] FATAL: {e}");
        process::exit(1);
    }
}

fn load_config(path: Option<PathBuf>) -> Result<Config, SimError> {
    match path {
        Some(p) => Ok(Config::from_file(p)?),
        None => Ok(Config::default()),
    }
}

/// Replays `trace` into `output`.
///
/// The output file is created before anything is simulated; failing to create it
/// aborts the run, since there is nowhere to report the schedule.
fn cmd_run(
    trace: &Path,
    output: &Path,
    config: Option<PathBuf>,
    stats: bool,
    sections: &[String],
    max_cycles: Option<u64>,
) -> Result<(), SimError> {
    let config = load_config(config)?;
    let sink = FileTraceSink::create(output)?;
    let source = TraceFileSource::open(trace)?;

    println!(
        "[*] Replaying {} -> {} (queue {}, {}x{} banks)",
        trace.display(),
        output.display(),
        config.queue.capacity,
        config.address_mapping().bank_groups(),
        config.address_mapping().banks_per_group()
    );

    let mut sim = Simulator::new(&config, source, sink);
    let summary = sim.run(max_cycles)?;
    println!(
        "[*] Done: {} requests retired in {} cycles",
        summary.requests_retired,
        summary.elapsed_cycles()
    );
    if stats {
        summary.print_sections(sections);
    }
    Ok(())
}

fn cmd_config(config: Option<PathBuf>) -> Result<(), SimError> {
    let config = load_config(config)?;
    let json = serde_json::to_string_pretty(&config)
        .map_err(|e| SimError::Config(e.into()))?;
    println!("{json}");
    Ok(())
}
