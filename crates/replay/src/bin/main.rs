//! tracesim replay CLI
//!
//! Replays a recorded filesystem trace (or a synthetic workload) through
//! the event scheduler and prints a run report.

use clap::Parser;
use std::path::PathBuf;
use tracesim_replay::{ReplayConfig, ReplayRunner};
use tracesim_types::SimTime;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tracesim-replay")]
#[command(about = "Trace-driven discrete-event replay")]
#[command(version)]
struct Cli {
    /// Trace file to replay
    #[arg(required_unless_present = "synthetic")]
    trace: Option<PathBuf>,

    /// Generate a synthetic workload of this many events instead
    #[arg(long, value_name = "EVENTS", conflicts_with = "trace")]
    synthetic: Option<usize>,

    /// Seed for the synthetic workload
    #[arg(long, default_value = "12345")]
    seed: u64,

    /// Emulation window start, in milliseconds
    #[arg(long, default_value = "0")]
    start_ms: u64,

    /// Emulation window end, in milliseconds (default: unbounded)
    #[arg(long)]
    end_ms: Option<u64>,

    /// Drop out-of-order events with a warning instead of aborting
    #[arg(long)]
    keep_going: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = ReplayConfig::new();
    let start = SimTime::from_millis(cli.start_ms);
    let end = cli
        .end_ms
        .map(SimTime::from_millis)
        .unwrap_or(config.window_end);
    config = config.with_window(start, end);
    if cli.keep_going {
        config = config.keep_going();
    }

    let runner = ReplayRunner::new(config);
    let report = match (&cli.trace, cli.synthetic) {
        (_, Some(count)) => runner.run_synthetic(cli.seed, count)?,
        (Some(path), None) => runner.run_trace_file(path)?,
        (None, None) => unreachable!("clap enforces trace or --synthetic"),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}
