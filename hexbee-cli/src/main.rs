//! HEXBEE CLI - Command-line interface
//!
//! Commands:
//! - match: Play engine-vs-engine games
//! - benchmark: Time move requests across search depths

mod benchmark;
mod match_cmd;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hexbee")]
#[command(about = "Hex move-selection engine")]
struct Cli {
    /// Random seed for openings (omit for entropy)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play engine-vs-engine games
    Match(match_cmd::MatchArgs),
    /// Time move requests at increasing depth
    Benchmark(benchmark::BenchmarkArgs),
}

fn main() -> anyhow::Result<()> {
    // Honours RUST_LOG through the env-filter feature
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Match(args) => match_cmd::run(args, cli.seed),
        Commands::Benchmark(args) => benchmark::run(args, cli.seed),
    }
}
