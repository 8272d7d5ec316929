use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

/// Spindle - thread lifecycle demos
#[derive(Parser)]
#[command(name = "spindle")]
#[command(about = "Spawn worker threads and watch what joining (or not) does to their output")]
#[command(version)]
struct Cli {
    /// Defaults to `chaos` when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Two joined workers with randomized CPU-bound work between steps
    Chaos {
        /// Fix the busy-work seed for reproducible pacing
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Two detached workers; main exits without waiting for them
    NoJoin,
    /// Run both workers one after another on the main thread and report the time
    Sequential,
    /// Run both workers on joined threads and report the time
    Concurrent,
    /// Poll a running worker for liveness, then join it
    Check,
    /// Execute a YAML run file
    Run {
        /// Path to the run file
        file: PathBuf,
        /// Override the seed from the run file
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Chaos { seed: None }) {
        Commands::Chaos { seed } => commands::chaos::execute(seed),
        Commands::NoJoin => commands::no_join::execute(),
        Commands::Sequential => commands::sequential::execute(),
        Commands::Concurrent => commands::concurrent::execute(),
        Commands::Check => commands::check::execute(),
        Commands::Run { file, seed } => commands::run::execute(&file, seed),
    }
}
