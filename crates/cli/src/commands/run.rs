use std::path::Path;

use anyhow::{Context, Result};
use colored::*;
use spindle_core::configs::run::load_run_config;
use spindle_core::TaskRunner;
use tracing::debug;

use super::print_elapsed;

pub fn execute(file: &Path, seed: Option<u64>) -> Result<()> {
    let run_file = load_run_config(file)
        .with_context(|| format!("Failed to load run file: {}", file.display()))?;
    let workers = run_file
        .worker_specs()
        .with_context(|| format!("Invalid run file: {}", file.display()))?;

    let mut config = run_file.run_config();
    if seed.is_some() {
        config.seed = seed;
    }

    debug!(workers = workers.len(), join = config.join, seed = ?config.seed, "loaded run file");

    let title = run_file.name.as_deref().unwrap_or("run file");
    println!("{} {}", "Running".bold(), title.cyan());
    println!();

    let result = TaskRunner::new(config)
        .run(workers)
        .map_err(|e| anyhow::anyhow!("Failed to run workers: {}", e))?;

    println!();
    if result.all_completed() {
        println!(
            "{} {}",
            "✓".green().bold(),
            format!("All {} workers completed", result.outcomes.len()).green().bold()
        );
    } else {
        println!(
            "{} {}",
            "!".yellow().bold(),
            format!("{} workers not awaited", result.outcomes.len()).yellow()
        );
    }
    print_elapsed(result.elapsed);

    Ok(())
}
