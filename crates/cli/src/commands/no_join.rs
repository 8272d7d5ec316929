use anyhow::Result;
use colored::*;
use spindle_core::demos;

use super::status;

pub fn execute() -> Result<()> {
    status("Starting threads...");

    let result = demos::run_demo(demos::no_join_config())
        .map_err(|e| anyhow::anyhow!("Failed to start workers: {}", e))?;

    // The workers are still sleeping between steps. Returning from main ends the
    // process and silently drops whatever they have not printed yet.
    status(&format!(
        "Threads started. Not waiting for {} workers.",
        result.outcomes.len() - result.completed_count()
    ));
    status(&"Exiting; unfinished worker output is lost.".yellow().to_string());

    Ok(())
}
