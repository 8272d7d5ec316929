use anyhow::Result;
use spindle_core::demos;
use spindle_core::TaskRunner;

use super::status;

pub fn execute(seed: Option<u64>) -> Result<()> {
    status("Starting threads...");

    let runner = TaskRunner::new(demos::chaos_config(seed));
    let handle = runner
        .spawn(demos::demo_workers())
        .map_err(|e| anyhow::anyhow!("Failed to start workers: {}", e))?;

    status("Threads started. Waiting...");

    handle
        .join()
        .map_err(|e| anyhow::anyhow!("Workers did not finish cleanly: {}", e))?;

    status("Both threads have finished.");
    Ok(())
}
