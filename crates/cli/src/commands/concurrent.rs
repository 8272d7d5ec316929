use anyhow::Result;
use spindle_core::demos;
use spindle_core::TaskRunner;

use super::{print_elapsed, status};

pub fn execute() -> Result<()> {
    status("Starting threads...");

    let handle = TaskRunner::new(demos::paced_config())
        .spawn(demos::demo_workers())
        .map_err(|e| anyhow::anyhow!("Failed to start workers: {}", e))?;

    status("Threads started. Waiting for them to finish...");

    let result = handle
        .join()
        .map_err(|e| anyhow::anyhow!("Concurrent run failed: {}", e))?;

    status("Both threads have finished.");
    print_elapsed(result.elapsed);
    Ok(())
}
