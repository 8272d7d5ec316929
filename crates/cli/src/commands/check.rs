use std::thread;

use anyhow::Result;
use spindle_core::demos;
use spindle_core::TaskRunner;

use super::status;

pub fn execute() -> Result<()> {
    status("Start.");

    let worker = demos::check_worker();
    let index = worker.index;
    let handle = TaskRunner::new(demos::check_config())
        .spawn(vec![worker])
        .map_err(|e| anyhow::anyhow!("Failed to start worker: {}", e))?;

    for check in 0..demos::DEMO_STEPS {
        status(&format!("Check {}", check));
        if handle.is_alive(index) == Some(true) {
            status("Worker thread is alive");
        }
        thread::sleep(demos::CHECK_STEP_DELAY);
    }

    handle
        .join()
        .map_err(|e| anyhow::anyhow!("Worker did not finish cleanly: {}", e))?;

    status("Done.");
    Ok(())
}
