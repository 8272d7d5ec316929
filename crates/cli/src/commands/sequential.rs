use anyhow::Result;
use spindle_core::demos;
use spindle_core::TaskRunner;

use super::print_elapsed;

pub fn execute() -> Result<()> {
    let runner = TaskRunner::new(demos::paced_config());
    let result = runner
        .run_sequential(demos::demo_workers())
        .map_err(|e| anyhow::anyhow!("Sequential run failed: {}", e))?;

    print_elapsed(result.elapsed);
    Ok(())
}
