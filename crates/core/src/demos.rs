//! Preset workers and run configurations for the bundled demos
//!
//! Every demo uses the same pair of workers: one counting `Number: 0..4`,
//! one spelling `Letter: a..e`. The presets differ only in pacing and in
//! whether the workers are joined.

use std::time::Duration;

use crate::execution::runner::{RunConfig, TaskRunner};
use crate::execution::worker::{WorkerSpec, Workload};
use crate::results::RunResult;
use crate::types::SpindleResult;

pub const DEMO_STEPS: usize = 5;
pub const DEMO_LETTERS: &str = "abcde";

/// Base busy-work iterations per step in the chaos demo
pub const CHAOS_WORK_BASE: u64 = 1_000_000;
/// Random extra iterations per step in the chaos demo
pub const CHAOS_WORK_VARIANCE: u64 = 1_000_000;

pub const PACED_STEP_DELAY: Duration = Duration::from_secs(1);
pub const CHECK_STEP_DELAY: Duration = Duration::from_millis(500);

/// The numbers worker (index 0) and the letters worker (index 1)
pub fn demo_workers() -> Vec<WorkerSpec> {
    vec![
        WorkerSpec::numbers(0, DEMO_STEPS),
        WorkerSpec::letters(1, DEMO_LETTERS),
    ]
}

/// A single worker printing `Worker: 0..4`, used for liveness polling
pub fn check_worker() -> WorkerSpec {
    WorkerSpec::new(0, (0..DEMO_STEPS).map(|i| format!("Worker: {}", i)))
}

/// Joined workers with randomized CPU-bound work between steps
pub fn chaos_config(seed: Option<u64>) -> RunConfig {
    RunConfig::joined()
        .with_workload(Workload::new(CHAOS_WORK_BASE, CHAOS_WORK_VARIANCE))
        .with_seed(seed)
}

/// Detached workers sleeping between steps; most of their output is lost when
/// the process exits
pub fn no_join_config() -> RunConfig {
    RunConfig::detached().with_step_delay(PACED_STEP_DELAY)
}

/// Joined workers sleeping a fixed second between steps
pub fn paced_config() -> RunConfig {
    RunConfig::joined().with_step_delay(PACED_STEP_DELAY)
}

pub fn check_config() -> RunConfig {
    RunConfig::joined().with_step_delay(CHECK_STEP_DELAY)
}

/// Run the demo workers to stdout with the given configuration
pub fn run_demo(config: RunConfig) -> SpindleResult<RunResult> {
    TaskRunner::new(config).run(demo_workers())
}
