//! Worker definitions and the per-thread worker body
//!
//! A worker walks its steps in declared order: emit the label, burn CPU for a
//! randomized number of iterations, then optionally sleep.

use std::hint::black_box;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::execution::sink::StepSink;
use crate::types::{SpindleError, SpindleResult};

/// Busy-work iterations per step: `base + uniform[0, variance)`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Workload {
    pub base: u64,
    pub variance: u64,
}

impl Workload {
    /// No busy-work at all
    pub const NONE: Self = Self {
        base: 0,
        variance: 0,
    };

    pub fn new(base: u64, variance: u64) -> Self {
        Self { base, variance }
    }

    /// Draw the iteration count for one step
    pub fn iterations<R: Rng>(&self, rng: &mut R) -> u64 {
        if self.variance == 0 {
            return self.base;
        }
        self.base.saturating_add(rng.gen_range(0..self.variance))
    }
}

/// One worker: an ordinal index and the labeled steps it emits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerSpec {
    pub index: usize,
    pub steps: Vec<String>,
    /// Overrides the run-wide workload when set
    pub workload: Option<Workload>,
}

impl WorkerSpec {
    pub fn new<I, S>(index: usize, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            index,
            steps: steps.into_iter().map(Into::into).collect(),
            workload: None,
        }
    }

    /// Steps `Number: 0` through `Number: count - 1`
    pub fn numbers(index: usize, count: usize) -> Self {
        Self::new(index, (0..count).map(|i| format!("Number: {}", i)))
    }

    /// One `Letter: <c>` step per character
    pub fn letters(index: usize, letters: &str) -> Self {
        Self::new(index, letters.chars().map(|c| format!("Letter: {}", c)))
    }

    pub fn with_workload(mut self, workload: Workload) -> Self {
        self.workload = Some(workload);
        self
    }
}

/// Per-worker pacing resolved from the run configuration
#[derive(Debug, Clone, Copy)]
pub(crate) struct Pacing {
    pub workload: Workload,
    pub step_delay: Duration,
    pub seed: u64,
}

/// Seed for worker `index`. Without a fixed run seed the wall clock is mixed in,
/// so workers started together still draw uncorrelated sequences.
pub fn worker_seed(run_seed: Option<u64>, index: usize) -> u64 {
    let base = run_seed.unwrap_or_else(clock_nanos);
    base ^ (index as u64).wrapping_add(1)
}

fn clock_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

/// CPU-bound filler that the optimizer cannot remove
pub fn busy_work(iterations: u64) {
    let mut x = 1.0_f64;
    for _ in 0..iterations {
        x = black_box(x * 1.01);
    }
    black_box(x);
}

/// Body executed on each worker thread (or inline for sequential runs)
pub(crate) fn run_worker(
    spec: &WorkerSpec,
    pacing: Pacing,
    sink: &dyn StepSink,
) -> SpindleResult<()> {
    let mut rng = StdRng::seed_from_u64(pacing.seed);
    let workload = spec.workload.unwrap_or(pacing.workload);

    debug!(worker = spec.index, steps = spec.steps.len(), "worker running");

    for label in &spec.steps {
        if let Err(source) = sink.emit(spec.index, label) {
            warn!(worker = spec.index, error = %source, "emit failed, abandoning remaining steps");
            return Err(SpindleError::Emit {
                index: spec.index,
                source,
            });
        }

        busy_work(workload.iterations(&mut rng));

        if !pacing.step_delay.is_zero() {
            thread::sleep(pacing.step_delay);
        }
    }

    debug!(worker = spec.index, "worker completed");
    Ok(())
}
