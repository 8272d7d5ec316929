//! High-level task runner
//!
//! This module spawns one named thread per worker and then either joins every
//! thread or detaches them. Detaching is an explicit call on [`RunHandle`], so a
//! run that does not wait for its workers says so in the code.
//!
//! A detached worker keeps running after [`TaskRunner::run`] returns. If the
//! process exits first, its remaining steps are silently abandoned.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::execution::sink::{StdoutSink, StepSink};
use crate::execution::worker::{run_worker, worker_seed, Pacing, WorkerSpec, Workload};
use crate::results::{RunResult, WorkerStatus};
use crate::types::{SpindleError, SpindleResult};

/// Configuration for the task runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Wait for every worker before returning
    pub join: bool,
    /// Busy-work per step, unless a worker overrides it
    pub workload: Workload,
    /// Sleep after each step's busy-work
    pub step_delay: Duration,
    /// Fixed seed for reproducible busy-work; the wall clock is used when unset
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            join: true,
            workload: Workload::NONE,
            step_delay: Duration::ZERO,
            seed: None,
        }
    }
}

impl RunConfig {
    pub fn joined() -> Self {
        Self::default()
    }

    pub fn detached() -> Self {
        Self {
            join: false,
            ..Self::default()
        }
    }

    pub fn with_workload(mut self, workload: Workload) -> Self {
        self.workload = workload;
        self
    }

    pub fn with_step_delay(mut self, step_delay: Duration) -> Self {
        self.step_delay = step_delay;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

/// Runs a fixed set of independent workers on their own threads
pub struct TaskRunner {
    config: RunConfig,
    sink: Arc<dyn StepSink>,
    /// Per-worker thread stack sizes; the platform default applies otherwise
    stack_sizes: HashMap<usize, usize>,
}

impl TaskRunner {
    /// Runner that prints steps to stdout
    pub fn new(config: RunConfig) -> Self {
        Self::with_sink(config, Arc::new(StdoutSink))
    }

    pub fn with_sink(config: RunConfig, sink: Arc<dyn StepSink>) -> Self {
        Self {
            config,
            sink,
            stack_sizes: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_stack_size(mut self, index: usize, bytes: usize) -> Self {
        self.stack_sizes.insert(index, bytes);
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Spawn every worker, then join or detach them according to `config.join`
    pub fn run(&self, workers: Vec<WorkerSpec>) -> SpindleResult<RunResult> {
        let handle = self.spawn(workers)?;
        if self.config.join {
            handle.join()
        } else {
            Ok(handle.detach())
        }
    }

    /// Spawn every worker and hand back their handles without waiting.
    ///
    /// If a spawn fails, workers that already started are detached and
    /// reported in [`SpindleError::Spawn`].
    pub fn spawn(&self, workers: Vec<WorkerSpec>) -> SpindleResult<RunHandle> {
        ensure_runnable(&workers)?;

        let started = Instant::now();
        let mut handles: Vec<WorkerHandle> = Vec::with_capacity(workers.len());

        for spec in workers {
            let index = spec.index;
            let pacing = self.pacing_for(index);
            let sink = Arc::clone(&self.sink);

            let mut builder = thread::Builder::new().name(format!("worker-{}", index));
            if let Some(&bytes) = self.stack_sizes.get(&index) {
                builder = builder.stack_size(bytes);
            }
            let spawned = builder.spawn(move || run_worker(&spec, pacing, sink.as_ref()));

            match spawned {
                Ok(handle) => {
                    debug!(worker = index, "worker spawned");
                    handles.push(WorkerHandle { index, handle });
                }
                Err(source) => {
                    let spawned: Vec<usize> = handles.iter().map(|worker| worker.index).collect();
                    warn!(worker = index, running = ?spawned, error = %source, "spawn failed");
                    // Running workers are left to finish on their own
                    RunHandle { workers: handles, started }.detach();
                    return Err(SpindleError::Spawn {
                        index,
                        spawned,
                        source,
                    });
                }
            }
        }

        Ok(RunHandle {
            workers: handles,
            started,
        })
    }

    /// Run every worker on the calling thread, one after another
    pub fn run_sequential(&self, workers: Vec<WorkerSpec>) -> SpindleResult<RunResult> {
        ensure_runnable(&workers)?;

        let started = Instant::now();
        for spec in &workers {
            run_worker(spec, self.pacing_for(spec.index), self.sink.as_ref())?;
        }

        let mut indices: Vec<usize> = workers.iter().map(|spec| spec.index).collect();
        indices.sort_unstable();
        Ok(RunResult::uniform(indices, WorkerStatus::Completed, started.elapsed()))
    }

    fn pacing_for(&self, index: usize) -> Pacing {
        Pacing {
            workload: self.config.workload,
            step_delay: self.config.step_delay,
            seed: worker_seed(self.config.seed, index),
        }
    }
}

fn ensure_runnable(workers: &[WorkerSpec]) -> SpindleResult<()> {
    if workers.is_empty() {
        return Err(SpindleError::Config("at least one worker is required".to_string()));
    }

    let mut seen = HashSet::new();
    for spec in workers {
        if !seen.insert(spec.index) {
            return Err(SpindleError::Config(format!(
                "worker index {} is used more than once",
                spec.index
            )));
        }
    }

    Ok(())
}

struct WorkerHandle {
    index: usize,
    handle: JoinHandle<SpindleResult<()>>,
}

/// Workers that have been spawned but neither joined nor detached yet.
///
/// Dropping a `RunHandle` detaches its workers; prefer calling [`RunHandle::detach`]
/// so the choice is visible.
#[must_use = "call join() to wait for the workers or detach() to let them run unobserved"]
pub struct RunHandle {
    workers: Vec<WorkerHandle>,
    started: Instant,
}

impl RunHandle {
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Worker indices in spawn order
    pub fn indices(&self) -> Vec<usize> {
        self.workers.iter().map(|worker| worker.index).collect()
    }

    /// Whether worker `index` is still running, or `None` if it is not part of this run
    pub fn is_alive(&self, index: usize) -> Option<bool> {
        self.workers
            .iter()
            .find(|worker| worker.index == index)
            .map(|worker| !worker.handle.is_finished())
    }

    pub fn alive_count(&self) -> usize {
        self.workers
            .iter()
            .filter(|worker| !worker.handle.is_finished())
            .count()
    }

    /// Block until every worker has finished. Outcomes are listed in index order.
    ///
    /// All workers are joined even when one fails; the first failure in spawn
    /// order is returned.
    pub fn join(self) -> SpindleResult<RunResult> {
        let mut indices = self.indices();
        indices.sort_unstable();
        let mut first_error = None;

        for worker in self.workers {
            let outcome = worker
                .handle
                .join()
                .unwrap_or(Err(SpindleError::WorkerPanicked {
                    index: worker.index,
                }));

            match outcome {
                Ok(()) => debug!(worker = worker.index, "worker joined"),
                Err(err) => {
                    warn!(worker = worker.index, error = %err, "worker failed");
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(RunResult::uniform(
                indices,
                WorkerStatus::Completed,
                self.started.elapsed(),
            )),
        }
    }

    /// Give up every join handle. Workers keep running with nobody waiting for them.
    pub fn detach(self) -> RunResult {
        let indices = self.indices();
        for worker in self.workers {
            debug!(worker = worker.index, "worker detached");
            drop(worker.handle);
        }
        RunResult::uniform(indices, WorkerStatus::NotAwaited, self.started.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{PoisonError, RwLock};

    use super::*;
    use crate::execution::sink::MemorySink;

    /// Blocks every emit until the test releases the gate
    struct GatedSink {
        gate: Arc<RwLock<()>>,
        inner: MemorySink,
    }

    impl StepSink for GatedSink {
        fn emit(&self, worker: usize, label: &str) -> io::Result<()> {
            let _open = self.gate.read().unwrap_or_else(PoisonError::into_inner);
            self.inner.emit(worker, label)
        }
    }

    fn demo_workers() -> Vec<WorkerSpec> {
        vec![WorkerSpec::numbers(0, 5), WorkerSpec::letters(1, "abcde")]
    }

    fn wait_for_lines(sink: &MemorySink, expected: usize) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while sink.len() < expected && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_joined_run_emits_every_step_in_worker_order() {
        let sink = Arc::new(MemorySink::new());
        let config = RunConfig::joined().with_workload(Workload::new(1_000, 1_000));
        let runner = TaskRunner::with_sink(config, sink.clone());

        let result = runner.run(demo_workers()).unwrap();

        assert!(result.all_completed());
        assert_eq!(result.completed_count(), 2);

        let lines = sink.lines();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines.iter().filter(|l| l.starts_with("Number: ")).count(), 5);
        assert_eq!(lines.iter().filter(|l| l.starts_with("Letter: ")).count(), 5);

        let numbers: Vec<String> = (0..5).map(|i| format!("Number: {}", i)).collect();
        let letters: Vec<String> = "abcde".chars().map(|c| format!("Letter: {}", c)).collect();
        assert_eq!(sink.lines_for(0), numbers);
        assert_eq!(sink.lines_for(1), letters);
    }

    #[test]
    fn test_joined_run_with_uneven_workers_keeps_each_order() {
        let sink = Arc::new(MemorySink::new());
        let runner = TaskRunner::with_sink(RunConfig::joined(), sink.clone());
        let workers = vec![
            WorkerSpec::numbers(0, 12),
            WorkerSpec::letters(1, "xyz"),
            WorkerSpec::new(2, ["ping", "pong"]).with_workload(Workload::new(5_000, 0)),
        ];

        runner.run(workers.clone()).unwrap();

        assert_eq!(sink.len(), 17);
        for spec in &workers {
            assert_eq!(sink.lines_for(spec.index), spec.steps);
        }
    }

    #[test]
    fn test_detached_run_returns_while_workers_are_blocked() {
        let gate = Arc::new(RwLock::new(()));
        let sink = Arc::new(GatedSink {
            gate: gate.clone(),
            inner: MemorySink::new(),
        });
        let runner = TaskRunner::with_sink(RunConfig::detached(), sink.clone());

        let closed = gate.write().unwrap();
        let result = runner.run(demo_workers()).unwrap();

        assert_eq!(result.outcomes.len(), 2);
        assert_eq!(result.status_of(0), Some(WorkerStatus::NotAwaited));
        assert_eq!(result.status_of(1), Some(WorkerStatus::NotAwaited));
        assert!(sink.inner.is_empty());

        // Detached workers carry on once unblocked
        drop(closed);
        wait_for_lines(&sink.inner, 10);
        assert_eq!(sink.inner.lines_for(0).len(), 5);
        assert_eq!(sink.inner.lines_for(1).len(), 5);
    }

    #[test]
    fn test_spawn_reports_liveness_until_joined() {
        let gate = Arc::new(RwLock::new(()));
        let sink = Arc::new(GatedSink {
            gate: gate.clone(),
            inner: MemorySink::new(),
        });
        let runner = TaskRunner::with_sink(RunConfig::joined(), sink.clone());

        let closed = gate.write().unwrap();
        let handle = runner.spawn(demo_workers()).unwrap();

        assert_eq!(handle.len(), 2);
        assert_eq!(handle.indices(), vec![0, 1]);
        assert_eq!(handle.is_alive(0), Some(true));
        assert_eq!(handle.is_alive(7), None);
        assert_eq!(handle.alive_count(), 2);

        drop(closed);
        let result = handle.join().unwrap();

        assert!(result.all_completed());
        assert_eq!(sink.inner.len(), 10);
    }

    #[test]
    fn test_joined_outcomes_are_in_index_order() {
        let sink = Arc::new(MemorySink::new());
        let runner = TaskRunner::with_sink(RunConfig::joined(), sink.clone());
        let reversed = || vec![WorkerSpec::numbers(1, 1), WorkerSpec::letters(0, "a")];

        let joined = runner.run(reversed()).unwrap();
        let indices: Vec<usize> = joined.outcomes.iter().map(|o| o.index).collect();
        assert_eq!(indices, vec![0, 1]);

        let sequential = runner.run_sequential(reversed()).unwrap();
        let indices: Vec<usize> = sequential.outcomes.iter().map(|o| o.index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_spawn_failure_names_worker_and_detaches_started_ones() {
        let sink = Arc::new(MemorySink::new());
        let runner = TaskRunner::with_sink(RunConfig::joined(), sink.clone())
            .with_stack_size(1, usize::MAX);

        let err = runner
            .run(vec![WorkerSpec::numbers(0, 3), WorkerSpec::letters(1, "ab")])
            .unwrap_err();

        match err {
            SpindleError::Spawn { index, spawned, .. } => {
                assert_eq!(index, 1);
                assert_eq!(spawned, vec![0]);
            }
            other => panic!("expected spawn error, got {:?}", other),
        }

        // Worker 0 was detached, not cancelled
        wait_for_lines(&sink, 3);
        assert_eq!(sink.lines_for(0), vec!["Number: 0", "Number: 1", "Number: 2"]);
        assert!(sink.lines_for(1).is_empty());
    }

    #[test]
    fn test_empty_worker_list_is_rejected() {
        let runner = TaskRunner::with_sink(RunConfig::joined(), Arc::new(MemorySink::new()));

        let err = runner.run(Vec::new()).unwrap_err();
        assert!(matches!(err, SpindleError::Config(_)));

        let err = runner.run_sequential(Vec::new()).unwrap_err();
        assert!(matches!(err, SpindleError::Config(_)));
    }

    #[test]
    fn test_duplicate_worker_index_is_rejected() {
        let sink = Arc::new(MemorySink::new());
        let runner = TaskRunner::with_sink(RunConfig::joined(), sink.clone());

        let err = runner
            .run(vec![WorkerSpec::numbers(3, 2), WorkerSpec::letters(3, "ab")])
            .unwrap_err();

        assert!(err.to_string().contains("worker index 3"));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_emit_failure_aborts_only_the_failing_worker() {
        struct RejectWorker {
            rejected: usize,
            inner: MemorySink,
        }

        impl StepSink for RejectWorker {
            fn emit(&self, worker: usize, label: &str) -> io::Result<()> {
                if worker == self.rejected {
                    return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
                }
                self.inner.emit(worker, label)
            }
        }

        let sink = Arc::new(RejectWorker {
            rejected: 1,
            inner: MemorySink::new(),
        });
        let runner = TaskRunner::with_sink(RunConfig::joined(), sink.clone());

        let err = runner.run(demo_workers()).unwrap_err();

        assert!(matches!(err, SpindleError::Emit { index: 1, .. }));
        assert_eq!(sink.inner.lines_for(0).len(), 5);
        assert!(sink.inner.lines_for(1).is_empty());
    }

    #[test]
    fn test_worker_panic_is_reported_on_join() {
        struct Explode;

        impl StepSink for Explode {
            fn emit(&self, _worker: usize, _label: &str) -> io::Result<()> {
                panic!("sink exploded");
            }
        }

        let runner = TaskRunner::with_sink(RunConfig::joined(), Arc::new(Explode));

        let err = runner.run(vec![WorkerSpec::numbers(0, 1)]).unwrap_err();
        assert!(matches!(err, SpindleError::WorkerPanicked { index: 0 }));
    }

    #[test]
    fn test_sequential_run_finishes_each_worker_before_the_next() {
        let sink = Arc::new(MemorySink::new());
        let runner = TaskRunner::with_sink(RunConfig::detached(), sink.clone());

        let result = runner.run_sequential(demo_workers()).unwrap();

        assert!(result.all_completed());
        let mut expected: Vec<String> = (0..5).map(|i| format!("Number: {}", i)).collect();
        expected.extend("abcde".chars().map(|c| format!("Letter: {}", c)));
        assert_eq!(sink.lines(), expected);
    }

    #[test]
    fn test_step_delay_is_applied_per_step() {
        let sink = Arc::new(MemorySink::new());
        let config = RunConfig::joined().with_step_delay(Duration::from_millis(10));
        let runner = TaskRunner::with_sink(config, sink.clone());

        let result = runner.run(vec![WorkerSpec::numbers(0, 3)]).unwrap();

        assert!(result.elapsed >= Duration::from_millis(30));
        assert_eq!(sink.len(), 3);
    }
}
