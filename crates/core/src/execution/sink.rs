//! Step output sinks
//!
//! Workers only touch the outside world through a [`StepSink`]. Production runs
//! write to stdout; tests capture steps in memory.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

/// Destination for the labels workers emit, one call per step
pub trait StepSink: Send + Sync {
    /// Emit one step label for `worker`. An error aborts that worker's remaining steps.
    fn emit(&self, worker: usize, label: &str) -> io::Result<()>;
}

/// Writes each label as a single line on stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl StepSink for StdoutSink {
    fn emit(&self, _worker: usize, label: &str) -> io::Result<()> {
        // Whole line under the lock so concurrent workers never split a line
        let mut out = io::stdout().lock();
        writeln!(out, "{}", label)?;
        out.flush()
    }
}

/// A step captured by [`MemorySink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedStep {
    pub worker: usize,
    pub label: String,
}

/// Collects emitted steps in arrival order
#[derive(Debug, Default)]
pub struct MemorySink {
    steps: Mutex<Vec<EmittedStep>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All steps in the order they arrived
    pub fn steps(&self) -> Vec<EmittedStep> {
        self.steps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Labels only, in arrival order
    pub fn lines(&self) -> Vec<String> {
        self.steps().into_iter().map(|step| step.label).collect()
    }

    /// Labels emitted by one worker, in arrival order
    pub fn lines_for(&self, worker: usize) -> Vec<String> {
        self.steps()
            .into_iter()
            .filter(|step| step.worker == worker)
            .map(|step| step.label)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.steps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StepSink for MemorySink {
    fn emit(&self, worker: usize, label: &str) -> io::Result<()> {
        self.steps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(EmittedStep {
                worker,
                label: label.to_string(),
            });
        Ok(())
    }
}
