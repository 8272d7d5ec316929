//! Task execution module
//!
//! This module handles spawning workers, the per-worker step loop, and the sink
//! through which workers emit their steps.

pub mod runner;
pub mod sink;
pub mod worker;

pub use runner::{RunConfig, RunHandle, TaskRunner};
pub use sink::{EmittedStep, MemorySink, StdoutSink, StepSink};
pub use worker::{busy_work, worker_seed, WorkerSpec, Workload};
