//! Spindle Core Library
//!
//! A small concurrent task runner with explicit join semantics. Each worker runs
//! on its own named thread and prints a sequence of labeled steps with simulated
//! CPU work between them. The caller decides whether to wait for the workers
//! ([`RunConfig::join`]) or to detach them and move on.
//!
//! ## Architecture
//!
//! - [`execution`] - Runner, worker body and step sinks
//! - [`configs`] - YAML run files
//! - [`demos`] - Preset workers and configurations for the bundled demos
//! - [`results`] - Per-worker outcomes of a run
//! - [`types`] - Error type and result alias
//!
//! ## Usage
//!
//! ```rust,no_run
//! use spindle_core::{RunConfig, TaskRunner, WorkerSpec, Workload};
//!
//! # fn example() -> spindle_core::SpindleResult<()> {
//! let runner = TaskRunner::new(RunConfig::joined().with_workload(Workload::new(1_000, 500)));
//! let result = runner.run(vec![
//!     WorkerSpec::numbers(0, 5),
//!     WorkerSpec::letters(1, "abcde"),
//! ])?;
//! assert!(result.all_completed());
//! # Ok(())
//! # }
//! ```

pub mod configs;
pub mod demos;
pub mod execution;
pub mod results;
pub mod types;

// Re-export the main types for easier usage
pub use execution::{RunConfig, RunHandle, TaskRunner, WorkerSpec, Workload};
pub use results::{RunResult, WorkerOutcome, WorkerStatus};
pub use types::{SpindleError, SpindleResult};
