//! Result types for runner operations

use std::fmt;
use std::time::Duration;

/// How a worker ended from the runner's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerStatus {
    /// The runner joined the worker after it finished every step
    Completed,
    /// The worker was detached; it may still be running or may never finish
    NotAwaited,
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::NotAwaited => write!(f, "not awaited"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerOutcome {
    pub index: usize,
    pub status: WorkerStatus,
}

/// Result of a run. Outcomes are in index order for joined runs; for detached
/// runs the order carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub outcomes: Vec<WorkerOutcome>,
    /// Wall time from the first spawn until the runner returned
    pub elapsed: Duration,
}

impl RunResult {
    pub(crate) fn uniform(
        indices: impl IntoIterator<Item = usize>,
        status: WorkerStatus,
        elapsed: Duration,
    ) -> Self {
        Self {
            outcomes: indices
                .into_iter()
                .map(|index| WorkerOutcome { index, status })
                .collect(),
            elapsed,
        }
    }

    pub fn all_completed(&self) -> bool {
        self.outcomes
            .iter()
            .all(|outcome| outcome.status == WorkerStatus::Completed)
    }

    pub fn completed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status == WorkerStatus::Completed)
            .count()
    }

    pub fn status_of(&self, index: usize) -> Option<WorkerStatus> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.index == index)
            .map(|outcome| outcome.status)
    }
}
