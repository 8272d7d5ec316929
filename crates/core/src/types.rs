use thiserror::Error;

/// The main error type for Spindle operations
#[derive(Debug, Error)]
pub enum SpindleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Creating the thread for worker `index` failed. Workers listed in
    /// `spawned` were already running and have been detached, not cancelled.
    #[error("Failed to spawn worker {index} (already running: {spawned:?}): {source}")]
    Spawn {
        index: usize,
        spawned: Vec<usize>,
        #[source]
        source: std::io::Error,
    },

    #[error("Worker {index} failed to emit a step: {source}")]
    Emit {
        index: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Worker {index} panicked")]
    WorkerPanicked { index: usize },
}

impl SpindleError {
    /// Index of the worker this error belongs to, if any
    pub fn worker_index(&self) -> Option<usize> {
        match self {
            Self::Spawn { index, .. }
            | Self::Emit { index, .. }
            | Self::WorkerPanicked { index } => Some(*index),
            Self::Io(_) | Self::Yaml(_) | Self::Config(_) => None,
        }
    }
}

/// Result type alias for Spindle operations
pub type SpindleResult<T> = Result<T, SpindleError>;
