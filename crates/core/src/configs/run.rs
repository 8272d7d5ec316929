use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::execution::runner::RunConfig;
use crate::execution::worker::{WorkerSpec, Workload};
use crate::types::{SpindleError, SpindleResult};

fn default_join() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WorkloadConfig {
    pub base: u64,
    #[serde(default)]
    pub variance: u64,
}

impl From<WorkloadConfig> for Workload {
    fn from(config: WorkloadConfig) -> Self {
        Workload::new(config.base, config.variance)
    }
}

/// One worker entry. Exactly one of `steps`, `numbers` or `letters` must be set.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WorkerConfig {
    pub steps: Option<Vec<String>>,
    pub numbers: Option<usize>,
    pub letters: Option<String>,
    pub workload: Option<WorkloadConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RunFileConfig {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default = "default_join")]
    pub join: bool,
    pub workload: Option<WorkloadConfig>,
    pub step_delay_ms: Option<u64>,
    pub seed: Option<u64>,
    pub workers: Vec<WorkerConfig>,
}

impl RunFileConfig {
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            join: self.join,
            workload: self.workload.map(Workload::from).unwrap_or_default(),
            step_delay: Duration::from_millis(self.step_delay_ms.unwrap_or(0)),
            seed: self.seed,
        }
    }

    /// Build worker specs, indexed by their position in the file
    pub fn worker_specs(&self) -> SpindleResult<Vec<WorkerSpec>> {
        if self.workers.is_empty() {
            return Err(SpindleError::Config("run file must list at least one worker".to_string()));
        }

        self.workers
            .iter()
            .enumerate()
            .map(|(index, worker)| {
                let spec = match (&worker.steps, worker.numbers, &worker.letters) {
                    (Some(steps), None, None) => WorkerSpec::new(index, steps.iter().cloned()),
                    (None, Some(count), None) => WorkerSpec::numbers(index, count),
                    (None, None, Some(letters)) => WorkerSpec::letters(index, letters),
                    _ => {
                        return Err(SpindleError::Config(format!(
                            "worker {} must set exactly one of 'steps', 'numbers' or 'letters'",
                            index
                        )))
                    }
                };
                Ok(match worker.workload {
                    Some(workload) => spec.with_workload(workload.into()),
                    None => spec,
                })
            })
            .collect()
    }
}

pub fn parse_run_config(yaml_str: &str) -> SpindleResult<RunFileConfig> {
    let config: RunFileConfig = serde_yaml::from_str(yaml_str)?;
    Ok(config)
}

pub fn load_run_config(path: &Path) -> SpindleResult<RunFileConfig> {
    let contents = std::fs::read_to_string(path)?;
    parse_run_config(&contents)
}
