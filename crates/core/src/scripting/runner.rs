//! Strictly sequential execution of a list of script steps.

use std::time::{Duration, Instant};

use super::executor::StepExecutor;
use super::step::{ScriptStep, StepExit};

/// Reasons a setup run was aborted.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The script process could not be started.
    #[error("Failed to start script {script}: {source}")]
    Spawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// The script ran but did not exit successfully.
    #[error("Script {script} failed with {exit}")]
    Failed { script: String, exit: StepExit },
}

/// Result of a run in which every step succeeded.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Names of the completed steps, in execution order.
    pub completed: Vec<String>,
    pub duration: Duration,
}

/// Run `steps` in order, waiting for each to finish before starting the next.
///
/// Stops at the first step that fails to start or exits non-zero; later
/// steps are never invoked. An empty list succeeds immediately.
pub async fn run_sequence<E: StepExecutor>(
    executor: &E,
    steps: &[ScriptStep],
) -> Result<RunSummary, RunnerError> {
    let start = Instant::now();
    let total = steps.len();
    let mut completed = Vec::with_capacity(total);

    for (index, step) in steps.iter().enumerate() {
        tracing::info!(
            script = %step.name,
            path = %step.path.display(),
            runtime = %step.runtime,
            position = index + 1,
            total,
            "Running script",
        );

        let step_start = Instant::now();
        let remaining = total - index - 1;

        let exit = match executor.run(step).await {
            Ok(exit) => exit,
            Err(source) => {
                tracing::warn!(script = %step.name, skipped = remaining, "Aborting run");
                return Err(RunnerError::Spawn {
                    script: step.name.clone(),
                    source,
                });
            }
        };

        let elapsed_ms = step_start.elapsed().as_millis() as u64;

        if !exit.success() {
            tracing::warn!(
                script = %step.name,
                exit_code = ?exit.code,
                elapsed_ms,
                skipped = remaining,
                "Aborting run",
            );
            return Err(RunnerError::Failed {
                script: step.name.clone(),
                exit,
            });
        }

        tracing::info!(script = %step.name, elapsed_ms, "Script completed");
        completed.push(step.name.clone());
    }

    Ok(RunSummary {
        completed,
        duration: start.elapsed(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
