//! Step execution interface and the subprocess-backed implementation.

use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use super::step::{ScriptStep, StepExit};

/// Runs a single script step to completion.
///
/// An `Err` means the process could not be started at all; a process that
/// started and exited non-zero is reported through [`StepExit`].
pub trait StepExecutor: Send + Sync {
    fn run(
        &self,
        step: &ScriptStep,
    ) -> impl std::future::Future<Output = io::Result<StepExit>> + Send;
}

/// Spawns each step as a child process with inherited stdin/stdout/stderr
/// and waits for it to exit.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor {
    working_directory: Option<PathBuf>,
}

impl ProcessExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every child with `dir` as its working directory.
    pub fn with_working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }
}

impl StepExecutor for ProcessExecutor {
    async fn run(&self, step: &ScriptStep) -> io::Result<StepExit> {
        // Interpreters start fine and then exit non-zero on a missing file,
        // so check the script itself before spawning.
        let script_path = match &self.working_directory {
            Some(dir) => dir.join(&step.path),
            None => step.path.clone(),
        };
        tokio::fs::metadata(&script_path).await?;

        let mut cmd = step.command();
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        if let Some(dir) = &self.working_directory {
            cmd.current_dir(dir);
        }

        let status = cmd.status().await?;
        Ok(StepExit::from(status))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
