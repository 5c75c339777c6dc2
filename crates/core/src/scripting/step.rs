//! Script steps and the runtimes used to launch them.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use tokio::process::Command;

/// How a script file is launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptRuntime {
    /// Executed via `bash <path>`.
    Shell,
    /// Executed via `python3 <path>`.
    Python,
    /// Executed via `node <path>`.
    Node,
    /// Executed directly; the file must be executable.
    Binary,
}

impl ScriptRuntime {
    /// Infer the runtime from the file extension.
    ///
    /// Unknown or missing extensions fall back to [`ScriptRuntime::Binary`].
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("sh" | "bash") => Self::Shell,
            Some("py") => Self::Python,
            Some("js" | "mjs" | "cjs") => Self::Node,
            _ => Self::Binary,
        }
    }

    /// Interpreter program for this runtime, or `None` for direct execution.
    pub fn interpreter(self) -> Option<&'static str> {
        match self {
            Self::Shell => Some("bash"),
            Self::Python => Some("python3"),
            Self::Node => Some("node"),
            Self::Binary => None,
        }
    }
}

impl fmt::Display for ScriptRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Shell => "shell",
            Self::Python => "python",
            Self::Node => "node",
            Self::Binary => "binary",
        };
        f.write_str(name)
    }
}

/// One script in a setup run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptStep {
    /// Label used in log lines and error messages.
    pub name: String,
    pub path: PathBuf,
    pub runtime: ScriptRuntime,
}

impl ScriptStep {
    /// Build a step, inferring its runtime from `path`.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let runtime = ScriptRuntime::from_path(&path);
        Self {
            name: name.into(),
            path,
            runtime,
        }
    }

    /// Build the launch command for this step. I/O configuration is left to the executor.
    pub fn command(&self) -> Command {
        match self.runtime.interpreter() {
            Some(interpreter) => {
                let mut cmd = Command::new(interpreter);
                cmd.arg(&self.path);
                cmd
            }
            None => Command::new(&self.path),
        }
    }
}

/// Exit of a finished script process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepExit {
    /// Process exit code; `None` if the process was terminated by a signal.
    pub code: Option<i32>,
}

impl StepExit {
    pub fn success(self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for StepExit {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl fmt::Display for StepExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => f.write_str("termination by signal"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_from_extension() {
        assert_eq!(ScriptRuntime::from_path(Path::new("seed.sh")), ScriptRuntime::Shell);
        assert_eq!(ScriptRuntime::from_path(Path::new("seed.bash")), ScriptRuntime::Shell);
        assert_eq!(ScriptRuntime::from_path(Path::new("seed.py")), ScriptRuntime::Python);
        assert_eq!(ScriptRuntime::from_path(Path::new("seed.js")), ScriptRuntime::Node);
        assert_eq!(ScriptRuntime::from_path(Path::new("seed.mjs")), ScriptRuntime::Node);
        assert_eq!(ScriptRuntime::from_path(Path::new("seed.cjs")), ScriptRuntime::Node);
    }

    #[test]
    fn runtime_falls_back_to_binary() {
        assert_eq!(ScriptRuntime::from_path(Path::new("bin/seed")), ScriptRuntime::Binary);
        assert_eq!(ScriptRuntime::from_path(Path::new("seed.exe")), ScriptRuntime::Binary);
    }

    #[test]
    fn interpreters() {
        assert_eq!(ScriptRuntime::Shell.interpreter(), Some("bash"));
        assert_eq!(ScriptRuntime::Python.interpreter(), Some("python3"));
        assert_eq!(ScriptRuntime::Node.interpreter(), Some("node"));
        assert_eq!(ScriptRuntime::Binary.interpreter(), None);
    }

    #[test]
    fn step_infers_runtime() {
        let step = ScriptStep::new("seed", "scripts/seed.py");
        assert_eq!(step.name, "seed");
        assert_eq!(step.path, PathBuf::from("scripts/seed.py"));
        assert_eq!(step.runtime, ScriptRuntime::Python);
    }

    #[test]
    fn command_uses_interpreter() {
        let step = ScriptStep::new("seed", "scripts/seed.sh");
        let cmd = step.command();
        let std_cmd = cmd.as_std();
        assert_eq!(std_cmd.get_program(), "bash");
        let args: Vec<_> = std_cmd.get_args().collect();
        assert_eq!(args, ["scripts/seed.sh"]);
    }

    #[test]
    fn command_runs_binary_directly() {
        let step = ScriptStep::new("assets", "bin/generate-assets");
        let cmd = step.command();
        assert_eq!(cmd.as_std().get_program(), "bin/generate-assets");
        assert_eq!(cmd.as_std().get_args().count(), 0);
    }

    #[test]
    fn exit_success_only_for_zero() {
        assert!(StepExit { code: Some(0) }.success());
        assert!(!StepExit { code: Some(1) }.success());
        assert!(!StepExit { code: None }.success());
    }

    #[test]
    fn exit_display() {
        assert_eq!(StepExit { code: Some(3) }.to_string(), "exit code 3");
        assert_eq!(StepExit { code: None }.to_string(), "termination by signal");
    }
}
