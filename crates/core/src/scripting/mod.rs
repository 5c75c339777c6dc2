//! Sequential script orchestration for store setup.
//!
//! A run is an ordered list of [`step::ScriptStep`]s executed one at a time
//! through a [`executor::StepExecutor`]. The first failure aborts the run;
//! nothing is retried.

pub mod executor;
pub mod runner;
pub mod step;

/// Shared test helpers for scripting tests.
#[cfg(test)]
pub(crate) mod test_helpers {
    use std::path::Path;

    use super::step::ScriptStep;

    /// Write a bash script with the given body into `dir` and return a step for it.
    pub fn write_step(dir: &Path, name: &str, body: &str) -> ScriptStep {
        let path = dir.join(format!("{name}.sh"));
        std::fs::write(&path, format!("#!/bin/bash\n{body}")).expect("write script");
        ScriptStep::new(name, path)
    }
}
