//! `run-setup` -- seed the store, then generate derived assets.
//!
//! Runs the two scripts one after the other with inherited stdio. The
//! first failure aborts the run and the process exits with status 1.
//!
//! # Environment variables
//!
//! | Variable        | Required | Default                      | Description                        |
//! |-----------------|----------|------------------------------|------------------------------------|
//! | `SEED_SCRIPT`   | no       | `scripts/seed.sh`            | Seeding script                     |
//! | `ASSETS_SCRIPT` | no       | `scripts/generate-assets.sh` | Asset-generation script            |
//! | `SETUP_WORKDIR` | no       | current directory            | Working directory for both scripts |
//! | `LOG_FORMAT`    | no       | pretty                       | `json` for JSON log lines          |

use std::process::ExitCode;

use backstore_core::scripting::executor::ProcessExecutor;
use backstore_core::scripting::runner;
use backstore_scripts::config::SetupConfig;
use backstore_scripts::logging;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    logging::init("run_setup=info,backstore_core=info");

    let config = SetupConfig::from_env();

    let mut executor = ProcessExecutor::new();
    if let Some(dir) = &config.working_directory {
        tracing::info!(workdir = %dir.display(), "Using working directory");
        executor = executor.with_working_directory(dir);
    }

    let steps = config.steps();

    match runner::run_sequence(&executor, &steps).await {
        Ok(summary) => {
            tracing::info!(
                scripts = summary.completed.len(),
                elapsed_ms = summary.duration.as_millis() as u64,
                "All setup scripts completed successfully",
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Setup failed");
            ExitCode::FAILURE
        }
    }
}
