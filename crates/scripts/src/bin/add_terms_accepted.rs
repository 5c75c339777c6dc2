//! `add-terms-accepted` -- add `users.terms_accepted` if it is missing.
//!
//! Safe to run repeatedly: when the column already exists nothing is
//! changed. Exits with status 1 on any configuration or database error.
//!
//! # Environment variables
//!
//! | Variable                  | Required | Default | Description                       |
//! |---------------------------|----------|---------|-----------------------------------|
//! | `DATABASE_URL`            | yes      | --      | PostgreSQL connection string      |
//! | `DB_MAX_CONNECTIONS`      | no       | `1`     | Pool size                         |
//! | `DB_ACQUIRE_TIMEOUT_SECS` | no       | `30`    | Wait for a pooled connection      |
//! | `LOG_FORMAT`              | no       | pretty  | `json` for JSON log lines         |

use std::process::ExitCode;

use anyhow::Context;
use backstore_db::schema::{self, PatchOutcome, TERMS_ACCEPTED};
use backstore_scripts::config::PatcherConfig;
use backstore_scripts::logging;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    logging::init("add_terms_accepted=info,backstore_db=info");

    match run().await {
        Ok(outcome) => {
            let message = match outcome {
                PatchOutcome::Added => "Migration applied",
                PatchOutcome::AlreadyPresent => "Migration already applied; nothing to do",
            };
            tracing::info!(patch = %TERMS_ACCEPTED, "{message}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Migration failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<PatchOutcome> {
    let config = PatcherConfig::from_env().context("Invalid configuration")?;

    let pool = backstore_db::create_pool(&config.database_url, &config.pool)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    schema::run_patch(pool, &TERMS_ACCEPTED)
        .await
        .with_context(|| format!("Failed to patch {TERMS_ACCEPTED}"))
}
