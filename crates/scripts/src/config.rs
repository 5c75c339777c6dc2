use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use backstore_core::scripting::step::ScriptStep;
use backstore_db::PoolSettings;

/// Default seeding script, relative to the working directory.
pub const DEFAULT_SEED_SCRIPT: &str = "scripts/seed.sh";

/// Default asset-generation script, relative to the working directory.
pub const DEFAULT_ASSETS_SCRIPT: &str = "scripts/generate-assets.sh";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Configuration for `run-setup`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupConfig {
    pub seed_script: PathBuf,
    pub assets_script: PathBuf,
    /// Working directory for both children; relative script paths resolve against it.
    pub working_directory: Option<PathBuf>,
}

impl SetupConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var          | Default                      |
    /// |------------------|------------------------------|
    /// | `SEED_SCRIPT`    | `scripts/seed.sh`            |
    /// | `ASSETS_SCRIPT`  | `scripts/generate-assets.sh` |
    /// | `SETUP_WORKDIR`  | current directory            |
    pub fn from_env() -> Self {
        let mut config = Self::from_lookup(|key| std::env::var(key).ok());
        config.working_directory = config
            .working_directory
            .map(|dir| std::path::absolute(&dir).unwrap_or(dir));
        config
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let seed_script = non_empty(&lookup, "SEED_SCRIPT")
            .unwrap_or_else(|| DEFAULT_SEED_SCRIPT.to_string());
        let assets_script = non_empty(&lookup, "ASSETS_SCRIPT")
            .unwrap_or_else(|| DEFAULT_ASSETS_SCRIPT.to_string());
        let working_directory = non_empty(&lookup, "SETUP_WORKDIR").map(PathBuf::from);

        Self {
            seed_script: PathBuf::from(seed_script),
            assets_script: PathBuf::from(assets_script),
            working_directory,
        }
    }

    /// The setup sequence: seeding first, then asset generation.
    pub fn steps(&self) -> Vec<ScriptStep> {
        vec![
            ScriptStep::new("seed", self.resolve(&self.seed_script)),
            ScriptStep::new("generate-assets", self.resolve(&self.assets_script)),
        ]
    }

    fn resolve(&self, script: &Path) -> PathBuf {
        match &self.working_directory {
            Some(dir) => dir.join(script),
            None => script.to_path_buf(),
        }
    }
}

/// Configuration for `add-terms-accepted`.
#[derive(Clone, PartialEq, Eq)]
pub struct PatcherConfig {
    pub database_url: String,
    pub pool: PoolSettings,
}

// Keeps credentials in DATABASE_URL out of debug output.
impl std::fmt::Debug for PatcherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatcherConfig")
            .field("database_url", &"<redacted>")
            .field("pool", &self.pool)
            .finish()
    }
}

impl PatcherConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                   | Default  |
    /// |---------------------------|----------|
    /// | `DATABASE_URL`            | required |
    /// | `DB_MAX_CONNECTIONS`      | `1`      |
    /// | `DB_ACQUIRE_TIMEOUT_SECS` | `30`     |
    ///
    /// Pool defaults come from [`PoolSettings::default`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url =
            non_empty(&lookup, "DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let defaults = PoolSettings::default();

        let max_connections: u32 = parse_or(
            &lookup,
            "DB_MAX_CONNECTIONS",
            defaults.max_connections,
            "a positive integer",
        )?;
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                name: "DB_MAX_CONNECTIONS",
                expected: "a positive integer",
                value: "0".to_string(),
            });
        }

        let acquire_timeout_secs: u64 = parse_or(
            &lookup,
            "DB_ACQUIRE_TIMEOUT_SECS",
            defaults.acquire_timeout.as_secs(),
            "a number of seconds",
        )?;

        Ok(Self {
            database_url,
            pool: PoolSettings {
                max_connections,
                acquire_timeout: Duration::from_secs(acquire_timeout_secs),
            },
        })
    }
}

/// Look up `name`, treating blank values as unset.
fn non_empty(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match non_empty(lookup, name) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
