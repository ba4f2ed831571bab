//! Runtime configuration
//!
//! Resolved from environment variables, with CLI flags layered on top by
//! the binary. Persisted AI switches live in the dataset, not here.

use std::env;
use std::path::PathBuf;

use crate::error::{Result, StorageError};

const ENV_DB_PATH: &str = "LIFEOS_DB";
const ENV_LOG: &str = "LIFEOS_LOG";
const ENV_AI_API_KEY: &str = "OPENAI_API_KEY";

pub const DEFAULT_LOG_FILTER: &str = "warn";
const APP_DIR: &str = "lifeos";
const DB_FILE: &str = "lifeos.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_filter: String,
    /// Key for the optional AI provider. Without it AI features stay idle.
    pub ai_api_key: Option<String>,
}

impl Config {
    /// `db_override` (from the command line) beats `LIFEOS_DB`, which beats
    /// the platform config directory.
    pub fn from_env(db_override: Option<PathBuf>) -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok(), dirs::config_dir(), db_override)
    }

    /// Build from an arbitrary variable lookup and config directory
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        config_dir: Option<PathBuf>,
        db_override: Option<PathBuf>,
    ) -> Result<Self> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let db_path = match db_override.or_else(|| non_empty(ENV_DB_PATH).map(PathBuf::from)) {
            Some(path) => path,
            None => config_dir
                .ok_or_else(|| {
                    StorageError::Config(format!(
                        "could not find config directory; set {}",
                        ENV_DB_PATH
                    ))
                })?
                .join(APP_DIR)
                .join(DB_FILE),
        };

        Ok(Self {
            db_path,
            log_filter: non_empty(ENV_LOG).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            ai_api_key: non_empty(ENV_AI_API_KEY),
        })
    }

    pub fn ai_available(&self) -> bool {
        self.ai_api_key.is_some()
    }
}
