use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use platform_store::{DEFAULT_SOFT_LIMIT, StorageSettings};

pub const DEFAULT_DATA_DIR: &str = ".hr-data";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage: StorageSettings,
    /// Forced interface language; `None` defers to the saved preference and `LANG`.
    pub language: Option<String>,
    pub seed_on_empty: bool,
    pub log_filter: Option<String>,
}

impl AppConfig {
    /// Reads the `HR_*` environment, after loading a `.env` file when one exists.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let dir = env_optional("HR_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let soft_limit_bytes = match env_optional("HR_STORAGE_SOFT_LIMIT") {
            Some(raw) => parse_limit(&raw)?,
            None => DEFAULT_SOFT_LIMIT,
        };
        let seed_on_empty = env_optional("HR_SEED_ON_EMPTY")
            .map(|val| parse_flag(&val))
            .unwrap_or(true);

        Ok(Self {
            storage: StorageSettings {
                dir,
                soft_limit_bytes,
            },
            language: env_optional("HR_LANG"),
            seed_on_empty,
            log_filter: env_optional("HR_LOG"),
        })
    }

    /// Applies command-line flags on top of the environment.
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, language: Option<String>) -> Self {
        if let Some(dir) = data_dir {
            self.storage.dir = dir;
        }
        if language.is_some() {
            self.language = language;
        }
        self
    }
}

fn env_optional(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes")
}

fn parse_limit(raw: &str) -> Result<usize> {
    let limit: usize = raw
        .parse()
        .with_context(|| format!("invalid HR_STORAGE_SOFT_LIMIT `{raw}`"))?;
    if limit == 0 {
        return Err(anyhow!("HR_STORAGE_SOFT_LIMIT must be greater than zero"));
    }
    Ok(limit)
}
