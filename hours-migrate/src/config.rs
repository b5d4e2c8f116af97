//! Run configuration
//!
//! Values come from an env file (`env.txt` by default), the process
//! environment, and command-line overrides, in increasing precedence. The
//! result is a plain struct handed to the API client and the migration.

use anyhow::{Context, Result};
use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::api::ResilienceConfig;
use crate::transform::{ColumnMapping, ColumnTitles};

pub const DEFAULT_ENV_FILE: &str = "env.txt";
pub const DEFAULT_BASE_URL: &str = "https://api.smartsheet.com/2.0/";

pub const ACCESS_TOKEN: &str = "ACCESS_TOKEN";
pub const SOURCE_SHEET: &str = "SOURCE_SHEET";
pub const DESTINATION_SHEET: &str = "DESTINATION_SHEET";
pub const API_BASE_URL: &str = "API_BASE_URL";
pub const API_MAX_ATTEMPTS: &str = "API_MAX_ATTEMPTS";
pub const PROJECT_COLUMN: &str = "PROJECT_COLUMN";
pub const PERSON_COLUMN: &str = "PERSON_COLUMN";
pub const MONTH_COLUMN: &str = "MONTH_COLUMN";
pub const HOURS_COLUMN: &str = "HOURS_COLUMN";

/// Connection settings for the sheet API
#[derive(Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub access_token: String,
    pub resilience: ResilienceConfig,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .field("resilience", &self.resilience)
            .finish()
    }
}

/// Everything one migration run needs
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    pub api: ApiConfig,
    pub source_sheet: String,
    pub destination_sheet: String,
    pub column_mapping: ColumnMapping,
}

/// Command-line values that take precedence over the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub source_sheet: Option<String>,
    pub destination_sheet: Option<String>,
    pub base_url: Option<String>,
    pub max_attempts: Option<u32>,
    pub positional_columns: bool,
}

/// Load `path` (or `env.txt` in the working directory) into the process environment.
///
/// Variables already set in the environment win. A missing default file is
/// fine; a missing explicitly named file is an error.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>> {
    load_env_file_or(path, Path::new(DEFAULT_ENV_FILE))
}

fn load_env_file_or(path: Option<&Path>, default: &Path) -> Result<Option<PathBuf>> {
    let explicit = path.is_some();
    let path = path.unwrap_or(default).to_path_buf();

    match dotenvy::from_path(&path) {
        Ok(()) => {
            info!("Loaded configuration from {}", path.display());
            Ok(Some(path))
        }
        Err(dotenvy::Error::Io(e)) if !explicit && e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No {} found, using process environment only", path.display());
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load env file: {}", path.display())),
    }
}

impl MigrationConfig {
    /// Build from the process environment plus overrides
    pub fn from_env(overrides: &ConfigOverrides) -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), overrides)
    }

    /// Build from an arbitrary key lookup plus overrides
    pub fn from_lookup<F>(lookup: F, overrides: &ConfigOverrides) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &str, value: Option<String>| {
            value.ok_or_else(|| anyhow::anyhow!("Missing required configuration value: {}", key))
        };

        let access_token = required(ACCESS_TOKEN, get(ACCESS_TOKEN))?;
        let source_sheet = required(
            SOURCE_SHEET,
            overrides.source_sheet.clone().or_else(|| get(SOURCE_SHEET)),
        )?;
        let destination_sheet = required(
            DESTINATION_SHEET,
            overrides
                .destination_sheet
                .clone()
                .or_else(|| get(DESTINATION_SHEET)),
        )?;

        let base_url = overrides
            .base_url
            .clone()
            .or_else(|| get(API_BASE_URL))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut resilience = ResilienceConfig::builder();
        let max_attempts = match overrides.max_attempts {
            Some(n) => Some(n),
            None => get(API_MAX_ATTEMPTS)
                .map(|raw| {
                    raw.parse::<u32>().with_context(|| {
                        format!("{} must be a positive integer, got '{}'", API_MAX_ATTEMPTS, raw)
                    })
                })
                .transpose()?,
        };
        if let Some(n) = max_attempts {
            if n == 0 {
                anyhow::bail!("{} must be at least 1", API_MAX_ATTEMPTS);
            }
            resilience = resilience.max_attempts(n);
        }

        let column_mapping = if overrides.positional_columns {
            ColumnMapping::Positional
        } else {
            let defaults = ColumnTitles::default();
            ColumnMapping::ByTitle(ColumnTitles {
                project: get(PROJECT_COLUMN).unwrap_or(defaults.project),
                person: get(PERSON_COLUMN).unwrap_or(defaults.person),
                month: get(MONTH_COLUMN).unwrap_or(defaults.month),
                hours: get(HOURS_COLUMN).unwrap_or(defaults.hours),
            })
        };

        Ok(Self {
            api: ApiConfig {
                base_url,
                access_token,
                resilience: resilience.build(),
            },
            source_sheet,
            destination_sheet,
            column_mapping,
        })
    }
}
