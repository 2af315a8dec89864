//! Runtime configuration for the clinic database tools.
//!
//! # Responsibility
//! - Merge explicit settings, `VETDB_*` environment variables and defaults.
//! - Translate legacy-variant switches into service options.
//!
//! # Invariants
//! - Explicit settings win over environment values, which win over defaults.
//! - A resolved config always carries a normalized log level.

use crate::db::DEFAULT_DB_FILE_NAME;
use crate::logging::{default_log_level, normalize_level, normalize_log_dir};
use crate::service::customer_service::{CustomerServiceOptions, SearchMode};
use crate::validation::{PhoneRule, ValidationPolicy};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "VETDB_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "VETDB_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "VETDB_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyDbPath,
    InvalidLogLevel(String),
    InvalidLogDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDbPath => write!(f, "database path cannot be empty"),
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
            Self::InvalidLogDir(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ConfigError {}

/// Unresolved settings as supplied by a front end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigInput {
    pub db_path: Option<String>,
    pub log_level: Option<String>,
    pub log_dir: Option<String>,
    /// Accept 10-15 digit phone numbers instead of exactly 10.
    pub lenient_phone: bool,
    pub skip_postal_check: bool,
    pub no_validation: bool,
    /// Skip the same-last-name confirmation on add.
    pub no_name_check: bool,
    pub first_match: bool,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// File logging is disabled when `None`.
    pub log_dir: Option<PathBuf>,
    pub service: CustomerServiceOptions,
}

impl AppConfig {
    /// Resolves `input` against the process environment.
    pub fn resolve(input: ConfigInput) -> Result<Self, ConfigError> {
        Self::resolve_with_env(input, |key| std::env::var(key).ok())
    }

    /// Resolves `input` using `env` for variable lookups.
    pub fn resolve_with_env<F>(input: ConfigInput, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Exported-but-empty variables count as unset.
        let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let db_path = input
            .db_path
            .or_else(|| env(ENV_DB_PATH))
            .unwrap_or_else(|| DEFAULT_DB_FILE_NAME.to_string());
        if db_path.trim().is_empty() {
            return Err(ConfigError::EmptyDbPath);
        }

        let log_level = match input.log_level.or_else(|| env(ENV_LOG_LEVEL)) {
            Some(level) => normalize_level(&level).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        let log_dir = match input.log_dir.or_else(|| env(ENV_LOG_DIR)) {
            Some(dir) => Some(normalize_log_dir(&dir).map_err(ConfigError::InvalidLogDir)?),
            None => None,
        };

        let validation = if input.no_validation {
            None
        } else {
            Some(ValidationPolicy {
                phone: if input.lenient_phone {
                    PhoneRule::Extended
                } else {
                    PhoneRule::TenDigits
                },
                check_postal_code: !input.skip_postal_check,
            })
        };

        Ok(Self {
            db_path: PathBuf::from(db_path.trim()),
            log_level,
            log_dir,
            service: CustomerServiceOptions {
                validation,
                confirm_last_name_collisions: !input.no_name_check,
                search_mode: if input.first_match {
                    SearchMode::First
                } else {
                    SearchMode::All
                },
            },
        })
    }
}
