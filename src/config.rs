//! Configuration for the license project core.
//!
//! Configuration is loaded from multiple sources with the following precedence:
//! 1. Environment variables (highest priority)
//! 2. `rlic/config.toml` in the platform config directory
//! 3. `rlic.toml` in the working directory
//! 4. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `RLIC_TRIAL_DAYS` - Validity in days of a freshly issued license
//! - `RLIC_DEFAULT_OWNER` - Placeholder owner name for a fresh license
//! - `RLIC_DEFAULT_LICENSE_TYPE` - License type of a fresh license (trial, standard, ...)
//! - `RLIC_FILE_EXTENSION` - Extension offered by open/save dialogs
//! - `RLIC_LOGGING_ENABLED` - Enable logging
//! - `RLIC_LOG_LEVEL` - Log level (trace, debug, info, warn, error)
//!
//! Files and environment are only consulted through [`get_config`] (and
//! `ProjectWorkflow::from_config`). A workflow built with `new` or
//! `with_config` never reads the environment.

use config::Config;
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::errors::{ProjectError, ProjectResult};
use crate::project::LicenseType;

/// Longest allowed validity of a freshly issued license (100 years).
pub const MAX_TRIAL_DAYS: i64 = 36_500;

/// Global configuration singleton.
static CONFIG: OnceLock<RlicConfig> = OnceLock::new();

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RlicConfig {
    /// Defaults applied to newly issued licenses
    pub issuance: IssuanceConfig,
    /// Project file naming
    pub files: FilesConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Defaults for freshly issued licenses.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IssuanceConfig {
    /// Days between issuance and expiration
    pub trial_days: i64,
    /// Owner placeholder pending operator edit
    pub default_owner: String,
    /// License type name, e.g. "trial"
    pub default_license_type: String,
}

impl Default for IssuanceConfig {
    fn default() -> Self {
        Self {
            trial_days: 30,
            default_owner: "John Doe".to_string(),
            default_license_type: "trial".to_string(),
        }
    }
}

impl IssuanceConfig {
    /// The configured default license type.
    ///
    /// Falls back to `Trial` for names that do not parse; `validate` rejects
    /// those before they get here when loading through `get_config`.
    pub fn license_type(&self) -> LicenseType {
        LicenseType::from_str(&self.default_license_type).unwrap_or(LicenseType::Trial)
    }
}

/// Project file naming used by path-selection dialogs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Extension without the leading dot
    pub extension: String,
    /// Human-readable filter label
    pub filter_name: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            extension: "rlic".to_string(),
            filter_name: "Rhino License".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable logging
    pub enabled: bool,
    /// Log level: trace, debug, info, warn, error
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
        }
    }
}

fn config_err(e: config::ConfigError) -> ProjectError {
    ProjectError::Config(e.to_string())
}

impl RlicConfig {
    /// Load configuration from files and environment, bypassing the cache.
    pub fn load() -> ProjectResult<Self> {
        let user_dir = dirs::config_dir().map(|dir| dir.join("rlic"));
        Self::load_from(Path::new("."), user_dir.as_deref())
    }

    /// Load configuration from `rlic.toml` in `work_dir`, then `config.toml`
    /// in `user_dir`, then the environment.
    pub fn load_from(work_dir: &Path, user_dir: Option<&Path>) -> ProjectResult<Self> {
        let work_file = work_dir.join("rlic");
        let mut builder = Config::builder()
            .set_default("issuance.trial_days", 30)
            .map_err(config_err)?
            .set_default("issuance.default_owner", "John Doe")
            .map_err(config_err)?
            .set_default("issuance.default_license_type", "trial")
            .map_err(config_err)?
            .set_default("files.extension", "rlic")
            .map_err(config_err)?
            .set_default("files.filter_name", "Rhino License")
            .map_err(config_err)?
            .set_default("logging.enabled", false)
            .map_err(config_err)?
            .set_default("logging.level", "info")
            .map_err(config_err)?
            .add_source(config::File::with_name(&work_file.to_string_lossy()).required(false));

        if let Some(dir) = user_dir {
            let user_file = dir.join("config.toml");
            builder = builder.add_source(config::File::from(user_file).required(false));
        }

        let builder = builder
            .set_override_option(
                "issuance.trial_days",
                env::var("RLIC_TRIAL_DAYS")
                    .ok()
                    .and_then(|v| v.parse::<i64>().ok()),
            )
            .map_err(config_err)?
            .set_override_option("issuance.default_owner", env::var("RLIC_DEFAULT_OWNER").ok())
            .map_err(config_err)?
            .set_override_option(
                "issuance.default_license_type",
                env::var("RLIC_DEFAULT_LICENSE_TYPE").ok(),
            )
            .map_err(config_err)?
            .set_override_option("files.extension", env::var("RLIC_FILE_EXTENSION").ok())
            .map_err(config_err)?
            .set_override_option(
                "logging.enabled",
                env::var("RLIC_LOGGING_ENABLED")
                    .ok()
                    .and_then(|v| v.parse::<bool>().ok()),
            )
            .map_err(config_err)?
            .set_override_option("logging.level", env::var("RLIC_LOG_LEVEL").ok())
            .map_err(config_err)?;

        let settings = builder
            .build()
            .map_err(|e| ProjectError::Config(format!("failed to build config: {e}")))?;

        settings
            .try_deserialize()
            .map_err(|e| ProjectError::Config(format!("failed to deserialize config: {e}")))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ProjectResult<()> {
        if self.issuance.trial_days <= 0 || self.issuance.trial_days > MAX_TRIAL_DAYS {
            return Err(ProjectError::Config(format!(
                "issuance.trial_days must be between 1 and {MAX_TRIAL_DAYS}, got {}",
                self.issuance.trial_days
            )));
        }

        if self.issuance.default_owner.trim().is_empty() {
            return Err(ProjectError::Config(
                "issuance.default_owner cannot be empty".to_string(),
            ));
        }

        if let Err(e) = LicenseType::from_str(&self.issuance.default_license_type) {
            return Err(ProjectError::Config(format!(
                "issuance.default_license_type: {e}"
            )));
        }

        let extension = self.files.extension.trim_start_matches('.');
        if extension.is_empty() || extension.contains(|c: char| matches!(c, '/' | '\\' | '*')) {
            return Err(ProjectError::Config(format!(
                "files.extension is not a usable file extension: '{}'",
                self.files.extension
            )));
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ProjectError::Config(format!(
                    "logging.level must be one of: trace, debug, info, warn, error. Got '{other}'"
                )));
            }
        }

        Ok(())
    }
}

/// Get the global configuration.
///
/// Loads and validates on first access, then returns the cached value.
pub fn get_config() -> ProjectResult<&'static RlicConfig> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }

    let config = RlicConfig::load()?;
    config.validate()?;

    // Another thread may have won the race; either value is valid.
    let _ = CONFIG.set(config);

    CONFIG
        .get()
        .ok_or_else(|| ProjectError::Config("configuration was not stored".to_string()))
}

/// Initialize configuration explicitly.
///
/// Call this early to surface configuration errors before the first command.
pub fn init_config() -> ProjectResult<&'static RlicConfig> {
    get_config()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RlicConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.issuance.trial_days, 30);
        assert_eq!(config.issuance.license_type(), LicenseType::Trial);
        assert_eq!(config.files.extension, "rlic");
    }

    #[test]
    fn rejects_non_positive_trial_days() {
        let mut config = RlicConfig::default();
        config.issuance.trial_days = 0;
        assert!(matches!(config.validate(), Err(ProjectError::Config(_))));
    }

    #[test]
    fn trial_days_upper_bound() {
        let mut config = RlicConfig::default();
        config.issuance.trial_days = MAX_TRIAL_DAYS;
        assert!(config.validate().is_ok());

        config.issuance.trial_days = MAX_TRIAL_DAYS + 1;
        assert!(matches!(config.validate(), Err(ProjectError::Config(_))));

        config.issuance.trial_days = 100_000_000;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("100000000"));
    }

    #[test]
    fn rejects_unknown_license_type() {
        let mut config = RlicConfig::default();
        config.issuance.default_license_type = "lifetime".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("lifetime"));
    }

    #[test]
    fn rejects_bad_log_level() {
        let mut config = RlicConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_wildcard_extension() {
        let mut config = RlicConfig::default();
        config.files.extension = "*.rlic".to_string();
        assert!(config.validate().is_err());
    }
}
