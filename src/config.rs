//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/clibase/clibase.toml`
//! 3. Environment variables: `CLIBASE_*` prefix
//!
//! Command-line flags of a concrete application are applied on top of these.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::Verbosity;

/// Name used for the config directory and file.
pub const APP_NAME: &str = "clibase";

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "CLIBASE";

/// Unified configuration for clibase applications.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Initial verbosity: 0 silent, 1 normal, 2 verbose
    pub verbosity: Verbosity,
    /// Log file (default: next to the binary)
    pub log_file: Option<PathBuf>,
    /// Timezone installed when `TZ` is not set
    pub default_timezone: String,
    /// Lift soft CPU-time and address-space limits at startup
    pub raise_limits: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Normal,
            log_file: None,
            default_timezone: "UTC".to_string(),
            raise_limits: true,
        }
    }
}

/// Get the XDG config directory for clibase.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(format!("{}.toml", APP_NAME)))
}

/// Expand `~`, `$VAR` and `${VAR}`; leaves the input untouched on failure.
fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Load settings from the global config file and `CLIBASE_*` variables.
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), ENV_PREFIX)
    }

    /// Load settings from an explicit config file and env prefix.
    ///
    /// A missing file is skipped. Environment variables named
    /// `<env_prefix>_<FIELD>` override file values.
    pub fn load_from(config_file: Option<&Path>, env_prefix: &str) -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("verbosity", i64::from(u8::from(defaults.verbosity)))
            .map_err(config_err)?
            .set_default("default_timezone", defaults.default_timezone.clone())
            .map_err(config_err)?
            .set_default("raise_limits", defaults.raise_limits)
            .map_err(config_err)?;

        if let Some(path) = config_file {
            if path.exists() {
                builder = builder.add_source(File::from(path.to_path_buf()).required(false));
            }
        }

        builder = builder.add_source(Environment::with_prefix(env_prefix).try_parsing(true));

        let config = builder.build().map_err(config_err)?;
        let mut settings: Self = config.try_deserialize().map_err(config_err)?;

        // Expand ~ and $VAR in path-like fields
        settings.expand_paths();

        Ok(settings)
    }

    fn expand_paths(&mut self) {
        if let Some(log_file) = &self.log_file {
            let expanded = expand_env_vars(log_file.to_string_lossy().as_ref());
            self.log_file = Some(PathBuf::from(expanded));
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# clibase configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/clibase/clibase.toml
#   Env:    CLIBASE_* environment variables (explicit overrides)

# Message level: 0 = silent, 1 = normal, 2 = verbose
# verbosity = 1

# Log file (default: <binary>.log next to the binary)
# log_file = "~/.local/state/clibase.log"

# Timezone used when TZ is not set
# default_timezone = "UTC"

# Lift soft CPU-time and address-space limits at startup
# raise_limits = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
