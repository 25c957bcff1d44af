//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/xargproject/xargproject.toml`
//! 3. Environment variables: `XARGPROJECT_*` prefix
//! 4. Command-line flags (applied by the commands themselves)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::expand_env_vars;

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "XARGPROJECT";

/// Unified configuration for xargproject.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// License used by `init` when `--license` is not given
    pub license: String,
    /// Copyright holder written into LICENSE (default: project name)
    pub author: Option<String>,
    /// Directory new projects are created in (default: cwd)
    pub directory: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            license: "MIT".to_string(),
            author: None,
            directory: None,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub license: Option<String>,
    pub author: Option<String>,
    pub directory: Option<PathBuf>,
}

/// Get the XDG config directory for xargproject.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "xargproject").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("xargproject.toml"))
}

fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            license: overlay
                .license
                .clone()
                .unwrap_or_else(|| self.license.clone()),
            author: overlay.author.clone().or_else(|| self.author.clone()),
            directory: overlay
                .directory
                .clone()
                .or_else(|| self.directory.clone()),
        }
    }

    /// Expand `~`, `$VAR` and `${VAR}` in `directory`.
    fn expand_paths(&mut self) {
        if let Some(dir) = &self.directory {
            self.directory = Some(PathBuf::from(expand_env_vars(
                dir.to_string_lossy().as_ref(),
            )));
        }
    }

    /// Load settings from the global config file and `XARGPROJECT_*` variables.
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_with(global_config_path().as_deref(), ENV_PREFIX)
    }

    /// Load settings from an explicit config file and environment prefix.
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load_with(config_file: Option<&Path>, env_prefix: &str) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(path) = config_file {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current, env_prefix)?;
        current.expand_paths();
        Ok(current)
    }

    /// Apply `<prefix>_*` environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self, env_prefix: &str) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("license") {
            settings.license = val;
        }
        if let Ok(val) = config.get_string("author") {
            settings.author = Some(val);
        }
        if let Ok(val) = config.get_string("directory") {
            settings.directory = Some(PathBuf::from(val));
        }
        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# xargproject configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/xargproject/xargproject.toml
#   Env:    XARGPROJECT_* environment variables (e.g. XARGPROJECT_LICENSE=GPLv3)
#   Flags:  xargproject init --license/--author/--dir

# License for new projects (MIT, Apache-2.0, BSD-3-Clause, GPLv2, GPLv3, LGPLv3, MPL-2.0)
# license = "MIT"

# Copyright holder written into LICENSE (default: project name)
# author = "Jane Doe"

# Directory new projects are created in (default: current directory)
# directory = "~/src"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
