//! CLI configuration.
//!
//! Settings live in a TOML file. Resolution order:
//!
//! 1. `PCLOUD_CONFIG_PATH`, if set
//! 2. `<config dir>/pcloud/config.toml` (`~/.config/pcloud/config.toml` on
//!    Linux)
//!
//! A missing file is not an error: the defaults apply. `PCLOUD_ACCESS_TOKEN`
//! overrides the stored token.

use std::{
    ffi::OsString,
    fmt, fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

const CONFIG_PATH_ENV: &str = "PCLOUD_CONFIG_PATH";
const ACCESS_TOKEN_ENV: &str = "PCLOUD_ACCESS_TOKEN";

/// Errors raised while loading or saving the configuration.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Neither `PCLOUD_CONFIG_PATH` nor a platform config directory exists.
    #[error("no configuration directory available; set {CONFIG_PATH_ENV}")]
    NoConfigDir,
}

/// Contents of `config.toml`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// OAuth access token used for every authenticated call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// API host; defaults to [`pcloud::DEFAULT_BASE_URL`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    /// App credentials for `login`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("api_base_url", &self.api_base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Config {
    /// Loads the configuration from the resolved path and applies
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let config = match resolve_path(std::env::var_os(CONFIG_PATH_ENV)) {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        Ok(config.with_token_override(std::env::var(ACCESS_TOKEN_ENV).ok()))
    }

    /// Loads the file at `path`, returning defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes the configuration to the resolved path, creating parent
    /// directories as needed. Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if no path can be resolved or the write fails.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = resolve_path(std::env::var_os(CONFIG_PATH_ENV)).ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] if serialization or the write fails.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(io_error)
    }

    /// Replaces the stored token when `token` is a non-empty value.
    #[must_use]
    pub fn with_token_override(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.access_token = Some(token);
        }
        self
    }
}

/// Picks the config file path: the override if given, else the platform
/// default.
fn resolve_path(env_override: Option<OsString>) -> Option<PathBuf> {
    env_override
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::config_dir().map(|dir| dir.join("pcloud").join("config.toml")))
}
