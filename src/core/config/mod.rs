//! core::config
//!
//! The CLI configuration store.
//!
//! # Overview
//!
//! Four keys (`controller`, `namespace`, `group`, `app`) supply defaults for
//! name and group resolution. The store is loaded once at process start and
//! passed by reference; there is no process-global state.
//!
//! # Lifecycle
//!
//! [`Config::load`] → [`Config::get`] / [`Config::set`] / [`Config::delete`]
//! → [`Config::flush`]. Mutations only touch the in-memory document until
//! `flush` writes it back.
//!
//! # Locations
//!
//! Searched in order, first existing file wins:
//! 1. `--config <file>` or `$ATOMIX_CONFIG`
//! 2. `~/.atomix/config.toml`
//! 3. `/etc/atomix/config.toml`
//! 4. `./config.toml`
//!
//! A missing file is not an error. When an explicit file is given it is both
//! the read and the write location, whether or not it exists yet.
//!
//! # Example
//!
//! ```no_run
//! use atomix_cli::core::config::{Config, ConfigKey};
//!
//! let mut config = Config::load(None).unwrap();
//! config.set(ConfigKey::Namespace, "prod").unwrap();
//! config.flush().unwrap();
//! assert_eq!(config.get(ConfigKey::Namespace), Some("prod"));
//! ```

pub mod schema;

pub use schema::{ConfigFile, ConfigKey};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "ATOMIX_CONFIG";

/// File name looked up in each search directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

impl ConfigError {
    /// Whether this error came from the file system rather than a bad value.
    pub fn is_io(&self) -> bool {
        !matches!(self, ConfigError::InvalidValue(_))
    }
}

/// The loaded configuration store.
#[derive(Debug, Clone, Default)]
pub struct Config {
    values: ConfigFile,
    /// File the values were read from, if any
    loaded_from: Option<PathBuf>,
    /// File `flush` writes to; falls back to the canonical path
    write_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the explicit file or the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or
    /// parsed, or holds invalid values.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        Self::load_with_search(explicit.as_deref(), &Self::search_paths())
    }

    /// Load configuration with an explicit search list.
    pub fn load_with_search(
        explicit: Option<&Path>,
        search: &[PathBuf],
    ) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            let exists = path.exists();
            let values = if exists {
                Self::read(path)?
            } else {
                debug!(path = %path.display(), "explicit config file does not exist yet");
                ConfigFile::default()
            };
            return Ok(Self {
                values,
                loaded_from: exists.then(|| path.to_path_buf()),
                write_path: Some(path.to_path_buf()),
            });
        }

        for path in search {
            if path.is_file() {
                let values = Self::read(path)?;
                debug!(path = %path.display(), "loaded config");
                return Ok(Self {
                    values,
                    loaded_from: Some(path.clone()),
                    write_path: Some(path.clone()),
                });
            }
        }

        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Build a store over in-memory values with no backing file.
    pub fn in_memory(values: ConfigFile) -> Self {
        Self {
            values,
            loaded_from: None,
            write_path: None,
        }
    }

    /// Default search locations, in precedence order.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(3);
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".atomix").join(CONFIG_FILE_NAME));
        }
        paths.push(Path::new("/etc/atomix").join(CONFIG_FILE_NAME));
        paths.push(PathBuf::from(CONFIG_FILE_NAME));
        paths
    }

    /// Canonical write location: `~/.atomix/config.toml`.
    pub fn canonical_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".atomix").join(CONFIG_FILE_NAME))
    }

    fn read(path: &Path) -> Result<ConfigFile, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let values: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        values.validate()?;
        Ok(values)
    }

    /// Get a value.
    pub fn get(&self, key: ConfigKey) -> Option<&str> {
        self.values.slot(key).as_deref()
    }

    /// Set a value in memory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the value is empty or contains
    /// whitespace.
    pub fn set(&mut self, key: ConfigKey, value: impl Into<String>) -> Result<(), ConfigError> {
        let value = value.into();
        schema::validate_value(key, &value)?;
        *self.values.slot_mut(key) = Some(value);
        Ok(())
    }

    /// Remove a value in memory, returning the previous one.
    pub fn delete(&mut self, key: ConfigKey) -> Option<String> {
        self.values.slot_mut(key).take()
    }

    /// Write the document back to disk atomically.
    ///
    /// Returns the path written.
    pub fn flush(&self) -> Result<PathBuf, ConfigError> {
        let path = match &self.write_path {
            Some(path) => path.clone(),
            None => Self::canonical_path()?,
        };
        write_atomic(&path, &self.values)?;
        debug!(path = %path.display(), "wrote config");
        Ok(path)
    }

    /// The file the values were read from, if any.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }
}

/// Write a config file atomically (temp file in the same directory, then rename).
fn write_atomic(path: &Path, values: &ConfigFile) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let contents =
        toml::to_string_pretty(values).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

    let temp_path = path.with_extension("toml.tmp");
    let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
        path: temp_path.clone(),
        source: e,
    })?;

    file.write_all(contents.as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

    fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}
