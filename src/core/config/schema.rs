//! core::config::schema
//!
//! Configuration schema types.
//!
//! The config file is a flat TOML document holding at most four keys:
//!
//! ```toml
//! controller = "atomix-controller.kube-system.svc.cluster.local:5679"
//! namespace = "default"
//! group = "raft"
//! app = "inventory"
//! ```
//!
//! # Validation
//!
//! Values must be non-empty and must not contain whitespace.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ConfigError;

/// A configuration key.
///
/// The set of keys is closed; anything else is rejected by the argument
/// parser before it reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ConfigKey {
    /// Controller endpoint (`host:port` or URL)
    Controller,
    /// Default namespace
    Namespace,
    /// Default partition group
    Group,
    /// Default application scope for primitive names
    App,
}

impl ConfigKey {
    /// Every key, in file order.
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::Controller,
        ConfigKey::Namespace,
        ConfigKey::Group,
        ConfigKey::App,
    ];

    /// The key as it appears in the config file.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::Controller => "controller",
            ConfigKey::Namespace => "namespace",
            ConfigKey::Group => "group",
            ConfigKey::App => "app",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// On-disk configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Controller endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,

    /// Default namespace
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Default partition group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Default application scope
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
}

impl ConfigFile {
    /// Borrow the slot for a key.
    pub fn slot(&self, key: ConfigKey) -> &Option<String> {
        match key {
            ConfigKey::Controller => &self.controller,
            ConfigKey::Namespace => &self.namespace,
            ConfigKey::Group => &self.group,
            ConfigKey::App => &self.app,
        }
    }

    /// Mutably borrow the slot for a key.
    pub fn slot_mut(&mut self, key: ConfigKey) -> &mut Option<String> {
        match key {
            ConfigKey::Controller => &mut self.controller,
            ConfigKey::Namespace => &mut self.namespace,
            ConfigKey::Group => &mut self.group,
            ConfigKey::App => &mut self.app,
        }
    }

    /// Validate every present value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for empty values or values
    /// containing whitespace.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for key in ConfigKey::ALL {
            if let Some(value) = self.slot(key) {
                validate_value(key, value)?;
            }
        }
        Ok(())
    }
}

/// Validate a single config value.
pub fn validate_value(key: ConfigKey, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::InvalidValue(format!("{} cannot be empty", key)));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidValue(format!(
            "{} cannot contain whitespace: '{}'",
            key, value
        )));
    }
    Ok(())
}
