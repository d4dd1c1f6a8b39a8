//! core::naming
//!
//! Primitive and partition group name resolution.
//!
//! # Qualified names
//!
//! A raw primitive name may carry its own qualifiers:
//!
//! - `name`
//! - `group.name`
//! - `namespace.group.name`
//!
//! Group names follow the same shape one level up: `group` or
//! `namespace.group`.
//!
//! # Precedence
//!
//! For each part, highest first: a qualifier embedded in the name or a
//! command-line flag, then the persisted config value, then the built-in
//! default. An embedded qualifier that disagrees with a flag is rejected.
//!
//! Resolution is a pure function of the raw name, the overrides and the
//! loaded config snapshot.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

use super::config::{Config, ConfigKey};

/// Namespace used when neither a flag nor the config names one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Application scope used when neither a flag nor the config names one.
pub const DEFAULT_APP: &str = "default";

/// Partition group used when neither a flag nor the config names one.
pub const DEFAULT_GROUP: &str = "default";

/// Controller endpoint used when neither a flag nor the config names one.
pub const DEFAULT_CONTROLLER: &str = "localhost:5679";

/// Errors from name resolution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("name cannot be empty")]
    Empty,

    #[error("name '{0}' has too many segments")]
    TooManySegments(String),

    #[error("name '{0}' contains an empty segment")]
    EmptySegment(String),

    #[error("name '{name}' contains invalid character '{ch}'")]
    InvalidCharacter { name: String, ch: char },

    #[error("invalid {field} '{value}': {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field} '{embedded}' in name conflicts with --{field} '{flag}'")]
    Conflict {
        field: &'static str,
        embedded: String,
        flag: String,
    },
}

/// Client-level values supplied on the command line.
///
/// Every field is optional; absent values fall back to the config store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub controller: Option<String>,
    pub namespace: Option<String>,
    pub app: Option<String>,
    pub group: Option<String>,
}

/// A fully resolved primitive name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrimitiveName {
    pub namespace: String,
    pub app: String,
    pub name: String,
}

impl fmt::Display for PrimitiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.namespace, self.app, self.name)
    }
}

/// A resolved partition group address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupReference {
    pub controller: String,
    pub namespace: String,
    pub name: String,
}

impl fmt::Display for GroupReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

/// A primitive name together with the group that hosts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub group: GroupReference,
    pub primitive: PrimitiveName,
}

/// Resolve a raw primitive name.
///
/// # Example
///
/// ```
/// use atomix_cli::core::config::{Config, ConfigFile};
/// use atomix_cli::core::naming::{resolve_primitive, Overrides};
///
/// let config = Config::in_memory(ConfigFile::default());
/// let resolved = resolve_primitive("raft.mylock", &Overrides::default(), &config).unwrap();
///
/// assert_eq!(resolved.group.name, "raft");
/// assert_eq!(resolved.primitive.to_string(), "default.default.mylock");
/// ```
pub fn resolve_primitive(
    raw: &str,
    overrides: &Overrides,
    config: &Config,
) -> Result<ResolvedName, NameError> {
    let segments = split(raw, 3)?;
    let (namespace, group, name) = match segments.as_slice() {
        [name] => (None, None, *name),
        [group, name] => (None, Some(*group), *name),
        [namespace, group, name] => (Some(*namespace), Some(*group), *name),
        _ => return Err(NameError::TooManySegments(raw.trim().to_string())),
    };

    let namespace = pick(
        "namespace",
        namespace,
        overrides.namespace.as_deref(),
        config.get(ConfigKey::Namespace),
        DEFAULT_NAMESPACE,
    )?;
    let group_name = pick(
        "group",
        group,
        overrides.group.as_deref(),
        config.get(ConfigKey::Group),
        DEFAULT_GROUP,
    )?;
    let app = pick(
        "app",
        None,
        overrides.app.as_deref(),
        config.get(ConfigKey::App),
        DEFAULT_APP,
    )?;

    let resolved = ResolvedName {
        group: GroupReference {
            controller: controller(overrides, config),
            namespace: namespace.clone(),
            name: group_name,
        },
        primitive: PrimitiveName {
            namespace,
            app,
            name: name.to_string(),
        },
    };
    debug!(primitive = %resolved.primitive, group = %resolved.group, "resolved name");
    Ok(resolved)
}

/// Resolve a partition group reference.
///
/// With no raw name the group comes from `--group`, then the config, then the
/// default.
pub fn resolve_group(
    raw: Option<&str>,
    overrides: &Overrides,
    config: &Config,
) -> Result<GroupReference, NameError> {
    let (namespace, group) = match raw {
        Some(raw) => match split(raw, 2)?.as_slice() {
            [group] => (None, Some(*group)),
            [namespace, group] => (Some(*namespace), Some(*group)),
            _ => return Err(NameError::TooManySegments(raw.trim().to_string())),
        },
        None => (None, None),
    };

    let namespace = pick(
        "namespace",
        namespace,
        overrides.namespace.as_deref(),
        config.get(ConfigKey::Namespace),
        DEFAULT_NAMESPACE,
    )?;
    let name = match group {
        Some(group) => group.to_string(),
        None => pick(
            "group",
            None,
            overrides.group.as_deref(),
            config.get(ConfigKey::Group),
            DEFAULT_GROUP,
        )?,
    };

    let reference = GroupReference {
        controller: controller(overrides, config),
        namespace,
        name,
    };
    debug!(group = %reference, controller = %reference.controller, "resolved group");
    Ok(reference)
}

/// Effective controller endpoint.
pub fn controller(overrides: &Overrides, config: &Config) -> String {
    overrides
        .controller
        .as_deref()
        .or_else(|| config.get(ConfigKey::Controller))
        .unwrap_or(DEFAULT_CONTROLLER)
        .to_string()
}

/// Effective namespace, ignoring any name qualifiers.
pub fn namespace(overrides: &Overrides, config: &Config) -> Result<String, NameError> {
    pick(
        "namespace",
        None,
        overrides.namespace.as_deref(),
        config.get(ConfigKey::Namespace),
        DEFAULT_NAMESPACE,
    )
}

/// Validate a single name segment.
pub fn validate_segment(segment: &str) -> Result<(), NameError> {
    if segment.is_empty() {
        return Err(NameError::Empty);
    }
    match segment
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        Some(ch) => Err(NameError::InvalidCharacter {
            name: segment.to_string(),
            ch,
        }),
        None => Ok(()),
    }
}

fn split(raw: &str, max: usize) -> Result<Vec<&str>, NameError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(NameError::Empty);
    }

    let segments: Vec<&str> = raw.split('.').collect();
    if segments.len() > max {
        return Err(NameError::TooManySegments(raw.to_string()));
    }
    if segments.iter().any(|s| s.is_empty()) {
        return Err(NameError::EmptySegment(raw.to_string()));
    }
    for segment in &segments {
        validate_segment(segment).map_err(|e| match e {
            NameError::InvalidCharacter { ch, .. } => NameError::InvalidCharacter {
                name: raw.to_string(),
                ch,
            },
            other => other,
        })?;
    }
    Ok(segments)
}

fn pick(
    field: &'static str,
    embedded: Option<&str>,
    flag: Option<&str>,
    configured: Option<&str>,
    default: &str,
) -> Result<String, NameError> {
    match (embedded, flag) {
        (Some(embedded), Some(flag)) if embedded != flag.trim() => Err(NameError::Conflict {
            field,
            embedded: embedded.to_string(),
            flag: flag.to_string(),
        }),
        (Some(value), _) => Ok(value.to_string()),
        (None, Some(value)) => checked(field, value),
        (None, None) => match configured {
            Some(value) => checked(field, value),
            None => Ok(default.to_string()),
        },
    }
}

/// Validate a value that did not come from the raw name itself.
fn checked(field: &'static str, value: &str) -> Result<String, NameError> {
    let trimmed = value.trim();
    validate_segment(trimmed).map_err(|err| NameError::InvalidValue {
        field,
        value: value.to_string(),
        reason: match err {
            NameError::Empty => "cannot be empty".to_string(),
            NameError::InvalidCharacter { ch, .. } => format!("contains invalid character '{}'", ch),
            other => other.to_string(),
        },
    })?;
    Ok(trimmed.to_string())
}
