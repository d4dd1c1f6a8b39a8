//! core::types
//!
//! Strong types shared by every layer.
//!
//! # Types
//!
//! - [`PrimitiveKind`] - The closed set of distributed primitive types
//!
//! Dispatch over primitive types is always an exhaustive `match` on
//! [`PrimitiveKind`]; adding a type is a compile-time checked change.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from type parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown primitive type '{0}'")]
    UnknownPrimitiveKind(String),
}

/// A distributed primitive type.
///
/// # Example
///
/// ```
/// use atomix_cli::core::types::PrimitiveKind;
///
/// let kind: PrimitiveKind = "lock".parse().unwrap();
/// assert_eq!(kind, PrimitiveKind::Lock);
/// assert_eq!(kind.to_string(), "lock");
/// assert!("queue".parse::<PrimitiveKind>().is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Counter,
    Election,
    List,
    Lock,
    Map,
    Set,
}

impl PrimitiveKind {
    /// Every primitive kind, in display order.
    pub const ALL: [PrimitiveKind; 6] = [
        PrimitiveKind::Counter,
        PrimitiveKind::Election,
        PrimitiveKind::List,
        PrimitiveKind::Lock,
        PrimitiveKind::Map,
        PrimitiveKind::Set,
    ];

    /// Lowercase name used on the command line and the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveKind::Counter => "counter",
            PrimitiveKind::Election => "election",
            PrimitiveKind::List => "list",
            PrimitiveKind::Lock => "lock",
            PrimitiveKind::Map => "map",
            PrimitiveKind::Set => "set",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrimitiveKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrimitiveKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| TypeError::UnknownPrimitiveKind(s.to_string()))
    }
}
