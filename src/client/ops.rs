//! client::ops
//!
//! Primitive operations and their outcomes.
//!
//! Each primitive kind has a closed operation enum. [`Operation`] wraps
//! them so a session can execute any of them through one method, and
//! [`Outcome`] carries the typed result back.
//!
//! Version preconditions (`if_version`) are evaluated by the service. An
//! absent version means the operation is unconditional.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::traits::ClientError;
use crate::core::types::PrimitiveKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LockOp {
    /// Acquire, waiting until the lock is free. Yields the lock version.
    Lock,
    Unlock {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        if_version: Option<u64>,
    },
    IsLocked {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        if_version: Option<u64>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SetOp {
    Add { value: String },
    Contains { value: String },
    Remove { value: String },
    Size,
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MapOp {
    Put {
        key: String,
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        if_version: Option<u64>,
    },
    Get {
        key: String,
    },
    Remove {
        key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        if_version: Option<u64>,
    },
    Keys,
    Size,
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CounterOp {
    Get,
    Set { value: i64 },
    Increment { delta: i64 },
    Decrement { delta: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ListOp {
    Append { value: String },
    Insert { index: usize, value: String },
    Get { index: usize },
    Remove { index: usize },
    Items,
    Size,
    Clear,
}

/// Election operations. The session is the candidate for `Enter`/`Leave`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ElectionOp {
    Enter,
    Leave,
    GetTerm,
    Promote { candidate: String },
    Evict { candidate: String },
}

/// Any primitive operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "primitive", content = "operation", rename_all = "lowercase")]
pub enum Operation {
    Counter(CounterOp),
    Election(ElectionOp),
    List(ListOp),
    Lock(LockOp),
    Map(MapOp),
    Set(SetOp),
}

impl Operation {
    /// Kind of primitive this operation targets.
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Operation::Counter(_) => PrimitiveKind::Counter,
            Operation::Election(_) => PrimitiveKind::Election,
            Operation::List(_) => PrimitiveKind::List,
            Operation::Lock(_) => PrimitiveKind::Lock,
            Operation::Map(_) => PrimitiveKind::Map,
            Operation::Set(_) => PrimitiveKind::Set,
        }
    }
}

impl From<CounterOp> for Operation {
    fn from(op: CounterOp) -> Self {
        Operation::Counter(op)
    }
}

impl From<ElectionOp> for Operation {
    fn from(op: ElectionOp) -> Self {
        Operation::Election(op)
    }
}

impl From<ListOp> for Operation {
    fn from(op: ListOp) -> Self {
        Operation::List(op)
    }
}

impl From<LockOp> for Operation {
    fn from(op: LockOp) -> Self {
        Operation::Lock(op)
    }
}

impl From<MapOp> for Operation {
    fn from(op: MapOp) -> Self {
        Operation::Map(op)
    }
}

impl From<SetOp> for Operation {
    fn from(op: SetOp) -> Self {
        Operation::Set(op)
    }
}

/// A versioned map entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapEntry {
    pub key: String,
    pub value: String,
    pub version: u64,
}

impl fmt::Display for MapEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} (version {})", self.key, self.value, self.version)
    }
}

/// An election term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub term: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader: Option<String>,
    #[serde(default)]
    pub candidates: Vec<String>,
}

/// The result of one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Outcome {
    Unit,
    Bool(bool),
    Version(u64),
    Size(u64),
    Counter(i64),
    Value(Option<String>),
    Entry(Option<MapEntry>),
    Values(Vec<String>),
    Term(Term),
}

impl Outcome {
    fn variant(&self) -> &'static str {
        match self {
            Outcome::Unit => "unit",
            Outcome::Bool(_) => "bool",
            Outcome::Version(_) => "version",
            Outcome::Size(_) => "size",
            Outcome::Counter(_) => "counter",
            Outcome::Value(_) => "value",
            Outcome::Entry(_) => "entry",
            Outcome::Values(_) => "values",
            Outcome::Term(_) => "term",
        }
    }

    fn mismatch(&self, expected: &str) -> ClientError {
        ClientError::UnexpectedResponse(format!(
            "expected {} result, got {}",
            expected,
            self.variant()
        ))
    }

    pub fn into_unit(self) -> Result<(), ClientError> {
        match self {
            Outcome::Unit => Ok(()),
            other => Err(other.mismatch("unit")),
        }
    }

    pub fn into_bool(self) -> Result<bool, ClientError> {
        match self {
            Outcome::Bool(b) => Ok(b),
            other => Err(other.mismatch("bool")),
        }
    }

    pub fn into_version(self) -> Result<u64, ClientError> {
        match self {
            Outcome::Version(v) => Ok(v),
            other => Err(other.mismatch("version")),
        }
    }

    pub fn into_size(self) -> Result<u64, ClientError> {
        match self {
            Outcome::Size(n) => Ok(n),
            other => Err(other.mismatch("size")),
        }
    }

    pub fn into_counter(self) -> Result<i64, ClientError> {
        match self {
            Outcome::Counter(n) => Ok(n),
            other => Err(other.mismatch("counter")),
        }
    }

    pub fn into_value(self) -> Result<Option<String>, ClientError> {
        match self {
            Outcome::Value(v) => Ok(v),
            other => Err(other.mismatch("value")),
        }
    }

    pub fn into_entry(self) -> Result<Option<MapEntry>, ClientError> {
        match self {
            Outcome::Entry(e) => Ok(e),
            other => Err(other.mismatch("entry")),
        }
    }

    pub fn into_values(self) -> Result<Vec<String>, ClientError> {
        match self {
            Outcome::Values(v) => Ok(v),
            other => Err(other.mismatch("values")),
        }
    }

    pub fn into_term(self) -> Result<Term, ClientError> {
        match self {
            Outcome::Term(t) => Ok(t),
            other => Err(other.mismatch("term")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn operation_wire_form() {
        let op: Operation = MapOp::Put {
            key: "k".into(),
            value: "v".into(),
            if_version: Some(3),
        }
        .into();
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({
                "primitive": "map",
                "operation": {"op": "put", "key": "k", "value": "v", "if_version": 3}
            })
        );
    }

    #[test]
    fn absent_version_not_sent() {
        let op: Operation = LockOp::Unlock { if_version: None }.into();
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"primitive": "lock", "operation": {"op": "unlock"}})
        );
    }

    #[test]
    fn zero_version_is_sent() {
        let op: Operation = LockOp::IsLocked {
            if_version: Some(0),
        }
        .into();
        let value = serde_json::to_value(&op).unwrap();
        assert_eq!(value["operation"]["if_version"], json!(0));
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(Operation::from(SetOp::Size).kind(), PrimitiveKind::Set);
        assert_eq!(
            Operation::from(ElectionOp::GetTerm).kind(),
            PrimitiveKind::Election
        );
        assert_eq!(
            Operation::from(CounterOp::Get).kind(),
            PrimitiveKind::Counter
        );
    }

    #[test]
    fn outcome_parses() {
        let outcome: Outcome = serde_json::from_value(json!({"type": "bool", "value": true})).unwrap();
        assert_eq!(outcome, Outcome::Bool(true));

        let unit: Outcome = serde_json::from_value(json!({"type": "unit"})).unwrap();
        assert_eq!(unit, Outcome::Unit);

        let missing: Outcome = serde_json::from_value(json!({"type": "value", "value": null})).unwrap();
        assert_eq!(missing, Outcome::Value(None));
    }

    #[test]
    fn outcome_mismatch_is_unexpected_response() {
        let err = Outcome::Size(3).into_bool().unwrap_err();
        assert_eq!(
            err,
            ClientError::UnexpectedResponse("expected bool result, got size".into())
        );
    }
}
