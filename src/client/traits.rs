//! client::traits
//!
//! Controller and session traits for talking to a cluster.
//!
//! # Design
//!
//! Both traits are async because every call crosses the network. Every
//! remote call takes a `&TimeoutContext`; implementations must honor its
//! deadline. No method retries.
//!
//! A [`Connector`] turns an endpoint into a [`Controller`]. A controller
//! manages partition groups and opens [`Session`]s. A session is bound to
//! one group and executes primitive operations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::ops::{Operation, Outcome};
use crate::core::naming::{GroupReference, PrimitiveName};
use crate::core::timeout::{format_duration, TimeoutContext, TimedOut};
use crate::core::types::PrimitiveKind;

/// Errors from controller and session operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The controller could not be reached.
    #[error("failed to connect to controller at {endpoint}: {message}")]
    Connection { endpoint: String, message: String },

    /// The call did not finish before its deadline.
    #[error("operation timed out after {}", format_duration(*.0))]
    Timeout(Duration),

    /// The requested group or primitive does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A version precondition did not hold.
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    /// The service does not support the request.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// The service rejected the request.
    #[error("{0}")]
    Remote(String),

    /// The service answered with something we could not interpret.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl From<TimedOut> for ClientError {
    fn from(err: TimedOut) -> Self {
        ClientError::Timeout(err.0)
    }
}

/// Replication protocol for a partition group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Protocol {
    Raft {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        election_timeout_ms: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        heartbeat_interval_ms: Option<u64>,
    },
    Log {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        retention_entries: Option<u64>,
    },
}

impl Protocol {
    /// Raft with service-side defaults.
    pub fn raft() -> Self {
        Protocol::Raft {
            election_timeout_ms: None,
            heartbeat_interval_ms: None,
        }
    }

    /// Log with service-side defaults.
    pub fn log() -> Self {
        Protocol::Log {
            retention_entries: None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Protocol::Raft { .. } => "raft",
            Protocol::Log { .. } => "log",
        }
    }
}

impl Default for Protocol {
    fn default() -> Self {
        Protocol::raft()
    }
}

/// Request to create a partition group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub protocol: Protocol,
    /// Number of partitions, at least 1
    pub partitions: u32,
    /// Replicas per partition, at least 1
    pub partition_size: u32,
}

impl Default for GroupSpec {
    fn default() -> Self {
        Self {
            protocol: Protocol::default(),
            partitions: 1,
            partition_size: 1,
        }
    }
}

/// A partition group as reported by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionGroup {
    pub name: String,
    pub namespace: String,
    pub partitions: u32,
    pub partition_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
}

/// A primitive hosted by a partition group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimitiveInfo {
    pub kind: PrimitiveKind,
    pub name: PrimitiveName,
}

/// A controller managing partition groups.
#[async_trait]
pub trait Controller: Send + Sync {
    /// Endpoint this controller talks to.
    fn endpoint(&self) -> &str;

    /// List groups in a namespace.
    async fn list_groups(
        &self,
        ctx: &TimeoutContext,
        namespace: &str,
    ) -> Result<Vec<PartitionGroup>, ClientError>;

    /// Get one group.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the group does not exist
    async fn get_group(
        &self,
        ctx: &TimeoutContext,
        group: &GroupReference,
    ) -> Result<PartitionGroup, ClientError>;

    /// Create a group.
    ///
    /// # Errors
    ///
    /// - `Remote` if a group with that name already exists
    /// - `Unsupported` if the protocol is not available
    async fn create_group(
        &self,
        ctx: &TimeoutContext,
        group: &GroupReference,
        spec: GroupSpec,
    ) -> Result<PartitionGroup, ClientError>;

    /// Delete a group.
    async fn delete_group(
        &self,
        ctx: &TimeoutContext,
        group: &GroupReference,
    ) -> Result<(), ClientError>;

    /// Open a session on a group.
    ///
    /// The caller owns the session and must call [`Session::close`].
    async fn open_session(
        &self,
        ctx: &TimeoutContext,
        group: &GroupReference,
    ) -> Result<Arc<dyn Session>, ClientError>;
}

/// A live session bound to one partition group.
#[async_trait]
pub trait Session: Send + Sync {
    /// Session identifier assigned by the service.
    fn id(&self) -> &str;

    /// The group this session is bound to.
    fn group(&self) -> &GroupReference;

    /// Open a primitive, creating it if missing.
    ///
    /// # Errors
    ///
    /// - `Remote` if a primitive of a different kind holds the name
    async fn open_primitive(
        &self,
        ctx: &TimeoutContext,
        kind: PrimitiveKind,
        name: &PrimitiveName,
    ) -> Result<(), ClientError>;

    /// Execute one operation against a primitive.
    async fn execute(
        &self,
        ctx: &TimeoutContext,
        name: &PrimitiveName,
        operation: Operation,
    ) -> Result<Outcome, ClientError>;

    /// Delete a primitive and its state.
    async fn delete_primitive(
        &self,
        ctx: &TimeoutContext,
        kind: PrimitiveKind,
        name: &PrimitiveName,
    ) -> Result<(), ClientError>;

    /// List primitives in the group, optionally of one kind.
    async fn list_primitives(
        &self,
        ctx: &TimeoutContext,
        kind: Option<PrimitiveKind>,
    ) -> Result<Vec<PrimitiveInfo>, ClientError>;

    /// Close the session, releasing anything it holds.
    async fn close(&self, ctx: &TimeoutContext) -> Result<(), ClientError>;
}

/// Creates controllers for endpoints.
pub trait Connector: Send + Sync {
    /// Build a controller client for `endpoint`.
    ///
    /// # Errors
    ///
    /// - `Connection` if the endpoint is malformed or the client cannot be built
    fn connect(&self, endpoint: &str) -> Result<Arc<dyn Controller>, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_error_display() {
        assert_eq!(
            ClientError::Timeout(Duration::from_millis(1)).to_string(),
            "operation timed out after 1ms"
        );
        assert_eq!(
            ClientError::Remote("lock is held".into()).to_string(),
            "lock is held"
        );
        assert_eq!(
            ClientError::Connection {
                endpoint: "localhost:5679".into(),
                message: "connection refused".into(),
            }
            .to_string(),
            "failed to connect to controller at localhost:5679: connection refused"
        );
    }

    #[test]
    fn timed_out_converts() {
        let err: ClientError = TimedOut(Duration::from_secs(2)).into();
        assert_eq!(err, ClientError::Timeout(Duration::from_secs(2)));
    }

    #[test]
    fn protocol_wire_form() {
        let json = serde_json::to_value(Protocol::raft()).unwrap();
        assert_eq!(json, serde_json::json!({"type": "raft"}));

        let log: Protocol =
            serde_json::from_value(serde_json::json!({"type": "log", "retention_entries": 10}))
                .unwrap();
        assert_eq!(
            log,
            Protocol::Log {
                retention_entries: Some(10)
            }
        );
        assert_eq!(log.name(), "log");
    }

    #[test]
    fn group_spec_default() {
        let spec = GroupSpec::default();
        assert_eq!(spec.partitions, 1);
        assert_eq!(spec.partition_size, 1);
        assert_eq!(spec.protocol, Protocol::raft());
    }
}
