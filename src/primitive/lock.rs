//! primitive::lock
//!
//! Distributed lock. Acquiring yields a version; `unlock` and `is_locked`
//! take an optional version precondition evaluated by the service.

use super::{Primitive, PrimitiveHandle};
use crate::client::ops::LockOp;
use crate::client::ClientError;
use crate::core::types::PrimitiveKind;

/// Marker for lock primitives.
pub enum Lock {}

impl Primitive for Lock {
    const KIND: PrimitiveKind = PrimitiveKind::Lock;
    type Op = LockOp;
}

impl PrimitiveHandle<Lock> {
    /// Acquire the lock, waiting until it is free or the deadline passes.
    pub async fn lock(&self) -> Result<u64, ClientError> {
        self.call(LockOp::Lock).await?.into_version()
    }

    /// Release the lock. With `version`, only if the held version matches.
    pub async fn unlock(&self, version: Option<u64>) -> Result<bool, ClientError> {
        self.call(LockOp::Unlock {
            if_version: version,
        })
        .await?
        .into_bool()
    }

    /// Whether the lock is held, optionally at a specific version.
    pub async fn is_locked(&self, version: Option<u64>) -> Result<bool, ClientError> {
        self.call(LockOp::IsLocked {
            if_version: version,
        })
        .await?
        .into_bool()
    }
}
