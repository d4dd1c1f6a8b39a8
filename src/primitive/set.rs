//! primitive::set

use super::{Primitive, PrimitiveHandle};
use crate::client::ops::SetOp;
use crate::client::ClientError;
use crate::core::types::PrimitiveKind;

/// Marker for set primitives.
pub enum Set {}

impl Primitive for Set {
    const KIND: PrimitiveKind = PrimitiveKind::Set;
    type Op = SetOp;
}

impl PrimitiveHandle<Set> {
    /// Add a value; `true` if it was not already present.
    pub async fn add(&self, value: impl Into<String>) -> Result<bool, ClientError> {
        self.call(SetOp::Add {
            value: value.into(),
        })
        .await?
        .into_bool()
    }

    pub async fn contains(&self, value: impl Into<String>) -> Result<bool, ClientError> {
        self.call(SetOp::Contains {
            value: value.into(),
        })
        .await?
        .into_bool()
    }

    /// Remove a value; `true` if it was present.
    pub async fn remove(&self, value: impl Into<String>) -> Result<bool, ClientError> {
        self.call(SetOp::Remove {
            value: value.into(),
        })
        .await?
        .into_bool()
    }

    pub async fn size(&self) -> Result<u64, ClientError> {
        self.call(SetOp::Size).await?.into_size()
    }

    pub async fn clear(&self) -> Result<(), ClientError> {
        self.call(SetOp::Clear).await?.into_unit()
    }
}
