//! primitive::list
//!
//! Distributed list. Indexes out of range fail remotely.

use super::{Primitive, PrimitiveHandle};
use crate::client::ops::ListOp;
use crate::client::ClientError;
use crate::core::types::PrimitiveKind;

/// Marker for list primitives.
pub enum List {}

impl Primitive for List {
    const KIND: PrimitiveKind = PrimitiveKind::List;
    type Op = ListOp;
}

impl PrimitiveHandle<List> {
    pub async fn append(&self, value: impl Into<String>) -> Result<(), ClientError> {
        self.call(ListOp::Append {
            value: value.into(),
        })
        .await?
        .into_unit()
    }

    pub async fn insert(&self, index: usize, value: impl Into<String>) -> Result<(), ClientError> {
        self.call(ListOp::Insert {
            index,
            value: value.into(),
        })
        .await?
        .into_unit()
    }

    pub async fn get(&self, index: usize) -> Result<Option<String>, ClientError> {
        self.call(ListOp::Get { index }).await?.into_value()
    }

    /// Remove the item at `index` and return it.
    pub async fn remove(&self, index: usize) -> Result<Option<String>, ClientError> {
        self.call(ListOp::Remove { index }).await?.into_value()
    }

    pub async fn items(&self) -> Result<Vec<String>, ClientError> {
        self.call(ListOp::Items).await?.into_values()
    }

    pub async fn size(&self) -> Result<u64, ClientError> {
        self.call(ListOp::Size).await?.into_size()
    }

    pub async fn clear(&self) -> Result<(), ClientError> {
        self.call(ListOp::Clear).await?.into_unit()
    }
}
