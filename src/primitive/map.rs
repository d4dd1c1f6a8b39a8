//! primitive::map
//!
//! Distributed map with per-entry versions. `put` and `remove` accept a
//! version precondition; a mismatch fails remotely with
//! `ClientError::PreconditionFailed`.

use super::{Primitive, PrimitiveHandle};
use crate::client::ops::{MapEntry, MapOp};
use crate::client::ClientError;
use crate::core::types::PrimitiveKind;

/// Marker for map primitives.
pub enum Map {}

impl Primitive for Map {
    const KIND: PrimitiveKind = PrimitiveKind::Map;
    type Op = MapOp;
}

impl PrimitiveHandle<Map> {
    /// Write an entry and return it with its new version.
    pub async fn put(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
        version: Option<u64>,
    ) -> Result<MapEntry, ClientError> {
        let entry = self
            .call(MapOp::Put {
                key: key.into(),
                value: value.into(),
                if_version: version,
            })
            .await?
            .into_entry()?;
        entry.ok_or_else(|| ClientError::UnexpectedResponse("put returned no entry".into()))
    }

    pub async fn get(&self, key: impl Into<String>) -> Result<Option<MapEntry>, ClientError> {
        self.call(MapOp::Get { key: key.into() })
            .await?
            .into_entry()
    }

    /// Remove an entry, returning it if it existed.
    pub async fn remove(
        &self,
        key: impl Into<String>,
        version: Option<u64>,
    ) -> Result<Option<MapEntry>, ClientError> {
        self.call(MapOp::Remove {
            key: key.into(),
            if_version: version,
        })
        .await?
        .into_entry()
    }

    pub async fn keys(&self) -> Result<Vec<String>, ClientError> {
        self.call(MapOp::Keys).await?.into_values()
    }

    pub async fn size(&self) -> Result<u64, ClientError> {
        self.call(MapOp::Size).await?.into_size()
    }

    pub async fn clear(&self) -> Result<(), ClientError> {
        self.call(MapOp::Clear).await?.into_unit()
    }
}
