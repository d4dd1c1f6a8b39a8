//! primitive::counter

use super::{Primitive, PrimitiveHandle};
use crate::client::ops::CounterOp;
use crate::client::ClientError;
use crate::core::types::PrimitiveKind;

/// Marker for counter primitives.
pub enum Counter {}

impl Primitive for Counter {
    const KIND: PrimitiveKind = PrimitiveKind::Counter;
    type Op = CounterOp;
}

impl PrimitiveHandle<Counter> {
    pub async fn get(&self) -> Result<i64, ClientError> {
        self.call(CounterOp::Get).await?.into_counter()
    }

    /// Set the value and return it.
    pub async fn set(&self, value: i64) -> Result<i64, ClientError> {
        self.call(CounterOp::Set { value }).await?.into_counter()
    }

    /// Add `delta` and return the new value.
    pub async fn increment(&self, delta: i64) -> Result<i64, ClientError> {
        self.call(CounterOp::Increment { delta })
            .await?
            .into_counter()
    }

    /// Subtract `delta` and return the new value.
    pub async fn decrement(&self, delta: i64) -> Result<i64, ClientError> {
        self.call(CounterOp::Decrement { delta })
            .await?
            .into_counter()
    }
}
