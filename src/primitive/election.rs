//! primitive::election
//!
//! Leader election. The handle's session is the candidate for `enter` and
//! `leave`; `promote` and `evict` name a candidate explicitly.

use super::{Primitive, PrimitiveHandle};
use crate::client::ops::{ElectionOp, Term};
use crate::client::ClientError;
use crate::core::types::PrimitiveKind;

/// Marker for election primitives.
pub enum Election {}

impl Primitive for Election {
    const KIND: PrimitiveKind = PrimitiveKind::Election;
    type Op = ElectionOp;
}

impl PrimitiveHandle<Election> {
    /// Join the election as a candidate.
    pub async fn enter(&self) -> Result<Term, ClientError> {
        self.call(ElectionOp::Enter).await?.into_term()
    }

    pub async fn leave(&self) -> Result<Term, ClientError> {
        self.call(ElectionOp::Leave).await?.into_term()
    }

    /// The current term.
    pub async fn term(&self) -> Result<Term, ClientError> {
        self.call(ElectionOp::GetTerm).await?.into_term()
    }

    pub async fn promote(&self, candidate: impl Into<String>) -> Result<Term, ClientError> {
        self.call(ElectionOp::Promote {
            candidate: candidate.into(),
        })
        .await?
        .into_term()
    }

    pub async fn evict(&self, candidate: impl Into<String>) -> Result<Term, ClientError> {
        self.call(ElectionOp::Evict {
            candidate: candidate.into(),
        })
        .await?
        .into_term()
    }
}
