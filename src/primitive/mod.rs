//! primitive
//!
//! Typed handles over distributed primitives.
//!
//! # Overview
//!
//! Every primitive kind is a marker type implementing [`Primitive`], which
//! ties the kind to its operation enum. A [`PrimitiveHandle`] binds a
//! resolved name to an open session; each call on it is one remote
//! operation under a fresh [`TimeoutContext`].
//!
//! [`run`] is the single path commands use: resolve the name, open a
//! session on its group, open (or create) the primitive, run the body and
//! close the session.
//!
//! # Example
//!
//! ```ignore
//! let size = primitive::run::<Set, _, _, _>(&resolver, "s1", |set| async move {
//!     set.add("foo").await?;
//!     Ok(set.size().await?)
//! })
//! .await?;
//! ```

mod counter;
mod election;
mod list;
mod lock;
mod map;
mod set;

pub use counter::Counter;
pub use election::Election;
pub use list::List;
pub use lock::Lock;
pub use map::Map;
pub use set::Set;

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::client::ops::{Operation, Outcome};
use crate::client::{ClientError, Resolver, Session};
use crate::core::naming::{PrimitiveName, ResolvedName};
use crate::core::timeout::TimeoutContext;
use crate::core::types::PrimitiveKind;
use crate::error::CliError;

/// A kind of distributed primitive.
pub trait Primitive: Send + Sync + 'static {
    const KIND: PrimitiveKind;

    /// Operations this primitive accepts.
    type Op: Into<Operation> + Send;
}

/// An open primitive bound to a session.
pub struct PrimitiveHandle<P: Primitive> {
    session: Arc<dyn Session>,
    name: PrimitiveName,
    timeout: Duration,
    _kind: PhantomData<fn() -> P>,
}

impl<P: Primitive> PrimitiveHandle<P> {
    /// Open the primitive, creating it if it does not exist.
    pub async fn open(
        session: Arc<dyn Session>,
        name: PrimitiveName,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let ctx = TimeoutContext::new(timeout);
        ctx.run(session.open_primitive(&ctx, P::KIND, &name)).await?;
        let kind = P::KIND;
        debug!(%kind, primitive = %name, "opened primitive");

        Ok(Self {
            session,
            name,
            timeout,
            _kind: PhantomData,
        })
    }

    /// Fully qualified name.
    pub fn name(&self) -> &PrimitiveName {
        &self.name
    }

    /// The session this handle runs on.
    pub fn session(&self) -> &Arc<dyn Session> {
        &self.session
    }

    /// Execute one operation under its own deadline.
    pub async fn call(&self, op: P::Op) -> Result<Outcome, ClientError> {
        let operation = op.into();
        debug!(primitive = %self.name, ?operation, "dispatching operation");

        let ctx = TimeoutContext::new(self.timeout);
        let outcome = ctx
            .run(self.session.execute(&ctx, &self.name, operation))
            .await;
        debug!(primitive = %self.name, ok = outcome.is_ok(), "operation finished");
        outcome
    }

    /// Delete the primitive and its state.
    pub async fn delete(self) -> Result<PrimitiveName, ClientError> {
        let ctx = TimeoutContext::new(self.timeout);
        ctx.run(self.session.delete_primitive(&ctx, P::KIND, &self.name))
            .await?;
        Ok(self.name)
    }
}

/// Resolve `raw_name`, open the primitive and run `body` against it.
///
/// The session is closed whatever the body returns.
pub async fn run<P, T, F, Fut>(
    resolver: &Resolver<'_>,
    raw_name: &str,
    body: F,
) -> Result<T, CliError>
where
    P: Primitive,
    F: FnOnce(PrimitiveHandle<P>) -> Fut,
    Fut: Future<Output = Result<T, CliError>>,
{
    let ResolvedName { group, primitive } = resolver.resolve_name(raw_name)?;
    let timeout = resolver.timeout();

    resolver
        .with_session(&group, move |session| async move {
            let handle = PrimitiveHandle::<P>::open(session, primitive, timeout).await?;
            body(handle).await
        })
        .await
}

/// Open (or create) a primitive and return its name.
pub async fn create<P: Primitive>(
    resolver: &Resolver<'_>,
    raw_name: &str,
) -> Result<PrimitiveName, CliError> {
    run::<P, _, _, _>(resolver, raw_name, |handle| async move {
        Ok(handle.name().clone())
    })
    .await
}

/// Delete a primitive and return its name.
pub async fn delete<P: Primitive>(
    resolver: &Resolver<'_>,
    raw_name: &str,
) -> Result<PrimitiveName, CliError> {
    run::<P, _, _, _>(resolver, raw_name, |handle| async move {
        Ok(handle.delete().await?)
    })
    .await
}
