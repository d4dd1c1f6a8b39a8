//! client::resolver
//!
//! Group resolution and scoped session acquisition.
//!
//! # Lifecycle
//!
//! A [`Resolver`] is built once per command from the loaded config, the
//! command-line overrides and the `--timeout` value. It resolves names,
//! connects to the effective controller and opens sessions.
//!
//! [`Resolver::with_session`] is the only way commands obtain a session. It
//! closes the session after the body finishes on every path: success,
//! failure, timeout and Ctrl-C. Connection failures are fatal and never
//! retried.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::traits::{ClientError, Connector, Controller, Session};
use crate::core::config::Config;
use crate::core::naming::{self, GroupReference, NameError, Overrides, ResolvedName};
use crate::core::timeout::TimeoutContext;
use crate::error::CliError;

/// Lower bound on the deadline used to close a session.
const MIN_CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Resolves names and groups for one command invocation.
pub struct Resolver<'a> {
    connector: &'a dyn Connector,
    config: &'a Config,
    overrides: &'a Overrides,
    timeout: Duration,
}

impl<'a> Resolver<'a> {
    pub fn new(
        connector: &'a dyn Connector,
        config: &'a Config,
        overrides: &'a Overrides,
        timeout: Duration,
    ) -> Self {
        Self {
            connector,
            config,
            overrides,
            timeout,
        }
    }

    /// Per-call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// A fresh context for one remote call.
    pub fn context(&self) -> TimeoutContext {
        TimeoutContext::new(self.timeout)
    }

    /// Resolve a raw primitive name against overrides and config.
    pub fn resolve_name(&self, raw: &str) -> Result<ResolvedName, NameError> {
        naming::resolve_primitive(raw, self.overrides, self.config)
    }

    /// Resolve a group name, or the default group when `raw` is `None`.
    pub fn resolve_group(&self, raw: Option<&str>) -> Result<GroupReference, NameError> {
        naming::resolve_group(raw, self.overrides, self.config)
    }

    /// Effective namespace for listings.
    pub fn namespace(&self) -> Result<String, NameError> {
        naming::namespace(self.overrides, self.config)
    }

    /// Connect to the effective controller.
    pub fn controller(&self) -> Result<Arc<dyn Controller>, ClientError> {
        self.connect(&naming::controller(self.overrides, self.config))
    }

    /// Connect to a specific controller endpoint.
    pub fn connect(&self, endpoint: &str) -> Result<Arc<dyn Controller>, ClientError> {
        debug!(endpoint, "connecting to controller");
        self.connector.connect(endpoint)
    }

    /// Open a session on `group`, run `body`, then close the session.
    ///
    /// Opening and the body both race Ctrl-C; an interrupt yields
    /// [`CliError::Interrupted`]. A failure to close is logged and does not
    /// mask the body's result.
    pub async fn with_session<T, F, Fut>(
        &self,
        group: &GroupReference,
        body: F,
    ) -> Result<T, CliError>
    where
        F: FnOnce(Arc<dyn Session>) -> Fut,
        Fut: Future<Output = Result<T, CliError>>,
    {
        self.with_session_until(group, interrupted(), body).await
    }

    /// [`Resolver::with_session`] with an explicit interrupt signal.
    ///
    /// If `signal` fires while the session is opening, the open is allowed
    /// to finish so the session can still be closed.
    pub async fn with_session_until<T, F, Fut, S>(
        &self,
        group: &GroupReference,
        signal: S,
        body: F,
    ) -> Result<T, CliError>
    where
        F: FnOnce(Arc<dyn Session>) -> Fut,
        Fut: Future<Output = Result<T, CliError>>,
        S: Future<Output = ()>,
    {
        let controller = self.connect(&group.controller)?;
        let ctx = self.context();
        let open = ctx.run(controller.open_session(&ctx, group));
        tokio::pin!(open, signal);

        let session = tokio::select! {
            biased;
            opened = &mut open => opened?,
            _ = &mut signal => {
                debug!(group = %group, "interrupted while opening session");
                if let Ok(session) = open.await {
                    self.close(session.as_ref()).await;
                }
                return Err(CliError::Interrupted);
            }
        };
        debug!(session = session.id(), group = %group, "session open");

        let result = tokio::select! {
            biased;
            result = body(Arc::clone(&session)) => result,
            _ = &mut signal => Err(CliError::Interrupted),
        };

        self.close(session.as_ref()).await;
        result
    }

    async fn close(&self, session: &dyn Session) {
        let close_ctx = TimeoutContext::new(self.timeout.max(MIN_CLOSE_TIMEOUT));
        match close_ctx.run(session.close(&close_ctx)).await {
            Ok(()) => debug!(session = session.id(), "session closed"),
            Err(err) => warn!(session = session.id(), error = %err, "failed to close session"),
        }
    }
}

/// Run `fut` to completion unless Ctrl-C arrives first.
///
/// For commands that hold no session; dropping `fut` aborts its request.
pub async fn interruptible<T, Fut>(fut: Fut) -> Result<T, CliError>
where
    Fut: Future<Output = Result<T, CliError>>,
{
    tokio::select! {
        biased;
        result = fut => result,
        _ = interrupted() => Err(CliError::Interrupted),
    }
}

/// Resolves when the process receives Ctrl-C.
///
/// If the handler cannot be installed this never resolves.
async fn interrupted() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        debug!(error = %err, "unable to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::{FailOn, MockController, MockOperation};
    use crate::core::config::ConfigFile;

    fn config() -> Config {
        Config::in_memory(ConfigFile {
            controller: Some("atomix:5679".into()),
            group: Some("raft".into()),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn with_session_closes_on_success() {
        let mock = MockController::new().with_group("default", "raft", 1, 1);
        let config = config();
        let overrides = Overrides::default();
        let resolver = Resolver::new(&mock, &config, &overrides, Duration::from_secs(5));

        let group = resolver.resolve_group(None).unwrap();
        let id = resolver
            .with_session(&group, |session| async move { Ok(session.id().to_string()) })
            .await
            .unwrap();

        assert_eq!(id, "session-1");
        assert_eq!(mock.sessions_closed(), 1);
        assert!(mock.operations().contains(&MockOperation::Connect {
            endpoint: "atomix:5679".into()
        }));
    }

    #[tokio::test]
    async fn with_session_closes_on_error() {
        let mock = MockController::new().with_group("default", "raft", 1, 1);
        let config = config();
        let overrides = Overrides::default();
        let resolver = Resolver::new(&mock, &config, &overrides, Duration::from_secs(5));

        let group = resolver.resolve_group(None).unwrap();
        let err = resolver
            .with_session(&group, |_| async { Err::<(), _>(CliError::Remote("boom".into())) })
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::Remote(ref m) if m == "boom"));
        assert_eq!(mock.sessions_opened(), 1);
        assert_eq!(mock.sessions_closed(), 1);
    }

    #[tokio::test]
    async fn close_failure_does_not_mask_result() {
        let mock = MockController::new()
            .with_group("default", "raft", 1, 1)
            .fail_on(FailOn::CloseSession(ClientError::Remote("gone".into())));
        let config = config();
        let overrides = Overrides::default();
        let resolver = Resolver::new(&mock, &config, &overrides, Duration::from_secs(5));

        let group = resolver.resolve_group(None).unwrap();
        let value = resolver
            .with_session(&group, |_| async { Ok(42) })
            .await
            .unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn connection_failure_is_fatal() {
        let mock = MockController::new().fail_on(FailOn::Connect(ClientError::Connection {
            endpoint: "atomix:5679".into(),
            message: "refused".into(),
        }));
        let config = config();
        let overrides = Overrides::default();
        let resolver = Resolver::new(&mock, &config, &overrides, Duration::from_secs(5));

        let group = resolver.resolve_group(None).unwrap();
        let err = resolver
            .with_session(&group, |_| async { Ok(()) })
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Connection(_)));
        assert_eq!(mock.sessions_opened(), 0);
    }

    #[tokio::test]
    async fn overrides_pick_controller() {
        let mock = MockController::new();
        let config = config();
        let overrides = Overrides {
            controller: Some("other:1".into()),
            ..Default::default()
        };
        let resolver = Resolver::new(&mock, &config, &overrides, Duration::from_secs(5));

        resolver.controller().unwrap();
        assert_eq!(
            mock.operations(),
            vec![MockOperation::Connect {
                endpoint: "other:1".into()
            }]
        );
    }
}
