//! error
//!
//! Command-level errors and process exit statuses.
//!
//! Handlers return `anyhow::Result`; [`exit_status`] walks the error chain
//! for a known error type and picks the exit code. Nothing is retried and
//! nothing is recovered locally.

use std::process::ExitCode;
use std::time::Duration;
use thiserror::Error;

use crate::client::ClientError;
use crate::core::config::ConfigError;
use crate::core::naming::NameError;
use crate::core::timeout::format_duration;

/// Process exit statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Success = 0,
    Error = 1,
    BadConnection = 2,
    InvalidInput = 3,
    BadFeature = 4,
    Interrupted = 5,
    Io = 6,
    BadArgs = 128,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Errors surfaced by command handlers.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    InvalidName(#[from] NameError),

    #[error("{0}")]
    Connection(String),

    #[error("operation timed out after {}", format_duration(*.0))]
    Timeout(Duration),

    #[error("{0}")]
    Remote(String),

    #[error("unsupported shell type {0}")]
    UnsupportedShell(String),

    #[error("{0}")]
    Unsupported(String),

    #[error("interrupted")]
    Interrupted,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CliError {
    /// Exit status for this error.
    pub fn status(&self) -> ExitStatus {
        match self {
            CliError::InvalidName(_) => ExitStatus::InvalidInput,
            CliError::Connection(_) => ExitStatus::BadConnection,
            CliError::Timeout(_) | CliError::Remote(_) | CliError::UnsupportedShell(_) => {
                ExitStatus::Error
            }
            CliError::Unsupported(_) => ExitStatus::BadFeature,
            CliError::Interrupted => ExitStatus::Interrupted,
            CliError::Config(err) => config_status(err),
        }
    }
}

impl From<ClientError> for CliError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Connection { .. } => CliError::Connection(err.to_string()),
            ClientError::Timeout(timeout) => CliError::Timeout(timeout),
            ClientError::Unsupported(message) => CliError::Unsupported(message),
            ClientError::Remote(message) => CliError::Remote(message),
            ClientError::NotFound(_)
            | ClientError::PreconditionFailed(_)
            | ClientError::UnexpectedResponse(_) => CliError::Remote(err.to_string()),
        }
    }
}

fn config_status(err: &ConfigError) -> ExitStatus {
    if err.is_io() {
        ExitStatus::Io
    } else {
        ExitStatus::InvalidInput
    }
}

/// Pick the exit status for a handler error.
pub fn exit_status(err: &anyhow::Error) -> ExitStatus {
    for cause in err.chain() {
        if let Some(err) = cause.downcast_ref::<CliError>() {
            return err.status();
        }
        if let Some(err) = cause.downcast_ref::<ClientError>() {
            return CliError::from(err.clone()).status();
        }
        if let Some(err) = cause.downcast_ref::<ConfigError>() {
            return config_status(err);
        }
        if cause.downcast_ref::<NameError>().is_some() {
            return ExitStatus::InvalidInput;
        }
    }
    ExitStatus::Error
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(
            CliError::from(NameError::Empty).status(),
            ExitStatus::InvalidInput
        );
        assert_eq!(
            CliError::Connection("refused".into()).status(),
            ExitStatus::BadConnection
        );
        assert_eq!(
            CliError::Timeout(Duration::from_secs(1)).status(),
            ExitStatus::Error
        );
        assert_eq!(
            CliError::UnsupportedShell("fish".into()).status(),
            ExitStatus::Error
        );
        assert_eq!(
            CliError::Unsupported("log protocol".into()).status(),
            ExitStatus::BadFeature
        );
        assert_eq!(CliError::Interrupted.status(), ExitStatus::Interrupted);
        assert_eq!(
            CliError::from(ConfigError::NoHomeDir).status(),
            ExitStatus::Io
        );
        assert_eq!(
            CliError::from(ConfigError::InvalidValue("x".into())).status(),
            ExitStatus::InvalidInput
        );
    }

    #[test]
    fn client_errors_map() {
        let err = CliError::from(ClientError::Connection {
            endpoint: "localhost:5679".into(),
            message: "refused".into(),
        });
        assert_eq!(err.status(), ExitStatus::BadConnection);
        assert!(err.to_string().contains("localhost:5679"));

        let err = CliError::from(ClientError::Remote("lock is held".into()));
        assert_eq!(err.to_string(), "lock is held");

        let err = CliError::from(ClientError::PreconditionFailed("version 3".into()));
        assert_eq!(err.status(), ExitStatus::Error);
        assert_eq!(err.to_string(), "precondition failed: version 3");
    }

    #[test]
    fn exit_status_walks_chain() {
        let err = anyhow::Error::new(ClientError::Timeout(Duration::from_millis(1)))
            .context("lock lock failed");
        assert_eq!(exit_status(&err), ExitStatus::Error);

        let err = anyhow::Error::new(ConfigError::WriteError {
            path: PathBuf::from("/nope"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        });
        assert_eq!(exit_status(&err), ExitStatus::Io);

        let err = anyhow::Error::new(CliError::Interrupted).context("waiting");
        assert_eq!(exit_status(&err), ExitStatus::Interrupted);

        assert_eq!(exit_status(&anyhow::anyhow!("other")), ExitStatus::Error);
    }

    #[test]
    fn timeout_message() {
        assert_eq!(
            CliError::Timeout(Duration::from_millis(1)).to_string(),
            "operation timed out after 1ms"
        );
    }

    #[test]
    fn exit_codes() {
        assert_eq!(ExitStatus::BadArgs.code(), 128);
        assert_eq!(ExitStatus::Io.code(), 6);
    }
}
