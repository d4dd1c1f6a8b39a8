//! client::factory
//!
//! Controller client creation.
//!
//! Commands obtain controllers through a [`Connector`] instead of naming a
//! concrete client, so tests can substitute the in-memory mock.

use std::sync::Arc;
use tracing::debug;

use super::http::HttpController;
use super::traits::{ClientError, Connector, Controller};

/// Connector producing [`HttpController`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpConnector;

impl Connector for HttpConnector {
    fn connect(&self, endpoint: &str) -> Result<Arc<dyn Controller>, ClientError> {
        let controller = HttpController::new(endpoint)?;
        debug!(endpoint, base = controller.base_url(), "created controller client");
        Ok(Arc::new(controller))
    }
}

/// Create a controller client for `endpoint` with the default connector.
///
/// # Example
///
/// ```
/// use atomix_cli::client::create_controller;
///
/// let controller = create_controller("localhost:5679").unwrap();
/// assert_eq!(controller.endpoint(), "localhost:5679");
/// ```
pub fn create_controller(endpoint: &str) -> Result<Arc<dyn Controller>, ClientError> {
    HttpConnector.connect(endpoint)
}
