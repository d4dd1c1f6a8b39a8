//! client::http
//!
//! HTTP/JSON controller adapter.
//!
//! # Routes
//!
//! All routes hang off `{endpoint}/v1/namespaces/{namespace}/groups`:
//!
//! | Call | Route |
//! |------|-------|
//! | list groups | `GET /` |
//! | get / create / delete group | `GET` / `POST` / `DELETE /{group}` |
//! | open / close session | `POST /{group}/sessions`, `DELETE /{group}/sessions/{id}` |
//! | open / delete primitive | `POST` / `DELETE /{group}/primitives/{kind}/{name}` |
//! | execute | `POST /{group}/primitives/{kind}/{name}/operations` |
//! | list primitives | `GET /{group}/primitives?type={kind}` |
//!
//! Every path segment is percent-encoded. Session-scoped calls carry the
//! session id in the `X-Atomix-Session` header.
//!
//! # Deadlines
//!
//! Each request gets a transport timeout equal to the time left on its
//! [`TimeoutContext`], and the whole exchange runs under
//! [`TimeoutContext::run`], so expiry drops the in-flight request.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use super::ops::{Operation, Outcome};
use super::traits::{
    ClientError, Controller, GroupSpec, PartitionGroup, PrimitiveInfo, Session,
};
use crate::core::naming::{GroupReference, PrimitiveName};
use crate::core::timeout::TimeoutContext;
use crate::core::types::PrimitiveKind;

/// Header carrying the session id.
pub const SESSION_HEADER: &str = "X-Atomix-Session";

const USER_AGENT: &str = concat!("atomix-cli/", env!("CARGO_PKG_VERSION"));

/// Error body returned by the controller.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct SessionBody {
    id: String,
}

/// Shared HTTP plumbing for the controller and its sessions.
#[derive(Debug, Clone)]
struct Transport {
    client: Client,
    base: Url,
    endpoint: String,
}

impl Transport {
    /// Append percent-encoded path segments to the base URL.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn groups_url(&self, namespace: &str) -> Url {
        self.url(&["v1", "namespaces", namespace, "groups"])
    }

    fn group_url(&self, group: &GroupReference, path: &[&str]) -> Url {
        let mut segments = vec![
            "v1",
            "namespaces",
            group.namespace.as_str(),
            "groups",
            group.name.as_str(),
        ];
        segments.extend_from_slice(path);
        self.url(&segments)
    }

    /// Send a request and decode a JSON body.
    async fn send<T: DeserializeOwned>(
        &self,
        ctx: &TimeoutContext,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        ctx.run(async {
            let response = self.dispatch(ctx, request).await?;
            let status = response.status();
            if status.is_success() {
                response.json().await.map_err(|e| {
                    ClientError::UnexpectedResponse(format!("failed to parse response: {}", e))
                })
            } else {
                Err(handle_error_response(response, status).await)
            }
        })
        .await
    }

    /// Send a request whose success body is ignored.
    async fn send_empty(
        &self,
        ctx: &TimeoutContext,
        request: RequestBuilder,
    ) -> Result<(), ClientError> {
        ctx.run(async {
            let response = self.dispatch(ctx, request).await?;
            let status = response.status();
            if status.is_success() {
                Ok(())
            } else {
                Err(handle_error_response(response, status).await)
            }
        })
        .await
    }

    async fn dispatch(
        &self,
        ctx: &TimeoutContext,
        request: RequestBuilder,
    ) -> Result<Response, ClientError> {
        request
            .timeout(ctx.remaining())
            .send()
            .await
            .map_err(|e| self.map_transport_error(ctx, e))
    }

    fn map_transport_error(&self, ctx: &TimeoutContext, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(ctx.timeout())
        } else if err.is_connect() || err.is_request() {
            ClientError::Connection {
                endpoint: self.endpoint.clone(),
                message: err.to_string(),
            }
        } else {
            ClientError::Remote(err.to_string())
        }
    }
}

/// Map an error status to a client error, keeping the service message.
async fn handle_error_response(response: Response, status: StatusCode) -> ClientError {
    let text = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.message,
        Err(_) if !text.trim().is_empty() => text.trim().to_string(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };

    match status {
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => {
            ClientError::PreconditionFailed(message)
        }
        StatusCode::NOT_IMPLEMENTED => ClientError::Unsupported(message),
        _ => ClientError::Remote(message),
    }
}

/// Turn `host:port` into a base URL; explicit schemes are kept.
pub fn normalize_endpoint(endpoint: &str) -> Result<String, ClientError> {
    let trimmed = endpoint.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ClientError::Connection {
            endpoint: endpoint.to_string(),
            message: "empty controller endpoint".into(),
        });
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else if trimmed.contains("://") {
        Err(ClientError::Connection {
            endpoint: endpoint.to_string(),
            message: "unsupported URL scheme".into(),
        })
    } else {
        Ok(format!("http://{}", trimmed))
    }
}

/// Controller client speaking HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpController {
    transport: Transport,
}

impl HttpController {
    /// Build a client for `endpoint` (`host:port` or an `http(s)://` URL).
    ///
    /// No connection is made until the first call.
    pub fn new(endpoint: &str) -> Result<Self, ClientError> {
        let base = normalize_endpoint(endpoint)?;
        let base = Url::parse(&base).map_err(|e| ClientError::Connection {
            endpoint: endpoint.to_string(),
            message: format!("invalid controller URL: {}", e),
        })?;
        if base.cannot_be_a_base() {
            return Err(ClientError::Connection {
                endpoint: endpoint.to_string(),
                message: "invalid controller URL".into(),
            });
        }
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ClientError::Connection {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            transport: Transport {
                client,
                base,
                endpoint: endpoint.to_string(),
            },
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        self.transport.base.as_str()
    }
}

#[async_trait]
impl Controller for HttpController {
    fn endpoint(&self) -> &str {
        &self.transport.endpoint
    }

    async fn list_groups(
        &self,
        ctx: &TimeoutContext,
        namespace: &str,
    ) -> Result<Vec<PartitionGroup>, ClientError> {
        let t = &self.transport;
        t.send(ctx, t.client.get(t.groups_url(namespace))).await
    }

    async fn get_group(
        &self,
        ctx: &TimeoutContext,
        group: &GroupReference,
    ) -> Result<PartitionGroup, ClientError> {
        let t = &self.transport;
        t.send(ctx, t.client.get(t.group_url(group, &[]))).await
    }

    async fn create_group(
        &self,
        ctx: &TimeoutContext,
        group: &GroupReference,
        spec: GroupSpec,
    ) -> Result<PartitionGroup, ClientError> {
        let t = &self.transport;
        t.send(ctx, t.client.post(t.group_url(group, &[])).json(&spec))
            .await
    }

    async fn delete_group(
        &self,
        ctx: &TimeoutContext,
        group: &GroupReference,
    ) -> Result<(), ClientError> {
        let t = &self.transport;
        t.send_empty(ctx, t.client.delete(t.group_url(group, &[])))
            .await
    }

    async fn open_session(
        &self,
        ctx: &TimeoutContext,
        group: &GroupReference,
    ) -> Result<Arc<dyn Session>, ClientError> {
        let t = &self.transport;
        let body: SessionBody = t
            .send(ctx, t.client.post(t.group_url(group, &["sessions"])))
            .await?;
        debug!(session = %body.id, group = %group, "opened session");

        Ok(Arc::new(HttpSession {
            transport: t.clone(),
            id: body.id,
            group: group.clone(),
            closed: AtomicBool::new(false),
        }))
    }
}

/// A session opened through [`HttpController`].
#[derive(Debug)]
pub struct HttpSession {
    transport: Transport,
    id: String,
    group: GroupReference,
    closed: AtomicBool,
}

impl HttpSession {
    fn primitive_url(&self, kind: PrimitiveKind, name: &PrimitiveName, suffix: &[&str]) -> Url {
        let name = name.to_string();
        let mut path = vec!["primitives", kind.as_str(), name.as_str()];
        path.extend_from_slice(suffix);
        self.transport.group_url(&self.group, &path)
    }

    fn scoped(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(SESSION_HEADER, &self.id)
    }
}

#[async_trait]
impl Session for HttpSession {
    fn id(&self) -> &str {
        &self.id
    }

    fn group(&self) -> &GroupReference {
        &self.group
    }

    async fn open_primitive(
        &self,
        ctx: &TimeoutContext,
        kind: PrimitiveKind,
        name: &PrimitiveName,
    ) -> Result<(), ClientError> {
        let t = &self.transport;
        let request = self.scoped(t.client.post(self.primitive_url(kind, name, &[])));
        t.send_empty(ctx, request).await
    }

    async fn execute(
        &self,
        ctx: &TimeoutContext,
        name: &PrimitiveName,
        operation: Operation,
    ) -> Result<Outcome, ClientError> {
        let t = &self.transport;
        let url = self.primitive_url(operation.kind(), name, &["operations"]);
        t.send(ctx, self.scoped(t.client.post(url).json(&operation)))
            .await
    }

    async fn delete_primitive(
        &self,
        ctx: &TimeoutContext,
        kind: PrimitiveKind,
        name: &PrimitiveName,
    ) -> Result<(), ClientError> {
        let t = &self.transport;
        let request = self.scoped(t.client.delete(self.primitive_url(kind, name, &[])));
        t.send_empty(ctx, request).await
    }

    async fn list_primitives(
        &self,
        ctx: &TimeoutContext,
        kind: Option<PrimitiveKind>,
    ) -> Result<Vec<PrimitiveInfo>, ClientError> {
        let t = &self.transport;
        let mut request = t.client.get(t.group_url(&self.group, &["primitives"]));
        if let Some(kind) = kind {
            request = request.query(&[("type", kind.as_str())]);
        }
        t.send(ctx, self.scoped(request)).await
    }

    async fn close(&self, ctx: &TimeoutContext) -> Result<(), ClientError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let t = &self.transport;
        let url = t.group_url(&self.group, &["sessions", self.id.as_str()]);
        let result = t.send_empty(ctx, self.scoped(t.client.delete(url))).await;
        debug!(session = %self.id, ok = result.is_ok(), "closed session");
        result
    }
}

impl Drop for HttpSession {
    fn drop(&mut self) {
        if !self.closed.load(Ordering::SeqCst) {
            warn!(session = %self.id, group = %self.group, "session dropped without being closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_scheme() {
        assert_eq!(
            normalize_endpoint("localhost:5679").unwrap(),
            "http://localhost:5679"
        );
        assert_eq!(
            normalize_endpoint("https://atomix.example.com/").unwrap(),
            "https://atomix.example.com"
        );
    }

    #[test]
    fn normalize_rejects_bad_endpoints() {
        assert!(matches!(
            normalize_endpoint("  "),
            Err(ClientError::Connection { .. })
        ));
        assert!(matches!(
            normalize_endpoint("grpc://host:1"),
            Err(ClientError::Connection { .. })
        ));
    }

    #[test]
    fn group_urls() {
        let controller = HttpController::new("localhost:5679").unwrap();
        let group = GroupReference {
            controller: "localhost:5679".into(),
            namespace: "prod".into(),
            name: "raft".into(),
        };
        assert_eq!(
            controller.transport.group_url(&group, &[]).as_str(),
            "http://localhost:5679/v1/namespaces/prod/groups/raft"
        );
        assert_eq!(
            controller.transport.group_url(&group, &["sessions"]).as_str(),
            "http://localhost:5679/v1/namespaces/prod/groups/raft/sessions"
        );
    }

    #[test]
    fn path_segments_are_escaped() {
        let controller = HttpController::new("localhost:5679").unwrap();
        let group = GroupReference {
            controller: "localhost:5679".into(),
            namespace: "a/b".into(),
            name: "x?y".into(),
        };
        assert_eq!(
            controller.transport.group_url(&group, &["sessions"]).as_str(),
            "http://localhost:5679/v1/namespaces/a%2Fb/groups/x%3Fy/sessions"
        );
    }

    #[test]
    fn base_path_is_kept() {
        let controller = HttpController::new("https://atomix.example.com/api").unwrap();
        assert_eq!(
            controller.transport.groups_url("default").as_str(),
            "https://atomix.example.com/api/v1/namespaces/default/groups"
        );
    }
}
