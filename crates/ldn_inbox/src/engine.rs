//! The inbox protocol engine.
//!
//! Turns already-parsed requests into [`InboxResponse`] descriptors. It knows
//! nothing about routing or sockets and talks to storage only through
//! [`NotificationStore`].

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{error, info, warn};

use crate::error::{Error, Result, StatusPolicy};
use crate::inbox::{InboxResource, LDP_TYPES};
use crate::negotiate::{content_type_format, negotiate};
use crate::storage::NotificationStore;

/// Value of the `X-Powered-By` header on every response.
pub const POWERED_BY: &str = concat!("ldn_inbox/", env!("CARGO_PKG_VERSION"));
/// Methods allowed on the inbox.
pub const INBOX_ALLOW: &str = "GET, HEAD, OPTIONS, POST";
/// Media types a notification may be POSTed in.
pub const ACCEPT_POST: &str = "application/ld+json, text/turtle";

/// How many times a create is attempted when identifiers collide.
const MAX_CREATE_ATTEMPTS: usize = 3;

const ROOT_PAGE: &str = include_str!("../web/index.html");

static X_POWERED_BY: HeaderName = HeaderName::from_static("x-powered-by");
static ACCEPT_POST_HEADER: HeaderName = HeaderName::from_static("accept-post");

/// A protocol-level response: status, headers and body.
#[derive(Debug, Clone, PartialEq)]
pub struct InboxResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl InboxResponse {
    fn new(status: StatusCode) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(X_POWERED_BY.clone(), HeaderValue::from_static(POWERED_BY));
        Self {
            status,
            headers,
            body: String::new(),
        }
    }

    fn with_body(mut self, content_type: &str, body: String) -> Result<Self> {
        self.headers
            .insert(header::CONTENT_TYPE, header_value(content_type)?);
        self.body = body;
        Ok(self)
    }

    fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Adds `Allow`, `Link` and `Accept-Post` as advertised by the inbox.
    fn with_capabilities(self) -> Self {
        self.with_header(header::ALLOW, HeaderValue::from_static(INBOX_ALLOW))
            .with_header(header::LINK, ldp_type_links())
            .with_header(
                ACCEPT_POST_HEADER.clone(),
                HeaderValue::from_static(ACCEPT_POST),
            )
    }

    /// Header value by name, as a string.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl IntoResponse for InboxResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| Error::Internal(format!("invalid header value '{}': {}", value, e)))
}

fn ldp_type_links() -> HeaderValue {
    let links = LDP_TYPES
        .iter()
        .map(|ty| format!("<{}>; rel=\"type\"", ty))
        .collect::<Vec<_>>()
        .join(", ");
    HeaderValue::from_str(&links).unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// Implements the LDN receiver operations on top of a storage backend.
pub struct InboxEngine {
    inbox: InboxResource,
    store: Arc<dyn NotificationStore>,
    policy: StatusPolicy,
}

impl InboxEngine {
    pub fn new(inbox: InboxResource, store: Arc<dyn NotificationStore>) -> Self {
        Self {
            inbox,
            store,
            policy: StatusPolicy::default(),
        }
    }

    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn inbox(&self) -> &InboxResource {
        &self.inbox
    }

    pub fn store(&self) -> &Arc<dyn NotificationStore> {
        &self.store
    }

    /// `GET /`: a human-readable page advertising the inbox through `Link`.
    pub fn describe_root(&self) -> InboxResponse {
        let page = ROOT_PAGE.replace("{{inbox_iri}}", self.inbox.iri());
        let link = format!(
            "<{}>; rel=\"{}\", <{}>; rel=\"type\", <{}>; rel=\"type\"",
            self.inbox.iri(),
            ldn_graph::iris::LDP_INBOX,
            LDP_TYPES[0],
            LDP_TYPES[1],
        );

        let response = InboxResponse::new(StatusCode::OK)
            .with_body("text/html; charset=utf-8", page)
            .and_then(|r| Ok(r.with_header(header::LINK, header_value(&link)?)));
        response.unwrap_or_else(|err| self.render_error(&err))
    }

    /// `HEAD`/`OPTIONS` on the inbox: capability headers only.
    pub fn inbox_metadata(&self) -> InboxResponse {
        InboxResponse::new(StatusCode::OK).with_capabilities()
    }

    /// `GET` on the inbox: the inbox graph in the negotiated format.
    pub async fn fetch_inbox(&self, accept: Option<&str>) -> InboxResponse {
        info!(
            "Requested inbox data of {} in {}",
            self.inbox.iri(),
            accept.unwrap_or("*/*")
        );
        self.try_fetch_inbox(accept)
            .await
            .unwrap_or_else(|err| self.render_error(&err))
    }

    async fn try_fetch_inbox(&self, accept: Option<&str>) -> Result<InboxResponse> {
        let negotiated = negotiate(accept)?;
        let body = self.store.fetch_inbox(negotiated.format).await?;
        Ok(InboxResponse::new(StatusCode::OK)
            .with_body(&negotiated.content_type, body)?
            .with_capabilities())
    }

    /// `POST` on the inbox: store a notification and answer 201 + `Location`.
    pub async fn accept_notification(
        &self,
        content_type: Option<&str>,
        body: &[u8],
    ) -> InboxResponse {
        info!("Received request to create notification");
        self.try_accept_notification(content_type, body)
            .await
            .unwrap_or_else(|err| self.render_error(&err))
    }

    async fn try_accept_notification(
        &self,
        content_type: Option<&str>,
        body: &[u8],
    ) -> Result<InboxResponse> {
        let (media_type, format) = content_type_format(content_type).ok_or_else(|| {
            Error::UnsupportedContentType(content_type.unwrap_or_default().to_string())
        })?;
        info!("Interpreting content type as {}", media_type);

        if body.is_empty() {
            return Err(Error::EmptyPayload);
        }

        let mut attempt = 1;
        let created = loop {
            match self.store.create_notification(body, format).await {
                Ok(created) => break created,
                Err(err) if err.is_retryable() && attempt < MAX_CREATE_ATTEMPTS => {
                    warn!("Retrying notification create after: {}", err);
                    attempt += 1;
                }
                Err(Error::Graph(
                    err @ (ldn_graph::Error::Parse(_) | ldn_graph::Error::Encoding(_)),
                )) => {
                    return Err(Error::ParseFailure {
                        media_type: media_type.to_string(),
                        reason: err.to_string(),
                    })
                }
                Err(err) => return Err(err),
            }
        };

        Ok(InboxResponse::new(StatusCode::CREATED)
            .with_header(header::LOCATION, header_value(&created.iri)?))
    }

    /// `GET` on a notification.
    ///
    /// Existence is checked before the `Accept` header, so an unknown id is a
    /// 404 even when the requested format is unsupported.
    pub async fn fetch_notification(&self, id: &str, accept: Option<&str>) -> InboxResponse {
        info!("Requested notification data of {}", self.inbox.notification_iri(id));
        self.try_fetch_notification(id, accept)
            .await
            .unwrap_or_else(|err| self.render_error(&err))
    }

    async fn try_fetch_notification(&self, id: &str, accept: Option<&str>) -> Result<InboxResponse> {
        let negotiated = negotiate(accept);
        let format = negotiated
            .as_ref()
            .map(|n| n.format)
            .unwrap_or_default();
        let body = self.store.fetch_notification(id, format).await?;
        let negotiated = negotiated?;

        Ok(InboxResponse::new(StatusCode::OK)
            .with_body(&negotiated.content_type, body)?
            .with_header(header::ALLOW, HeaderValue::from_static("GET")))
    }

    /// A plain-text error response with the status chosen by the policy.
    pub fn render_error(&self, err: &Error) -> InboxResponse {
        let status = err.status_code_with(self.policy);
        if status.is_server_error() {
            error!("{} ({})", err, error_detail(err));
        } else {
            warn!("{} ({})", err, error_detail(err));
        }

        let mut response = InboxResponse::new(status);
        response.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        response.body = err.to_string();
        response
    }
}

fn error_detail(err: &Error) -> String {
    match err {
        Error::UnsupportedMediaType(v) | Error::UnsupportedContentType(v) => v.clone(),
        Error::ParseFailure { reason, .. } => reason.clone(),
        Error::NotFound(iri) => iri.clone(),
        other => other.error_code().to_string(),
    }
}
