//! Error types for the LDN inbox server.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// A specialized `Result` type for inbox operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The primary error type for the inbox server.
///
/// The `Display` text of the client-facing variants is the exact plain-text
/// body sent back to the client.
#[derive(Debug, Error)]
pub enum Error {
    /// The request `Accept` header matches none of the supported formats.
    #[error("Requested format unavailable")]
    UnsupportedMediaType(String),

    /// The request `Content-Type` header matches none of the supported formats.
    #[error("Content type not accepted")]
    UnsupportedContentType(String),

    /// A notification was POSTed with an empty body.
    #[error("Received empty payload")]
    EmptyPayload,

    /// The notification body is not valid RDF in the declared format.
    #[error("Could not parse received {media_type} payload")]
    ParseFailure { media_type: String, reason: String },

    /// The requested notification (or registry entry) does not exist.
    #[error("Requested notification does not exist")]
    NotFound(String),

    /// A freshly generated notification identifier is already taken. Retryable.
    #[error("Notification identifier already in use: {0}")]
    IdCollision(String),

    /// A call to the ontology registry failed.
    #[error("Registry error: {0}")]
    Registry(String),

    /// The configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An error from the `ldn_graph` layer.
    #[error("Graph error: {0}")]
    Graph(#[from] ldn_graph::Error),

    /// An error from the underlying I/O system.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An unexpected internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Which status codes client errors on notification POSTs are reported with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// 415 for an unsupported content type, 400 for empty or unparseable bodies.
    #[default]
    Recommended,
    /// 500 for all three, as older LDN receivers answered.
    Legacy,
}

impl Error {
    /// Returns the HTTP status code for this error under the default policy.
    pub fn status_code(&self) -> StatusCode {
        self.status_code_with(StatusPolicy::Recommended)
    }

    /// Returns the HTTP status code for this error under `policy`.
    pub fn status_code_with(&self, policy: StatusPolicy) -> StatusCode {
        match (self, policy) {
            (Error::UnsupportedMediaType(_), _) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            (
                Error::UnsupportedContentType(_)
                | Error::EmptyPayload
                | Error::ParseFailure { .. },
                StatusPolicy::Legacy,
            ) => StatusCode::INTERNAL_SERVER_ERROR,
            (Error::UnsupportedContentType(_), _) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            (Error::EmptyPayload, _) => StatusCode::BAD_REQUEST,
            (Error::ParseFailure { .. }, _) => StatusCode::BAD_REQUEST,
            (Error::NotFound(_), _) => StatusCode::NOT_FOUND,
            (Error::Registry(_), _) => StatusCode::BAD_GATEWAY,
            (Error::IdCollision(_), _) => StatusCode::INTERNAL_SERVER_ERROR,
            (Error::Config(_), _) => StatusCode::INTERNAL_SERVER_ERROR,
            (Error::Graph(_), _) => StatusCode::INTERNAL_SERVER_ERROR,
            (Error::Io(_), _) => StatusCode::INTERNAL_SERVER_ERROR,
            (Error::Internal(_), _) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a machine-readable error code string for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::UnsupportedMediaType(_) => "UNSUPPORTED_MEDIA_TYPE",
            Error::UnsupportedContentType(_) => "UNSUPPORTED_CONTENT_TYPE",
            Error::EmptyPayload => "EMPTY_PAYLOAD",
            Error::ParseFailure { .. } => "PARSE_FAILURE",
            Error::NotFound(_) => "NOT_FOUND",
            Error::IdCollision(_) => "ID_COLLISION",
            Error::Registry(_) => "REGISTRY_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Graph(_) => "GRAPH_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the request may succeed if simply retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::IdCollision(_))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}
