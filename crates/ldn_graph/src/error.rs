//! Error types for LDN graphs.

use std::fmt;

/// A specialized `Result` type for graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building, parsing or serializing graphs.
#[derive(Debug)]
pub enum Error {
    /// The payload is not valid in the format it was declared as.
    Parse(String),

    /// A graph could not be rendered in the requested format.
    Serialization(String),

    /// A triple violates RDF term positions (e.g. a literal subject).
    InvalidTriple(String),

    /// The payload bytes are not valid UTF-8.
    Encoding(std::str::Utf8Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "parse error: {}", msg),
            Self::Serialization(msg) => write!(f, "serialization error: {}", msg),
            Self::InvalidTriple(msg) => write!(f, "invalid triple: {}", msg),
            Self::Encoding(err) => write!(f, "encoding error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encoding(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::Encoding(err)
    }
}

impl From<rio_turtle::TurtleError> for Error {
    fn from(err: rio_turtle::TurtleError) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(format!("invalid JSON: {}", err))
    }
}
