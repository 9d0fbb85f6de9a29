use std::fmt;

use thiserror::Error;

/// The operation a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// URI derivation, before any request is made.
    Uri,
    Get,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Uri => "uri",
            Method::Get => "get",
            Method::Put => "put",
            Method::Delete => "delete",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tiddler that cannot be addressed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("host required")]
    HostRequired,

    #[error("no container data provided, bag or recipe required")]
    NoContainer,
}

/// A server timestamp that does not decode to a UTC instant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("expected 12 to 17 digits, got {0} characters")]
    Length(usize),

    #[error("non-digit character in timestamp {0:?}")]
    NonNumeric(String),

    #[error("timestamp {0:?} is out of range")]
    OutOfRange(String),
}

#[derive(Debug, Error)]
pub enum FntError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("{method} failed: {status} - {message}")]
    Status {
        method: Method,
        status: u16,
        message: String,
    },

    #[error("{method} failed: HTTP error: {source}")]
    Http {
        method: Method,
        #[source]
        source: reqwest::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid tiddler document: {0}")]
    Decode(String),

    #[error("invalid timestamp: {0}")]
    Timestamp(#[from] TimestampError),
}

impl FntError {
    /// True for failures detected locally before any request was sent.
    pub fn is_configuration(&self) -> bool {
        matches!(self, FntError::Configuration(_))
    }

    /// True for non-2xx responses and network failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, FntError::Status { .. } | FntError::Http { .. })
    }

    /// HTTP status of the response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            FntError::Status { status, .. } => Some(*status),
            FntError::Http { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn method(&self) -> Option<Method> {
        match self {
            FntError::Configuration(_) => Some(Method::Uri),
            FntError::Status { method, .. } | FntError::Http { method, .. } => Some(*method),
            _ => None,
        }
    }
}
