//! Places search error types

use thiserror::Error;

/// Search failure with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct PlacesError {
    pub kind: PlacesErrorKind,
    pub message: String,
}

impl PlacesError {
    pub fn new(kind: PlacesErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Non-2xx response; `body` is kept verbatim
    pub fn upstream_http(status: u16, body: impl Into<String>) -> Self {
        Self::new(PlacesErrorKind::UpstreamHttp { status }, body)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PlacesErrorKind::Network, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(PlacesErrorKind::InvalidResponse, message)
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacesErrorKind {
    /// The service answered with a non-2xx status
    UpstreamHttp { status: u16 },
    /// Connection failure or deadline exceeded
    Network,
    /// 2xx response whose body could not be decoded
    InvalidResponse,
}

impl PlacesErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UpstreamHttp { .. } => "upstream_http",
            Self::Network => "network",
            Self::InvalidResponse => "invalid_response",
        }
    }
}
