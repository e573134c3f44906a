use thiserror::Error;

/// Errors reported by an embedding host.
///
/// These never reach extension scripts directly; the adapters map them to the
/// platform's empty-result shapes. They are kept typed so an embedder can
/// observe them through the `try_*` adapter methods.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum HostError {
    #[error("Host rejected cookie write: {reason}")]
    WriteRejected { reason: String },
    #[error("Host could not interpret URL: {url}")]
    InvalidUrl { url: String },
    #[error("Host dropped the completion without settling it")]
    Dropped,
    #[error("Host error: {0}")]
    Other(String),
}

impl HostError {
    pub fn write_rejected(reason: impl Into<String>) -> Self {
        HostError::WriteRejected {
            reason: reason.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        HostError::Other(message.into())
    }
}

/// Crate error type.
#[derive(Debug, Error)]
pub enum ShimError {
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Unknown method '{method}' for the {api} API")]
    UnknownMethod { api: &'static str, method: String },
    #[error("Invalid arguments for '{method}': {reason}")]
    InvalidArguments { method: String, reason: String },
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ShimError {
    pub fn invalid_url(url: impl Into<String>, source: url::ParseError) -> Self {
        ShimError::InvalidUrl {
            url: url.into(),
            source,
        }
    }

    pub fn unknown_method(api: &'static str, method: impl Into<String>) -> Self {
        ShimError::UnknownMethod {
            api,
            method: method.into(),
        }
    }

    pub fn invalid_arguments(method: impl Into<String>, reason: impl Into<String>) -> Self {
        ShimError::InvalidArguments {
            method: method.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error originated in the host rather than in the shim.
    pub fn is_host_error(&self) -> bool {
        matches!(self, ShimError::Host(_))
    }
}

pub type ShimResult<T> = Result<T, ShimError>;
