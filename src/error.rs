use thiserror::Error;

/// Maximum characters of a response body carried in error messages.
pub(crate) const MAX_ERROR_BODY_CHARS: usize = 200;

/// Errors produced by the CVM client.
#[derive(Debug, Error)]
pub enum CvmError {
    /// No credential bound to the client, or the provider yielded an
    /// empty secret id. Raised before any network I/O.
    #[error("missing credential: {0}")]
    MissingCredential(String),

    /// Request object failed local validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Credential present but signature computation failed.
    #[error("signing error: {0}")]
    Signing(String),

    /// Network failure, TLS failure, or a response whose envelope could
    /// not be decoded. `status` is set when an HTTP status was received.
    #[error("transport error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Transport { status: Option<u16>, message: String },

    /// Decoded provider error. `code` is a dot-separated string such as
    /// `InvalidInstanceId.NotFound`, exposed verbatim.
    #[error("service error (RequestId: {request_id}): [{code}] {message}")]
    Service {
        code: String,
        message: String,
        request_id: String,
    },

    /// The call's context was cancelled.
    #[error("call cancelled")]
    Cancelled,

    /// The call's context deadline expired.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// Response deserialization error.
    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// Client or credential-file configuration error.
    #[error("config error: {0}")]
    Config(String),
}

impl CvmError {
    /// Returns `true` if the error may be recovered by retrying the call.
    ///
    /// Transport errors and a small set of provider codes
    /// (`RequestLimitExceeded`, `InternalError`, `ServiceUnavailable`)
    /// qualify. Whether a retry actually happens also depends on the
    /// action's idempotency, decided in the retry module.
    pub fn is_retryable(&self) -> bool {
        match self {
            CvmError::Transport { .. } => true,
            CvmError::Service { code, .. } => crate::retry::is_retryable_code(code),
            _ => false,
        }
    }

    /// Returns the provider error code if this is a service error.
    pub fn code(&self) -> Option<&str> {
        match self {
            CvmError::Service { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Returns the server-assigned request id if this is a service error.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            CvmError::Service { request_id, .. } => Some(request_id),
            _ => None,
        }
    }
}

/// A specialized Result type for CVM operations.
pub type Result<T> = std::result::Result<T, CvmError>;

/// Truncates a string to at most `max_chars` characters on a valid UTF-8 boundary.
pub(crate) fn truncate_str(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
