//! Error family shared by every client operation
//!
//! Transport failures, undecodable payloads and locally rejected queries all
//! surface as one [`ClientError`], so callers catch a single type regardless
//! of where the failure originated.

/// Max characters of a response body kept in an error message
const ERROR_BODY_LIMIT: usize = 500;

/// Error from a client operation (request, decode, or query construction).
#[derive(Debug)]
pub enum ClientError {
    /// Network failure or non-2xx HTTP response
    Transport {
        status: Option<u16>,
        message: String,
    },
    /// Response body was not valid JSON, or not the shape we expected
    Decode(String),
    /// Query rejected before any request was sent
    InvalidQuery(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport {
                status: Some(s),
                message,
            } => write!(f, "HTTP {s}: {message}"),
            Self::Transport {
                status: None,
                message,
            } => write!(f, "HTTP error: {message}"),
            Self::Decode(msg) => write!(f, "decode error: {msg}"),
            Self::InvalidQuery(msg) => write!(f, "invalid query: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}

impl ClientError {
    /// Create a transport error from a reqwest error.
    ///
    /// The request URL is stripped: it carries the contact email.
    pub fn from_reqwest(e: reqwest::Error) -> Self {
        let status = e.status().map(|s| s.as_u16());
        Self::Transport {
            status,
            message: e.without_url().to_string(),
        }
    }

    /// Create a transport error from a non-2xx response and its body.
    ///
    /// The service explains rejected filters in the body, so it is kept:
    /// JSON bodies re-serialized compactly, anything else trimmed.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = match serde_json::from_str::<serde_json::Value>(body) {
            Ok(json) => json.to_string(),
            Err(_) => body.trim().to_string(),
        };
        let message = if detail.is_empty() {
            "empty response body".to_string()
        } else if detail.chars().count() > ERROR_BODY_LIMIT {
            let cut: String = detail.chars().take(ERROR_BODY_LIMIT).collect();
            format!("{cut}...")
        } else {
            detail
        };
        Self::Transport {
            status: Some(status),
            message,
        }
    }

    /// HTTP status code, if the failure came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether retrying the same request may succeed.
    ///
    /// Rate limiting (429), server errors (5xx) and connection-level failures
    /// are transient. Anything else (bad filter = 400, unknown id = 404,
    /// malformed payloads) will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { status: None, .. } => true,
            Self::Transport {
                status: Some(s), ..
            } => *s == 429 || (500..=599).contains(s),
            Self::Decode(_) | Self::InvalidQuery(_) => false,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
