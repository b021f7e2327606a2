use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One entry of the panel's `{"errors": [...]}` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PanelError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl std::fmt::Display for PanelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.code, &self.detail) {
            (Some(code), Some(detail)) => write!(f, "{}: {}", code, detail),
            (None, Some(detail)) => write!(f, "{}", detail),
            (Some(code), None) => write!(f, "{}", code),
            (None, None) => write!(f, "unknown error"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid client configuration: {0}")]
    Configuration(String),

    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        /// Present when the panel rejected the input (HTTP 422).
        body: Option<String>,
    },

    #[error("Resource not found: {message}")]
    NotFound { message: String, body: String },

    #[error("Panel unavailable (HTTP 503): {0}")]
    ServiceUnavailable(String),

    #[error("Panel returned an error (HTTP {status}): {}", format_panel_errors(.errors))]
    Api {
        status: u16,
        errors: Vec<PanelError>,
        body: String,
    },

    #[error("Unexpected HTTP status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response (HTTP {status}): {message}")]
    InvalidResponse { status: u16, message: String },

    #[error("Unsupported: {0}")]
    Unsupported(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

fn format_panel_errors(errors: &[PanelError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ApiError {
    /// Truncate a response body to avoid carrying excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            body: None,
        }
    }

    /// HTTP status code attached to this error, if the panel answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Validation { body: Some(_), .. } => Some(422),
            ApiError::NotFound { .. } => Some(404),
            ApiError::ServiceUnavailable(_) => Some(503),
            ApiError::Api { status, .. }
            | ApiError::Http { status, .. }
            | ApiError::InvalidResponse { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
