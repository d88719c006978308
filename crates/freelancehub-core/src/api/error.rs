use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Request rejected ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// JSON keys the backend uses for a human-readable error message, in order of preference
const MESSAGE_KEYS: [&str; 3] = ["msg", "message", "error"];

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let cut: String = body.chars().take(MAX_ERROR_BODY_LENGTH).collect();
            format!("{}... (truncated, {} total bytes)", cut, body.len())
        }
    }

    /// Pull the server-supplied message out of a JSON error body, if there is one.
    pub fn server_message_from_body(body: &str) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        MESSAGE_KEYS.iter().find_map(|key| {
            value
                .get(*key)
                .and_then(|v| v.as_str())
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        })
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = Self::server_message_from_body(body);
        let detail = message.clone().unwrap_or_else(|| Self::truncate_body(body));
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(detail),
            404 => ApiError::NotFound(detail),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(detail),
            code @ 400..=499 => ApiError::Rejected { status: code, message },
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, detail)),
        }
    }

    /// The message the server attached to this error, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => message.as_deref(),
            ApiError::AccessDenied(msg) | ApiError::NotFound(msg) | ApiError::ServerError(msg) => {
                // Raw JSON or HTML bodies are not shown to users
                Self::looks_like_message(msg).then_some(msg.as_str())
            }
            _ => None,
        }
    }

    /// Message to show a user: the server's message when present, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }

    fn looks_like_message(s: &str) -> bool {
        let trimmed = s.trim_start();
        !trimmed.is_empty() && !trimmed.starts_with('{') && !trimmed.starts_with('<')
    }
}
