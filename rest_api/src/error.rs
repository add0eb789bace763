// rest_api/src/error.rs

use serde_json::Value;
use thiserror::Error;

use models::FieldErrors;

/// Fragments the backend uses in permission/ownership failures that come back
/// with a generic status code.
const PERMISSION_MARKERS: &[&str] = &["permission", "quyền", "not allowed", "forbidden"];

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Session expired or invalid: {message}")]
    Unauthorized { message: String },
    #[error("Permission denied: {message}")]
    Forbidden { message: String },
    #[error("Not found: {message}")]
    NotFound { message: String },
    #[error("Server error ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("Unexpected response: {0}")]
    Decode(String),
    #[error("Invalid input: {0}")]
    Validation(#[from] FieldErrors),
}

/// Coarse classification used to pick how a failure is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Session,
    Permission,
    Validation,
    Server,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Maps a non-2xx response to an error, preferring the status code and
    /// only falling back to message inspection for permission failures.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let message = extract_message(body).unwrap_or_else(|| default_message(status));
        match status {
            401 => ApiError::Unauthorized { message },
            403 => ApiError::Forbidden { message },
            404 => ApiError::NotFound { message },
            _ if mentions_permission(&message) => ApiError::Forbidden { message },
            _ => ApiError::Http { status, message },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport(_) | ApiError::Timeout => ErrorKind::Network,
            ApiError::Unauthorized { .. } => ErrorKind::Session,
            ApiError::Forbidden { .. } => ErrorKind::Permission,
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::NotFound { .. } | ApiError::Http { .. } | ApiError::Decode(_) => ErrorKind::Server,
        }
    }

    pub fn is_network(&self) -> bool {
        self.kind() == ErrorKind::Network
    }

    /// Text suitable for an alert or banner; the server's own message when it
    /// sent one.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(_) | ApiError::Timeout => {
                "Cannot reach the server, please check the connection and retry".to_string()
            }
            ApiError::Unauthorized { .. } => "Your session has expired, please sign in again".to_string(),
            ApiError::Forbidden { message }
            | ApiError::NotFound { message }
            | ApiError::Http { message, .. } => message.clone(),
            ApiError::Decode(_) => "The server sent an unexpected response".to_string(),
            ApiError::Validation(errors) => errors.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(format!("JSON processing error: {}", err))
    }
}

pub fn mentions_permission(message: &str) -> bool {
    let lowered = message.to_lowercase();
    PERMISSION_MARKERS.iter().any(|marker| lowered.contains(marker))
}

fn extract_message(body: &[u8]) -> Option<String> {
    if body.is_empty() {
        return None;
    }
    if let Ok(json) = serde_json::from_slice::<Value>(body) {
        for key in ["message", "error", "detail"] {
            if let Some(text) = json.get(key).and_then(Value::as_str) {
                if !text.trim().is_empty() {
                    return Some(text.trim().to_string());
                }
            }
        }
        if let Some(errors) = json.get("errors").and_then(Value::as_array) {
            let joined: Vec<&str> = errors.iter().filter_map(Value::as_str).collect();
            if !joined.is_empty() {
                return Some(joined.join("; "));
            }
        }
        return None;
    }
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() || text.starts_with('<') {
        None
    } else {
        Some(models::display::truncate(text, 200))
    }
}

fn default_message(status: u16) -> String {
    match status {
        400 => "Bad request".to_string(),
        401 => "Unauthorized".to_string(),
        403 => "Forbidden".to_string(),
        404 => "Resource not found".to_string(),
        409 => "Conflict".to_string(),
        500..=599 => "Internal server error".to_string(),
        _ => format!("Request failed with status {}", status),
    }
}
