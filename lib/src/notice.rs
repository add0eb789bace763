// lib/src/notice.rs

// User-facing feedback produced by page operations: what a toast or alert box
// would show.

use std::fmt;

use rest_api::ErrorKind;

use crate::errors::PortalError;

pub const PERMISSION_DENIED_MESSAGE: &str = "You do not have permission to perform this action";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Notice { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Notice { level: NoticeLevel::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice { level: NoticeLevel::Error, message: message.into() }
    }

    /// Permission failures get their own wording, with the server's detail
    /// appended when it sent one.
    pub fn from_error(err: &PortalError) -> Self {
        match err.kind() {
            ErrorKind::Permission => {
                let detail = err.user_message();
                if detail.is_empty() || detail == PERMISSION_DENIED_MESSAGE {
                    Notice::error(PERMISSION_DENIED_MESSAGE)
                } else {
                    Notice::error(format!("{}: {}", PERMISSION_DENIED_MESSAGE, detail))
                }
            }
            ErrorKind::Validation => Notice::warning(err.user_message()),
            _ => Notice::error(err.user_message()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rest_api::ApiError;

    #[test]
    fn permission_errors_get_a_dedicated_notice() {
        let err = PortalError::from(ApiError::from_response(400, r#"{"message": "Không có quyền"}"#.as_bytes()));
        let notice = Notice::from_error(&err);
        assert!(notice.is_error());
        assert!(notice.message.starts_with(PERMISSION_DENIED_MESSAGE));
        assert!(notice.message.ends_with("Không có quyền"));
    }

    #[test]
    fn network_and_validation_wording() {
        let notice = Notice::from_error(&PortalError::from(ApiError::Timeout));
        assert!(notice.message.contains("Cannot reach the server"));
        let notice = Notice::from_error(&PortalError::Wizard("Add at least one medicine".into()));
        assert_eq!(notice.level, NoticeLevel::Warning);
    }
}
