// lib/src/errors.rs

use thiserror::Error;

use models::{Action, EntityKind, FieldErrors};
use rest_api::{ApiError, ErrorKind};
use security::AuthError;

#[derive(Debug, Error)]
pub enum PortalError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Invalid input: {0}")]
    Validation(#[from] FieldErrors),

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("No doctor profile is linked to this account")]
    NotADoctor,

    #[error("Cannot {action} this {kind} while it is {status}")]
    ActionNotAllowed { kind: EntityKind, action: Action, status: String },

    #[error("{action} needs to be confirmed first")]
    ConfirmationRequired { action: Action },

    #[error("Record {0} is not loaded")]
    NotLoaded(i64),

    #[error("{0}")]
    Wizard(String),
}

pub type PortalResult<T> = Result<T, PortalError>;

impl PortalError {
    /// Where this failure falls in the user-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PortalError::Api(err) => err.kind(),
            PortalError::Validation(_)
            | PortalError::ActionNotAllowed { .. }
            | PortalError::ConfirmationRequired { .. }
            | PortalError::NotLoaded(_)
            | PortalError::Wizard(_) => ErrorKind::Validation,
            PortalError::Auth(AuthError::PortalDenied { .. }) | PortalError::NotADoctor => {
                ErrorKind::Permission
            }
            PortalError::Auth(_) => ErrorKind::Session,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            PortalError::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}
