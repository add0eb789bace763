// security/src/lib.rs

use std::fmt;

use models::Role;

pub mod claims;
pub mod roles;
pub mod session;
pub mod token_store;

pub use claims::{Claims, decode_claims};
pub use roles::{Portal, RoleConfig, RolesConfig};
pub use session::{Session, SessionUser};
pub use token_store::TokenStore;

/// Client-side authentication and gating errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    InvalidToken(String),
    MissingClaim(&'static str),
    Expired,
    NotSignedIn,
    PortalDenied { role: Role, portal: Portal },
    Storage(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AuthError::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
            AuthError::MissingClaim(claim) => write!(f, "Token is missing the '{}' claim", claim),
            AuthError::Expired => write!(f, "Session has expired, please sign in again"),
            AuthError::NotSignedIn => write!(f, "Not signed in"),
            AuthError::PortalDenied { role, portal } => {
                write!(f, "Role {} cannot open the {} portal", role, portal)
            }
            AuthError::Storage(msg) => write!(f, "Session storage error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}
