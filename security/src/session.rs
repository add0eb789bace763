// security/src/session.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use models::Role;

use crate::AuthError;
use crate::claims::decode_claims;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub role: Role,
    /// Present when the auth payload already carries it; otherwise resolved
    /// lazily by the doctor directory.
    #[serde(default)]
    pub doctor_id: Option<i64>,
}

/// Explicit authentication context handed to every data-loading call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
    /// Unix seconds, taken from the `exp` claim.
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl Session {
    pub fn new(token: impl Into<String>, user: SessionUser) -> Self {
        Session { token: token.into(), user, expires_at: None }
    }

    /// Builds a session from the claims carried by `token`.
    pub fn from_token(token: &str) -> Result<Self, AuthError> {
        let claims = decode_claims(token)?;
        let id = claims.user_id.ok_or(AuthError::MissingClaim("userId"))?;
        let email = claims.email().ok_or(AuthError::MissingClaim("email"))?;
        let role = claims.primary_role().ok_or(AuthError::MissingClaim("role"))?;
        Ok(Session {
            token: token.trim().to_string(),
            user: SessionUser {
                id,
                email,
                full_name: claims.full_name.clone(),
                role,
                doctor_id: claims.doctor_id,
            },
            expires_at: claims.exp,
        })
    }

    /// Value of the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    pub fn role(&self) -> &Role {
        &self.user.role
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now.timestamp())
    }

    /// Fails once the token's expiry has passed.
    pub fn ensure_fresh(&self, now: DateTime<Utc>) -> Result<&Self, AuthError> {
        if self.is_expired(now) { Err(AuthError::Expired) } else { Ok(self) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::tests::token;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn session_is_built_from_claims() {
        let raw = token(json!({
            "sub": "doc@clinic.vn",
            "userId": 7,
            "role": "DOCTOR",
            "doctorId": 3,
            "exp": 1_700_000_000i64
        }));
        let session = Session::from_token(&format!(" {} ", raw)).unwrap();
        assert_eq!(session.user.id, 7);
        assert_eq!(session.user.doctor_id, Some(3));
        assert_eq!(session.role(), &Role::Doctor);
        assert_eq!(session.bearer(), format!("Bearer {}", raw));

        let before = Utc.timestamp_opt(1_699_999_999, 0).unwrap();
        let after = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert!(!session.is_expired(before));
        assert_eq!(session.ensure_fresh(after), Err(AuthError::Expired));
    }

    #[test]
    fn missing_user_id_is_reported() {
        let raw = token(json!({ "sub": "a@b.c", "role": "PATIENT" }));
        assert_eq!(Session::from_token(&raw), Err(AuthError::MissingClaim("userId")));
    }
}
