// security/src/claims.rs

// The portal never holds the signing secret. Claims are read for gating and
// expiry only; the server re-validates the token on every request.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use models::Role;

use crate::AuthError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub doctor_id: Option<i64>,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
}

impl Claims {
    /// First role claim, with any Spring-style `ROLE_` prefix removed.
    pub fn primary_role(&self) -> Option<Role> {
        self.role
            .iter()
            .chain(self.roles.iter())
            .map(|raw| raw.trim())
            .find(|raw| !raw.is_empty())
            .map(|raw| Role::parse(raw.strip_prefix("ROLE_").unwrap_or(raw)))
    }

    /// `email` claim, falling back to `sub` when it looks like an address.
    pub fn email(&self) -> Option<String> {
        self.email
            .clone()
            .or_else(|| self.sub.clone().filter(|sub| sub.contains('@')))
    }
}

pub fn decode_claims(token: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<Claims>(token.trim(), &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
}
