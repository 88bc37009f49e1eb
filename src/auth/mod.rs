use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::authz::{LoginUser, Role};
use crate::config;

/// Session token claims. The role travels as the stored role string so that
/// legacy accounts with an empty role keep their compatibility behavior.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i64, role: &str) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.session_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user_id,
            role: role.to_string(),
            exp,
            iat: now.timestamp(),
        }
    }

    /// The caller identity these claims resolve to.
    pub fn login_user(&self) -> LoginUser {
        LoginUser {
            id: self.sub,
            role: Role::parse(&self.role),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionTokenError {
    #[error("session secret not configured")]
    MissingSecret,
    #[error("invalid session token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

pub fn issue_session_token(claims: &Claims) -> Result<String, SessionTokenError> {
    let secret = &config::config().security.session_secret;
    if secret.is_empty() {
        return Err(SessionTokenError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    Ok(encode(&Header::default(), claims, &encoding_key)?)
}

pub fn verify_session_token(token: &str) -> Result<Claims, SessionTokenError> {
    let secret = &config::config().security.session_secret;
    if secret.is_empty() {
        return Err(SessionTokenError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_verify_and_resolve_the_caller() {
        let claims = Claims::new(5, "tenant");
        let token = issue_session_token(&claims).unwrap();

        let decoded = verify_session_token(&token).unwrap();
        let caller = decoded.login_user();
        assert_eq!(caller.id, 5);
        assert_eq!(caller.role, Role::Tenant);
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        assert!(verify_session_token("not-a-token").is_err());
    }
}
