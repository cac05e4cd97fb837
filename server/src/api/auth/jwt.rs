//! JWT access token handling
//!
//! Tokens are stateless: subject id, role, optional scope list, and expiry
//! are signed with HS256. Validation never touches the database, so it is
//! safe to run fully in parallel.

use anyhow::{Result, anyhow};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::data::types::{Role, Scope};

/// Token validation error
#[derive(Debug, Error)]
pub enum TokenError {
    /// Token has expired (checked against current UTC time)
    #[error("Access token has expired")]
    Expired,

    /// Token signature is invalid
    #[error("Invalid access token signature")]
    InvalidSignature,

    /// Other validation error
    #[error("Invalid access token: {0}")]
    Invalid(String),
}

/// JWT claims for access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User ID
    pub sub: String,
    /// Role name ("user" or "admin")
    pub role: String,
    /// Space-delimited scope list; absent means unrestricted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

impl AccessClaims {
    pub fn new(user_id: &str, role: Role, scopes: &[Scope], ttl: Duration) -> Self {
        let now = Utc::now();
        let exp = now + ttl;

        Self {
            sub: user_id.to_string(),
            role: role.as_str().to_string(),
            scope: if scopes.is_empty() {
                None
            } else {
                Some(Scope::format_list(scopes))
            },
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Get the user ID from claims
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    /// Get the role claim as the closed enum
    pub fn role(&self) -> Role {
        Role::from_db(&self.role)
    }

    /// Get the scope claim as parsed scopes; None means unrestricted.
    /// We only sign scopes from the registry, so unknown names (from an
    /// older registry version) are simply dropped.
    pub fn scopes(&self) -> Option<Vec<Scope>> {
        self.scope
            .as_deref()
            .map(|s| s.split_whitespace().filter_map(Scope::parse).collect())
    }
}

/// Create a signed JWT access token
pub fn create_access_token(
    signing_key: &[u8],
    user_id: &str,
    role: Role,
    scopes: &[Scope],
    ttl: Duration,
) -> Result<String> {
    let claims = AccessClaims::new(user_id, role, scopes, ttl);
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )
    .map_err(|e| anyhow!("Failed to create JWT: {}", e))
}

/// Validate and decode a JWT access token
pub fn validate_access_token(
    token: &str,
    signing_key: &[u8],
) -> Result<AccessClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data =
        decode::<AccessClaims>(token, &DecodingKey::from_secret(signing_key), &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Invalid(e.to_string()),
            })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> Vec<u8> {
        vec![0u8; 32]
    }

    /// Encode claims directly (for expired-token tests)
    fn encode_raw(claims: &AccessClaims, key: &[u8]) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(key),
        )
        .unwrap()
    }

    #[test]
    fn test_roundtrip_preserves_claims() {
        let key = test_key();
        let token = create_access_token(
            &key,
            "user-1",
            Role::Admin,
            &[Scope::StockRead, Scope::MovementsWrite],
            Duration::minutes(60),
        )
        .unwrap();

        let claims = validate_access_token(&token, &key).unwrap();
        assert_eq!(claims.user_id(), "user-1");
        assert_eq!(claims.role(), Role::Admin);
        assert_eq!(
            claims.scopes(),
            Some(vec![Scope::StockRead, Scope::MovementsWrite])
        );
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_no_scopes_means_unrestricted() {
        let key = test_key();
        let token =
            create_access_token(&key, "user-1", Role::User, &[], Duration::minutes(60)).unwrap();
        let claims = validate_access_token(&token, &key).unwrap();
        assert!(claims.scope.is_none());
        assert!(claims.scopes().is_none());
    }

    #[test]
    fn test_expired_token_rejected() {
        let key = test_key();
        // Well past the default validation leeway
        let mut claims =
            AccessClaims::new("user-1", Role::User, &[], Duration::minutes(60));
        claims.iat -= 7200;
        claims.exp = claims.iat + 60;

        let token = encode_raw(&claims, &key);
        let err = validate_access_token(&token, &key).unwrap_err();
        assert!(matches!(err, TokenError::Expired));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let key1 = vec![0u8; 32];
        let key2 = vec![1u8; 32];
        let token =
            create_access_token(&key1, "user-1", Role::User, &[], Duration::minutes(60)).unwrap();
        let err = validate_access_token(&token, &key2).unwrap_err();
        assert!(matches!(err, TokenError::InvalidSignature));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let key = test_key();
        let err = validate_access_token("not.a.jwt", &key).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn test_unique_jti() {
        let c1 = AccessClaims::new("u", Role::User, &[], Duration::minutes(1));
        let c2 = AccessClaims::new("u", Role::User, &[], Duration::minutes(1));
        assert_ne!(c1.jti, c2.jti);
    }
}
