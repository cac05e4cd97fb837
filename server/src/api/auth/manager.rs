//! Authentication manager

use anyhow::Result;
use chrono::Duration;

use super::jwt::{AccessClaims, TokenError, create_access_token, validate_access_token};
use crate::data::types::{Role, Scope};

/// Main authentication manager
///
/// Holds the signing key and token TTL. Issue/validate/refresh are pure
/// functions over the signed token; there is no server-side session store.
#[derive(Debug)]
pub struct AuthManager {
    signing_key: Vec<u8>,
    token_ttl_minutes: i64,
}

impl AuthManager {
    pub fn new(signing_key: Vec<u8>, token_ttl_minutes: i64) -> Self {
        tracing::debug!(ttl_minutes = token_ttl_minutes, "Auth manager initialized");
        Self {
            signing_key,
            token_ttl_minutes,
        }
    }

    pub fn token_ttl_minutes(&self) -> i64 {
        self.token_ttl_minutes
    }

    /// Token lifetime in seconds, as reported in token responses
    pub fn expires_in_secs(&self) -> i64 {
        self.token_ttl_minutes * 60
    }

    /// Issue a signed access token for a verified identity
    pub fn issue_token(&self, user_id: &str, role: Role, scopes: &[Scope]) -> Result<String> {
        create_access_token(
            &self.signing_key,
            user_id,
            role,
            scopes,
            Duration::minutes(self.token_ttl_minutes),
        )
    }

    /// Validate a JWT access token
    pub fn validate_session(&self, token: &str) -> Result<AccessClaims, TokenError> {
        validate_access_token(token, &self.signing_key)
    }

    /// Exchange a still-valid token for a fresh one with the same subject,
    /// role, and scopes. Expired or invalid tokens are rejected; there is no
    /// silent extension past expiry.
    pub fn refresh_token(&self, token: &str) -> Result<String, TokenError> {
        let claims = self.validate_session(token)?;
        let scopes = claims.scopes().unwrap_or_default();

        create_access_token(
            &self.signing_key,
            claims.user_id(),
            claims.role(),
            &scopes,
            Duration::minutes(self.token_ttl_minutes),
        )
        .map_err(|e| TokenError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::Scope;

    fn manager() -> AuthManager {
        AuthManager::new(vec![7u8; 32], 60)
    }

    #[test]
    fn test_issue_and_validate() {
        let mgr = manager();
        let token = mgr
            .issue_token("user-1", Role::User, &[Scope::Profile])
            .unwrap();

        let claims = mgr.validate_session(&token).unwrap();
        assert_eq!(claims.user_id(), "user-1");
        assert_eq!(claims.role(), Role::User);
        assert_eq!(claims.scopes(), Some(vec![Scope::Profile]));
    }

    #[test]
    fn test_refresh_preserves_identity_and_extends_expiry() {
        let mgr = manager();
        let token = mgr
            .issue_token("user-1", Role::Admin, &[Scope::StockWrite])
            .unwrap();
        let original = mgr.validate_session(&token).unwrap();

        let refreshed = mgr.refresh_token(&token).unwrap();
        let claims = mgr.validate_session(&refreshed).unwrap();

        assert_eq!(claims.user_id(), "user-1");
        assert_eq!(claims.role(), Role::Admin);
        assert_eq!(claims.scopes(), Some(vec![Scope::StockWrite]));
        // Fresh expiry, computed from now rather than the old token
        assert!(claims.exp >= original.exp);
        assert_ne!(claims.jti, original.jti);
    }

    #[test]
    fn test_refresh_rejects_expired() {
        use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

        let mgr = manager();
        let mut claims =
            super::AccessClaims::new("user-1", Role::User, &[], Duration::minutes(60));
        claims.iat -= 7200;
        claims.exp = claims.iat + 60;
        let expired = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&[7u8; 32]),
        )
        .unwrap();

        let err = mgr.refresh_token(&expired).unwrap_err();
        assert!(matches!(err, TokenError::Expired));
    }

    #[test]
    fn test_refresh_rejects_garbage() {
        let mgr = manager();
        assert!(mgr.refresh_token("garbage").is_err());
    }
}
