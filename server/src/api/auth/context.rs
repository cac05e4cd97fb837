//! Authenticated request context
//!
//! Built by the auth middleware from validated token claims and read by the
//! route extractors. Carries everything authorization needs, so no database
//! lookup happens per request.

use super::jwt::AccessClaims;
use crate::api::types::ApiError;
use crate::data::types::{Role, Scope};

/// Identity and claims of the authenticated caller
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
    pub role: Role,
    /// None means the token carries no scope restriction
    pub scopes: Option<Vec<Scope>>,
}

impl AuthContext {
    pub fn from_claims(claims: &AccessClaims) -> Self {
        Self {
            user_id: claims.user_id().to_string(),
            role: claims.role(),
            scopes: claims.scopes(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Check whether the context covers a scope. A token without a scope
    /// claim is unrestricted; a scoped token must list the required scope.
    pub fn has_scope(&self, required: Scope) -> bool {
        match &self.scopes {
            None => true,
            Some(scopes) => scopes.contains(&required),
        }
    }

    /// Scope check as a guard. This is a 403: the caller is authenticated,
    /// just not allowed.
    pub fn require_scope(&self, required: Scope) -> Result<(), ApiError> {
        if self.has_scope(required) {
            Ok(())
        } else {
            Err(ApiError::forbidden(
                "INSUFFICIENT_SCOPE",
                format!("This operation requires the '{}' scope", required),
            ))
        }
    }

    /// Role check as a guard. Also a 403, never a 401.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::forbidden("ADMIN_REQUIRED", "Admin access required"))
        }
    }
}
