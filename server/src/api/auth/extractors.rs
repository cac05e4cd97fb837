//! Authorization extractors for Axum handlers
//!
//! `Auth` gives any authenticated context; `AdminOnly` additionally requires
//! the admin role and rejects with 403 otherwise. Both assume the
//! `require_auth` middleware already ran (401 on missing/invalid tokens
//! happens there).

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::context::AuthContext;
use crate::api::types::ApiError;

/// Authenticated context extractor
pub struct Auth {
    pub ctx: AuthContext,
}

impl Auth {
    pub fn user_id(&self) -> &str {
        &self.ctx.user_id
    }
}

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError::internal("Auth context not available"))?;

        Ok(Self { ctx })
    }
}

/// Authenticated admin extractor. Valid token with a non-admin role is a
/// 403, never a 401.
pub struct AdminOnly {
    pub ctx: AuthContext,
}

impl AdminOnly {
    pub fn user_id(&self) -> &str {
        &self.ctx.user_id
    }
}

impl<S> FromRequestParts<S> for AdminOnly
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError::internal("Auth context not available"))?;

        ctx.require_admin()?;

        Ok(Self { ctx })
    }
}
