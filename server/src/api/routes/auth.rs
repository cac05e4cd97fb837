//! Authentication API endpoints
//!
//! Token issuance is an OAuth2 password grant over a form body, optionally
//! carrying registered-client credentials and a requested scope list. The
//! token is returned in the body and mirrored into an HTTP-only cookie.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Form, Json, Router};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::auth::middleware::bearer_token;
use crate::api::auth::{AuthError, AuthManager, TokenError};
use crate::api::types::ApiError;
use crate::core::constants::TOKEN_COOKIE_NAME;
use crate::data::SqliteService;
use crate::data::sqlite::repositories::{oauth_client, user};
use crate::data::types::Scope;
use crate::utils::password;

/// OAuth2 password grant request (form-encoded)
#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenRequest {
    pub grant_type: String,
    pub username: String,
    pub password: String,
    /// Space-delimited scope names from the fixed registry
    pub scope: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Seconds until expiry (also the cookie max-age)
    pub expires_in: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// Auth state with database access
#[derive(Clone)]
pub struct AuthRoutesState {
    pub auth_manager: Arc<AuthManager>,
    pub database: Arc<SqliteService>,
}

/// Create auth routes
pub fn routes(auth_manager: Arc<AuthManager>, database: Arc<SqliteService>) -> Router {
    let state = AuthRoutesState {
        auth_manager,
        database,
    };

    Router::new()
        .route("/token", post(issue_token))
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout))
        .with_state(state)
}

fn token_cookie(token: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE_NAME, token))
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/api")
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

/// Issue an access token for user credentials (password grant)
#[utoipa::path(
    post,
    path = "/api/v1/auth/token",
    tag = "auth",
    request_body(content = TokenRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Unsupported grant type or unknown scope"),
        (status = 401, description = "Invalid user or client credentials")
    )
)]
pub async fn issue_token(
    State(state): State<AuthRoutesState>,
    jar: CookieJar,
    Form(request): Form<TokenRequest>,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    if request.grant_type != "password" {
        return Err(ApiError::bad_request(
            "UNSUPPORTED_GRANT",
            format!("Unsupported grant_type: {}", request.grant_type),
        ));
    }

    let scopes = match request.scope.as_deref() {
        Some(raw) => Scope::parse_list(raw).map_err(|name| {
            ApiError::bad_request("INVALID_SCOPE", format!("Unknown scope: {}", name))
        })?,
        None => Vec::new(),
    };

    let pool = state.database.pool();

    // When client credentials are presented, the registered client must
    // verify before the user is even looked up.
    if let Some(client_id) = request.client_id.as_deref() {
        let secret = request.client_secret.as_deref().unwrap_or("");
        let client = oauth_client::get_by_client_id(pool, client_id)
            .await
            .map_err(ApiError::from_sqlite)?;

        let valid = client
            .map(|c| password::verify(&c.client_secret_hash, secret))
            .unwrap_or(false);
        if !valid {
            tracing::warn!(client_id, "Token request with invalid client credentials");
            return Err(ApiError::unauthorized(
                "INVALID_CLIENT",
                "Invalid client credentials",
            ));
        }
    }

    tracing::debug!(username = %request.username, "Login attempt");

    let login_user = user::get_by_username(pool, &request.username)
        .await
        .map_err(ApiError::from_sqlite)?;

    let Some(login_user) = login_user else {
        tracing::warn!(username = %request.username, "Login failed: user not found");
        return Err(ApiError::unauthorized(
            "INVALID_CREDENTIALS",
            "Invalid credentials",
        ));
    };

    if !password::verify(&login_user.password_hash, &request.password) {
        tracing::warn!(username = %request.username, "Login failed: wrong password");
        return Err(ApiError::unauthorized(
            "INVALID_CREDENTIALS",
            "Invalid credentials",
        ));
    }

    tracing::info!(user_id = %login_user.id, role = %login_user.role, "Login success");

    let token = state
        .auth_manager
        .issue_token(&login_user.id, login_user.role, &scopes)
        .map_err(|e| {
            tracing::error!(error = %e, "Token creation failed");
            ApiError::internal("Token creation failed")
        })?;

    let expires_in = state.auth_manager.expires_in_secs();
    let response = TokenResponse {
        access_token: token.clone(),
        token_type: "bearer",
        expires_in,
        scope: if scopes.is_empty() {
            None
        } else {
            Some(Scope::format_list(&scopes))
        },
    };

    Ok((jar.add(token_cookie(token, expires_in)), Json(response)))
}

/// Exchange a still-valid token for a fresh one
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "auth",
    responses(
        (status = 200, description = "Token refreshed", body = TokenResponse),
        (status = 401, description = "Missing, invalid, or expired token")
    )
)]
pub async fn refresh_token(
    State(state): State<AuthRoutesState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(CookieJar, Json<TokenResponse>), AuthError> {
    let token = bearer_token(&headers)
        .or_else(|| jar.get(TOKEN_COOKIE_NAME).map(|c| c.value().to_string()))
        .ok_or_else(AuthError::required)?;

    let refreshed = state.auth_manager.refresh_token(&token).map_err(|e| match e {
        TokenError::Expired => AuthError::expired(),
        _ => AuthError::invalid(),
    })?;

    // Read the scope claim back from the freshly issued token
    let scope = state
        .auth_manager
        .validate_session(&refreshed)
        .ok()
        .and_then(|claims| claims.scope);

    let expires_in = state.auth_manager.expires_in_secs();
    let response = TokenResponse {
        access_token: refreshed.clone(),
        token_type: "bearer",
        expires_in,
        scope,
    };

    Ok((jar.add(token_cookie(refreshed, expires_in)), Json(response)))
}

/// Logout - clear the token cookie
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Logged out, cookie cleared")
    )
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let cookie = Cookie::build((TOKEN_COOKIE_NAME, ""))
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/api")
        .max_age(time::Duration::seconds(0))
        .build();

    (jar.remove(cookie), StatusCode::NO_CONTENT)
}
