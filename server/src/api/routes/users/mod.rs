//! User API endpoints
//!
//! Reads are open to any authenticated caller; create/update/delete are
//! admin-only. Passwords are hashed here before they reach the data layer.

pub mod types;

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::auth::{AdminOnly, Auth};
use crate::api::extractors::{ValidatedJson, ValidatedQuery};
use crate::api::types::{ApiError, PaginatedResponse};
use crate::data::SqliteService;
use crate::data::sqlite::repositories::user::{self, UserUpdate};
use crate::utils::password;

use types::{CreateUserRequest, ListUsersQuery, UpdateUserRequest, UserDto};

/// Shared state for User API endpoints
#[derive(Clone)]
pub struct UsersApiState {
    pub database: Arc<SqliteService>,
}

/// Build User API routes
pub fn routes(database: Arc<SqliteService>) -> Router<()> {
    let state = UsersApiState { database };

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{user_id}", get(get_user).put(update_user).delete(delete_user))
        .with_state(state)
}

/// List users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "Paginated users")
    )
)]
pub async fn list_users(
    State(state): State<UsersApiState>,
    _auth: Auth,
    ValidatedQuery(query): ValidatedQuery<ListUsersQuery>,
) -> Result<Json<PaginatedResponse<UserDto>>, ApiError> {
    let (rows, total) = user::list_users(state.database.pool(), query.page, query.limit)
        .await
        .map_err(ApiError::from_sqlite)?;

    let data = rows.into_iter().map(UserDto::from).collect();
    Ok(Json(PaginatedResponse::new(
        data, query.page, query.limit, total,
    )))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    responses(
        (status = 200, description = "User", body = UserDto),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<UsersApiState>,
    _auth: Auth,
    Path(user_id): Path<String>,
) -> Result<Json<UserDto>, ApiError> {
    let row = user::get_user(state.database.pool(), &user_id)
        .await
        .map_err(ApiError::from_sqlite)?
        .ok_or_else(|| ApiError::not_found("USER_NOT_FOUND", "User not found"))?;
    Ok(Json(UserDto::from(row)))
}

/// Create a user (admin only)
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserDto),
        (status = 409, description = "Username or email already taken")
    )
)]
pub async fn create_user(
    State(state): State<UsersApiState>,
    _auth: AdminOnly,
    ValidatedJson(body): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let pool = state.database.pool();

    if user::get_by_username(pool, &body.username)
        .await
        .map_err(ApiError::from_sqlite)?
        .is_some()
    {
        return Err(ApiError::conflict("USERNAME_TAKEN", "Username already exists"));
    }
    if let Some(email) = &body.email
        && user::get_by_email(pool, email)
            .await
            .map_err(ApiError::from_sqlite)?
            .is_some()
    {
        return Err(ApiError::conflict("EMAIL_TAKEN", "Email already exists"));
    }

    let hash = password::hash(&body.password).map_err(|e| {
        tracing::error!(error = %e, "Password hashing failed");
        ApiError::internal("Failed to process credentials")
    })?;

    let row = user::create_user(
        pool,
        &body.username,
        &body.name,
        body.email.as_deref(),
        &hash,
        body.role,
    )
    .await
    .map_err(ApiError::from_sqlite)?;

    tracing::info!(user_id = %row.id, username = %row.username, "User created");
    Ok((StatusCode::CREATED, Json(UserDto::from(row))))
}

/// Update a user (admin only, partial)
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserDto),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already taken")
    )
)]
pub async fn update_user(
    State(state): State<UsersApiState>,
    _auth: AdminOnly,
    Path(user_id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserDto>, ApiError> {
    let pool = state.database.pool();

    if let Some(email) = &body.email
        && let Some(existing) = user::get_by_email(pool, email)
            .await
            .map_err(ApiError::from_sqlite)?
        && existing.id != user_id
    {
        return Err(ApiError::conflict("EMAIL_TAKEN", "Email already exists"));
    }

    let password_hash = match &body.password {
        Some(plain) => Some(password::hash(plain).map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            ApiError::internal("Failed to process credentials")
        })?),
        None => None,
    };

    let row = user::update_user(
        pool,
        &user_id,
        UserUpdate {
            name: body.name,
            email: body.email,
            password_hash,
            role: body.role,
        },
    )
    .await
    .map_err(ApiError::from_sqlite)?
    .ok_or_else(|| ApiError::not_found("USER_NOT_FOUND", "User not found"))?;

    tracing::info!(user_id = %user_id, "User updated");
    Ok(Json(UserDto::from(row)))
}

/// Delete a user (admin only; blocked while movements reference them)
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found"),
        (status = 409, description = "User referenced by movements")
    )
)]
pub async fn delete_user(
    State(state): State<UsersApiState>,
    _auth: AdminOnly,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let pool = state.database.pool();

    if user::has_movements(pool, &user_id)
        .await
        .map_err(ApiError::from_sqlite)?
    {
        return Err(ApiError::conflict(
            "USER_IN_USE",
            "Cannot delete a user referenced by movements",
        ));
    }

    let deleted = user::delete_user(pool, &user_id)
        .await
        .map_err(ApiError::from_sqlite)?;
    if !deleted {
        return Err(ApiError::not_found("USER_NOT_FOUND", "User not found"));
    }

    tracing::info!(user_id = %user_id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
