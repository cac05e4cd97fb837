//! Branch API endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::auth::{AdminOnly, Auth};
use crate::api::extractors::ValidatedJson;
use crate::api::types::ApiError;
use crate::data::SqliteService;
use crate::data::sqlite::repositories::branch;
use crate::data::types::BranchRow;

#[derive(Debug, Serialize, ToSchema)]
pub struct BranchDto {
    pub id: String,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<BranchRow> for BranchDto {
    fn from(row: BranchRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BranchRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Shared state for Branch API endpoints
#[derive(Clone)]
pub struct BranchesApiState {
    pub database: Arc<SqliteService>,
}

/// Build Branch API routes
pub fn routes(database: Arc<SqliteService>) -> Router<()> {
    let state = BranchesApiState { database };

    Router::new()
        .route("/", get(list_branches).post(create_branch))
        .route(
            "/{branch_id}",
            get(get_branch).put(update_branch).delete(delete_branch),
        )
        .with_state(state)
}

/// List all branches
#[utoipa::path(
    get,
    path = "/api/v1/branches",
    tag = "branches",
    responses(
        (status = 200, description = "All branches")
    )
)]
pub async fn list_branches(
    State(state): State<BranchesApiState>,
    _auth: Auth,
) -> Result<Json<Vec<BranchDto>>, ApiError> {
    let rows = branch::list_branches(state.database.pool())
        .await
        .map_err(ApiError::from_sqlite)?;
    Ok(Json(rows.into_iter().map(BranchDto::from).collect()))
}

/// Get a branch by ID
#[utoipa::path(
    get,
    path = "/api/v1/branches/{branch_id}",
    tag = "branches",
    responses(
        (status = 200, description = "Branch", body = BranchDto),
        (status = 404, description = "Branch not found")
    )
)]
pub async fn get_branch(
    State(state): State<BranchesApiState>,
    _auth: Auth,
    Path(branch_id): Path<String>,
) -> Result<Json<BranchDto>, ApiError> {
    let row = branch::get_branch(state.database.pool(), &branch_id)
        .await
        .map_err(ApiError::from_sqlite)?
        .ok_or_else(|| ApiError::not_found("BRANCH_NOT_FOUND", "Branch not found"))?;
    Ok(Json(BranchDto::from(row)))
}

/// Create a branch (admin only)
#[utoipa::path(
    post,
    path = "/api/v1/branches",
    tag = "branches",
    request_body = BranchRequest,
    responses(
        (status = 201, description = "Branch created", body = BranchDto),
        (status = 409, description = "Name already taken")
    )
)]
pub async fn create_branch(
    State(state): State<BranchesApiState>,
    _auth: AdminOnly,
    ValidatedJson(body): ValidatedJson<BranchRequest>,
) -> Result<(StatusCode, Json<BranchDto>), ApiError> {
    let pool = state.database.pool();

    if branch::get_by_name(pool, &body.name)
        .await
        .map_err(ApiError::from_sqlite)?
        .is_some()
    {
        return Err(ApiError::conflict("NAME_TAKEN", "Branch name already exists"));
    }

    let row = branch::create_branch(pool, &body.name)
        .await
        .map_err(ApiError::from_sqlite)?;

    tracing::info!(branch_id = %row.id, name = %row.name, "Branch created");
    Ok((StatusCode::CREATED, Json(BranchDto::from(row))))
}

/// Rename a branch (admin only)
#[utoipa::path(
    put,
    path = "/api/v1/branches/{branch_id}",
    tag = "branches",
    request_body = BranchRequest,
    responses(
        (status = 200, description = "Branch updated", body = BranchDto),
        (status = 404, description = "Branch not found"),
        (status = 409, description = "Name already taken")
    )
)]
pub async fn update_branch(
    State(state): State<BranchesApiState>,
    _auth: AdminOnly,
    Path(branch_id): Path<String>,
    ValidatedJson(body): ValidatedJson<BranchRequest>,
) -> Result<Json<BranchDto>, ApiError> {
    let pool = state.database.pool();

    if let Some(existing) = branch::get_by_name(pool, &body.name)
        .await
        .map_err(ApiError::from_sqlite)?
        && existing.id != branch_id
    {
        return Err(ApiError::conflict("NAME_TAKEN", "Branch name already exists"));
    }

    let row = branch::update_branch(pool, &branch_id, &body.name)
        .await
        .map_err(ApiError::from_sqlite)?
        .ok_or_else(|| ApiError::not_found("BRANCH_NOT_FOUND", "Branch not found"))?;

    Ok(Json(BranchDto::from(row)))
}

/// Delete a branch (admin only; blocked while stock or movements reference it)
#[utoipa::path(
    delete,
    path = "/api/v1/branches/{branch_id}",
    tag = "branches",
    responses(
        (status = 204, description = "Branch deleted"),
        (status = 404, description = "Branch not found"),
        (status = 409, description = "Branch still referenced")
    )
)]
pub async fn delete_branch(
    State(state): State<BranchesApiState>,
    _auth: AdminOnly,
    Path(branch_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let pool = state.database.pool();

    if branch::is_referenced(pool, &branch_id)
        .await
        .map_err(ApiError::from_sqlite)?
    {
        return Err(ApiError::conflict(
            "BRANCH_IN_USE",
            "Cannot delete a branch with associated stock or movements",
        ));
    }

    let deleted = branch::delete_branch(pool, &branch_id)
        .await
        .map_err(ApiError::from_sqlite)?;
    if !deleted {
        return Err(ApiError::not_found("BRANCH_NOT_FOUND", "Branch not found"));
    }

    tracing::info!(branch_id = %branch_id, "Branch deleted");
    Ok(StatusCode::NO_CONTENT)
}
