//! Movement API endpoints
//!
//! The create path is the stock-transfer engine; the acting user always
//! comes from the authenticated context, never from the request body.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::auth::Auth;
use crate::api::extractors::{ValidatedJson, ValidatedQuery};
use crate::api::types::{ApiError, PaginatedResponse, default_limit, default_page};
use crate::data::SqliteService;
use crate::data::types::{MovementRow, Scope};
use crate::domain::movements::{self, NewMovement};

#[derive(Debug, Serialize, ToSchema)]
pub struct MovementDto {
    pub id: String,
    pub product_id: String,
    pub quantity: i64,
    pub origin_branch_id: String,
    pub destination_branch_id: String,
    pub user_id: String,
    pub notes: Option<String>,
    pub created_at: i64,
}

impl From<MovementRow> for MovementDto {
    fn from(row: MovementRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            quantity: row.quantity,
            origin_branch_id: row.origin_branch_id,
            destination_branch_id: row.destination_branch_id,
            user_id: row.user_id,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMovementRequest {
    #[validate(length(min = 1, message = "product_id is required"))]
    pub product_id: String,
    /// Units to transfer; must be positive and covered by origin stock
    pub quantity: i64,
    #[validate(length(min = 1, message = "origin_branch_id is required"))]
    pub origin_branch_id: String,
    #[validate(length(min = 1, message = "destination_branch_id is required"))]
    pub destination_branch_id: String,
    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ListMovementsQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, max = 100, message = "Page must be between 1 and 100"))]
    pub page: u32,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 500, message = "Limit must be between 1 and 500"))]
    pub limit: u32,
}

/// Shared state for Movement API endpoints
#[derive(Clone)]
pub struct MovementsApiState {
    pub database: Arc<SqliteService>,
}

/// Build Movement API routes
pub fn routes(database: Arc<SqliteService>) -> Router<()> {
    let state = MovementsApiState { database };

    Router::new()
        .route("/", get(list_movements).post(create_movement))
        .with_state(state)
}

/// Transfer stock between branches
#[utoipa::path(
    post,
    path = "/api/v1/movements",
    tag = "movements",
    request_body = CreateMovementRequest,
    responses(
        (status = 201, description = "Movement created", body = MovementDto),
        (status = 400, description = "Invalid quantity or identical branches"),
        (status = 404, description = "Referenced product, branch, or user not found"),
        (status = 409, description = "Insufficient stock at origin")
    )
)]
pub async fn create_movement(
    State(state): State<MovementsApiState>,
    auth: Auth,
    ValidatedJson(body): ValidatedJson<CreateMovementRequest>,
) -> Result<(StatusCode, Json<MovementDto>), ApiError> {
    auth.ctx.require_scope(Scope::MovementsWrite)?;

    tracing::info!(
        product_id = %body.product_id,
        user_id = %auth.user_id(),
        "Creating movement"
    );

    let row = movements::create_movement(
        state.database.pool(),
        NewMovement {
            product_id: body.product_id,
            quantity: body.quantity,
            origin_branch_id: body.origin_branch_id,
            destination_branch_id: body.destination_branch_id,
            user_id: auth.user_id().to_string(),
            notes: body.notes,
        },
    )
    .await
    .map_err(ApiError::from_movement)?;

    Ok((StatusCode::CREATED, Json(MovementDto::from(row))))
}

/// List movements, newest first
#[utoipa::path(
    get,
    path = "/api/v1/movements",
    tag = "movements",
    responses(
        (status = 200, description = "Paginated movements, newest first")
    )
)]
pub async fn list_movements(
    State(state): State<MovementsApiState>,
    auth: Auth,
    ValidatedQuery(query): ValidatedQuery<ListMovementsQuery>,
) -> Result<Json<PaginatedResponse<MovementDto>>, ApiError> {
    auth.ctx.require_scope(Scope::MovementsRead)?;

    let (rows, total) =
        movements::list_movements(state.database.pool(), query.page, query.limit)
            .await
            .map_err(ApiError::from_sqlite)?;

    let data = rows.into_iter().map(MovementDto::from).collect();
    Ok(Json(PaginatedResponse::new(
        data, query.page, query.limit, total,
    )))
}
