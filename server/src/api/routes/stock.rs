//! Stock API endpoints
//!
//! Reads are open to any authenticated caller; mutations are admin-only and
//! additionally gated by the stock scopes for scoped tokens. Transfers
//! between branches go through `/movements`, not here.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::auth::{AdminOnly, Auth};
use crate::api::extractors::{ValidatedJson, ValidatedQuery};
use crate::api::types::{ApiError, PaginatedResponse, default_limit, default_page};
use crate::data::SqliteService;
use crate::data::sqlite::repositories::stock::{self, StockFilter};
use crate::data::sqlite::repositories::{branch, product};
use crate::data::types::{Scope, StockRow};

#[derive(Debug, Serialize, ToSchema)]
pub struct StockDto {
    pub id: String,
    pub product_id: String,
    pub branch_id: String,
    pub quantity: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<StockRow> for StockDto {
    fn from(row: StockRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            branch_id: row.branch_id,
            quantity: row.quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStockRequest {
    #[validate(length(min = 1, message = "product_id is required"))]
    pub product_id: String,
    #[validate(length(min = 1, message = "branch_id is required"))]
    pub branch_id: String,
    #[validate(range(min = 0, message = "Quantity must be non-negative"))]
    pub quantity: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStockRequest {
    #[validate(range(min = 0, message = "Quantity must be non-negative"))]
    pub quantity: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ListStockQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, max = 100, message = "Page must be between 1 and 100"))]
    pub page: u32,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 500, message = "Limit must be between 1 and 500"))]
    pub limit: u32,
    pub branch_id: Option<String>,
    pub product_id: Option<String>,
}

/// Shared state for Stock API endpoints
#[derive(Clone)]
pub struct StockApiState {
    pub database: Arc<SqliteService>,
}

/// Build Stock API routes
pub fn routes(database: Arc<SqliteService>) -> Router<()> {
    let state = StockApiState { database };

    Router::new()
        .route("/", get(list_stock).post(create_stock))
        .route("/{stock_id}", get(get_stock).put(update_stock).delete(delete_stock))
        .with_state(state)
}

/// List stock entries with optional filters
#[utoipa::path(
    get,
    path = "/api/v1/stock",
    tag = "stock",
    responses(
        (status = 200, description = "Paginated stock entries")
    )
)]
pub async fn list_stock(
    State(state): State<StockApiState>,
    auth: Auth,
    ValidatedQuery(query): ValidatedQuery<ListStockQuery>,
) -> Result<Json<PaginatedResponse<StockDto>>, ApiError> {
    auth.ctx.require_scope(Scope::StockRead)?;

    let filter = StockFilter {
        branch_id: query.branch_id.clone(),
        product_id: query.product_id.clone(),
    };

    let (rows, total) = stock::list_stock(state.database.pool(), &filter, query.page, query.limit)
        .await
        .map_err(ApiError::from_sqlite)?;

    let data = rows.into_iter().map(StockDto::from).collect();
    Ok(Json(PaginatedResponse::new(
        data, query.page, query.limit, total,
    )))
}

/// Get a stock entry by ID
#[utoipa::path(
    get,
    path = "/api/v1/stock/{stock_id}",
    tag = "stock",
    responses(
        (status = 200, description = "Stock entry", body = StockDto),
        (status = 404, description = "Stock entry not found")
    )
)]
pub async fn get_stock(
    State(state): State<StockApiState>,
    auth: Auth,
    Path(stock_id): Path<String>,
) -> Result<Json<StockDto>, ApiError> {
    auth.ctx.require_scope(Scope::StockRead)?;

    let row = stock::get_stock(state.database.pool(), &stock_id)
        .await
        .map_err(ApiError::from_sqlite)?
        .ok_or_else(|| ApiError::not_found("STOCK_NOT_FOUND", "Stock entry not found"))?;

    Ok(Json(StockDto::from(row)))
}

/// Create a stock entry (admin only)
#[utoipa::path(
    post,
    path = "/api/v1/stock",
    tag = "stock",
    request_body = CreateStockRequest,
    responses(
        (status = 201, description = "Stock entry created", body = StockDto),
        (status = 404, description = "Product or branch not found"),
        (status = 409, description = "Entry already exists for this product and branch")
    )
)]
pub async fn create_stock(
    State(state): State<StockApiState>,
    auth: AdminOnly,
    ValidatedJson(body): ValidatedJson<CreateStockRequest>,
) -> Result<(StatusCode, Json<StockDto>), ApiError> {
    auth.ctx.require_scope(Scope::StockWrite)?;
    let pool = state.database.pool();

    if product::get_product(pool, &body.product_id)
        .await
        .map_err(ApiError::from_sqlite)?
        .is_none()
    {
        return Err(ApiError::not_found("PRODUCT_NOT_FOUND", "Product not found"));
    }
    if branch::get_branch(pool, &body.branch_id)
        .await
        .map_err(ApiError::from_sqlite)?
        .is_none()
    {
        return Err(ApiError::not_found("BRANCH_NOT_FOUND", "Branch not found"));
    }

    let row = stock::create_stock(pool, &body.product_id, &body.branch_id, body.quantity)
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                ApiError::conflict(
                    "STOCK_EXISTS",
                    "Stock entry already exists for this product and branch",
                )
            } else {
                ApiError::from_sqlite(e)
            }
        })?;

    tracing::info!(stock_id = %row.id, "Stock entry created");
    Ok((StatusCode::CREATED, Json(StockDto::from(row))))
}

/// Set the quantity of a stock entry (admin only)
#[utoipa::path(
    put,
    path = "/api/v1/stock/{stock_id}",
    tag = "stock",
    request_body = UpdateStockRequest,
    responses(
        (status = 200, description = "Stock entry updated", body = StockDto),
        (status = 404, description = "Stock entry not found")
    )
)]
pub async fn update_stock(
    State(state): State<StockApiState>,
    auth: AdminOnly,
    Path(stock_id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateStockRequest>,
) -> Result<Json<StockDto>, ApiError> {
    auth.ctx.require_scope(Scope::StockWrite)?;

    let row = stock::update_quantity(state.database.pool(), &stock_id, body.quantity)
        .await
        .map_err(ApiError::from_sqlite)?
        .ok_or_else(|| ApiError::not_found("STOCK_NOT_FOUND", "Stock entry not found"))?;

    Ok(Json(StockDto::from(row)))
}

/// Delete a stock entry (admin only)
#[utoipa::path(
    delete,
    path = "/api/v1/stock/{stock_id}",
    tag = "stock",
    responses(
        (status = 204, description = "Stock entry deleted"),
        (status = 404, description = "Stock entry not found")
    )
)]
pub async fn delete_stock(
    State(state): State<StockApiState>,
    auth: AdminOnly,
    Path(stock_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    auth.ctx.require_scope(Scope::StockWrite)?;

    let deleted = stock::delete_stock(state.database.pool(), &stock_id)
        .await
        .map_err(ApiError::from_sqlite)?;
    if !deleted {
        return Err(ApiError::not_found("STOCK_NOT_FOUND", "Stock entry not found"));
    }

    tracing::info!(stock_id = %stock_id, "Stock entry deleted");
    Ok(StatusCode::NO_CONTENT)
}
