//! Product API endpoints

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
use crate::data::sqlite::repositories::product::{self, ProductFilter, ProductUpdate};
use crate::data::sqlite::repositories::stock;

use types::{CreateProductRequest, ListProductsQuery, ProductDto, UpdateProductRequest};

/// Shared state for Product API endpoints
#[derive(Clone)]
pub struct ProductsApiState {
    pub database: Arc<SqliteService>,
}

/// Build Product API routes
pub fn routes(database: Arc<SqliteService>) -> Router<()> {
    let state = ProductsApiState { database };

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{product_id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(state)
}

/// List products with optional filters
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "products",
    responses(
        (status = 200, description = "Paginated products")
    )
)]
pub async fn list_products(
    State(state): State<ProductsApiState>,
    _auth: Auth,
    ValidatedQuery(query): ValidatedQuery<ListProductsQuery>,
) -> Result<Json<PaginatedResponse<ProductDto>>, ApiError> {
    let filter = ProductFilter {
        name: query.name.clone(),
        region: query.region.clone(),
        vintage: query.vintage,
    };

    let (rows, total) =
        product::list_products(state.database.pool(), &filter, query.page, query.limit)
            .await
            .map_err(ApiError::from_sqlite)?;

    let data = rows.into_iter().map(ProductDto::from).collect();
    Ok(Json(PaginatedResponse::new(
        data, query.page, query.limit, total,
    )))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/api/v1/products/{product_id}",
    tag = "products",
    responses(
        (status = 200, description = "Product", body = ProductDto),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<ProductsApiState>,
    _auth: Auth,
    Path(product_id): Path<String>,
) -> Result<Json<ProductDto>, ApiError> {
    let row = product::get_product(state.database.pool(), &product_id)
        .await
        .map_err(ApiError::from_sqlite)?
        .ok_or_else(|| ApiError::not_found("PRODUCT_NOT_FOUND", "Product not found"))?;

    Ok(Json(ProductDto::from(row)))
}

/// Create a product (admin only)
#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductDto),
        (status = 409, description = "Name already taken")
    )
)]
pub async fn create_product(
    State(state): State<ProductsApiState>,
    _auth: AdminOnly,
    ValidatedJson(body): ValidatedJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductDto>), ApiError> {
    let pool = state.database.pool();

    if product::get_by_name(pool, &body.name)
        .await
        .map_err(ApiError::from_sqlite)?
        .is_some()
    {
        return Err(ApiError::conflict("NAME_TAKEN", "Product name already exists"));
    }

    let row = product::create_product(
        pool,
        &body.name,
        body.vintage,
        body.region.as_deref(),
        body.grape_variety.as_deref(),
    )
    .await
    .map_err(ApiError::from_sqlite)?;

    tracing::info!(product_id = %row.id, name = %row.name, "Product created");
    Ok((StatusCode::CREATED, Json(ProductDto::from(row))))
}

/// Update a product (admin only, partial)
#[utoipa::path(
    put,
    path = "/api/v1/products/{product_id}",
    tag = "products",
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductDto),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Name already taken")
    )
)]
pub async fn update_product(
    State(state): State<ProductsApiState>,
    _auth: AdminOnly,
    Path(product_id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateProductRequest>,
) -> Result<Json<ProductDto>, ApiError> {
    let pool = state.database.pool();

    if let Some(name) = &body.name
        && let Some(existing) = product::get_by_name(pool, name)
            .await
            .map_err(ApiError::from_sqlite)?
        && existing.id != product_id
    {
        return Err(ApiError::conflict("NAME_TAKEN", "Product name already exists"));
    }

    let row = product::update_product(
        pool,
        &product_id,
        ProductUpdate {
            name: body.name,
            vintage: body.vintage,
            region: body.region,
            grape_variety: body.grape_variety,
        },
    )
    .await
    .map_err(ApiError::from_sqlite)?
    .ok_or_else(|| ApiError::not_found("PRODUCT_NOT_FOUND", "Product not found"))?;

    Ok(Json(ProductDto::from(row)))
}

/// Delete a product (admin only; blocked while stock references it)
#[utoipa::path(
    delete,
    path = "/api/v1/products/{product_id}",
    tag = "products",
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Product still has stock")
    )
)]
pub async fn delete_product(
    State(state): State<ProductsApiState>,
    _auth: AdminOnly,
    Path(product_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let pool = state.database.pool();

    if stock::any_for_product(pool, &product_id)
        .await
        .map_err(ApiError::from_sqlite)?
    {
        return Err(ApiError::conflict(
            "PRODUCT_IN_USE",
            "Cannot delete a product with associated stock",
        ));
    }

    let deleted = product::delete_product(pool, &product_id)
        .await
        .map_err(ApiError::from_sqlite)?;
    if !deleted {
        return Err(ApiError::not_found("PRODUCT_NOT_FOUND", "Product not found"));
    }

    tracing::info!(product_id = %product_id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
