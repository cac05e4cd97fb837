//! Client (customer) API endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
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
use crate::data::sqlite::repositories::client::{self, ClientUpdate};
use crate::data::types::ClientRow;

#[derive(Debug, Serialize, ToSchema)]
pub struct ClientDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<ClientRow> for ClientDto {
    fn from(row: ClientRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClientRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(
        email(message = "Invalid email address"),
        length(max = 120, message = "Email must be at most 120 characters")
    )]
    pub email: String,
    #[validate(length(min = 1, max = 20, message = "Phone must be 1-20 characters"))]
    pub phone: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateClientRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(
        email(message = "Invalid email address"),
        length(max = 120, message = "Email must be at most 120 characters")
    )]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 20, message = "Phone must be 1-20 characters"))]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ListClientsQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, max = 100, message = "Page must be between 1 and 100"))]
    pub page: u32,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 500, message = "Limit must be between 1 and 500"))]
    pub limit: u32,
}

/// Shared state for Client API endpoints
#[derive(Clone)]
pub struct ClientsApiState {
    pub database: Arc<SqliteService>,
}

/// Build Client API routes
pub fn routes(database: Arc<SqliteService>) -> Router<()> {
    let state = ClientsApiState { database };

    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route("/{client_id}", get(get_client).put(update_client).delete(delete_client))
        .with_state(state)
}

/// List clients
#[utoipa::path(
    get,
    path = "/api/v1/clients",
    tag = "clients",
    responses(
        (status = 200, description = "Paginated clients")
    )
)]
pub async fn list_clients(
    State(state): State<ClientsApiState>,
    _auth: Auth,
    ValidatedQuery(query): ValidatedQuery<ListClientsQuery>,
) -> Result<Json<PaginatedResponse<ClientDto>>, ApiError> {
    let (rows, total) = client::list_clients(state.database.pool(), query.page, query.limit)
        .await
        .map_err(ApiError::from_sqlite)?;

    let data = rows.into_iter().map(ClientDto::from).collect();
    Ok(Json(PaginatedResponse::new(
        data, query.page, query.limit, total,
    )))
}

/// Get a client by ID
#[utoipa::path(
    get,
    path = "/api/v1/clients/{client_id}",
    tag = "clients",
    responses(
        (status = 200, description = "Client", body = ClientDto),
        (status = 404, description = "Client not found")
    )
)]
pub async fn get_client(
    State(state): State<ClientsApiState>,
    _auth: Auth,
    Path(client_id): Path<String>,
) -> Result<Json<ClientDto>, ApiError> {
    let row = client::get_client(state.database.pool(), &client_id)
        .await
        .map_err(ApiError::from_sqlite)?
        .ok_or_else(|| ApiError::not_found("CLIENT_NOT_FOUND", "Client not found"))?;
    Ok(Json(ClientDto::from(row)))
}

/// Create a client
#[utoipa::path(
    post,
    path = "/api/v1/clients",
    tag = "clients",
    request_body = CreateClientRequest,
    responses(
        (status = 201, description = "Client created", body = ClientDto),
        (status = 409, description = "Email already taken")
    )
)]
pub async fn create_client(
    State(state): State<ClientsApiState>,
    _auth: Auth,
    ValidatedJson(body): ValidatedJson<CreateClientRequest>,
) -> Result<(StatusCode, Json<ClientDto>), ApiError> {
    let pool = state.database.pool();

    if client::get_by_email(pool, &body.email)
        .await
        .map_err(ApiError::from_sqlite)?
        .is_some()
    {
        return Err(ApiError::conflict("EMAIL_TAKEN", "Client email already exists"));
    }

    let row = client::create_client(pool, &body.name, &body.email, &body.phone)
        .await
        .map_err(ApiError::from_sqlite)?;

    tracing::info!(client_id = %row.id, email = %row.email, "Client created");
    Ok((StatusCode::CREATED, Json(ClientDto::from(row))))
}

/// Update a client (partial)
#[utoipa::path(
    put,
    path = "/api/v1/clients/{client_id}",
    tag = "clients",
    request_body = UpdateClientRequest,
    responses(
        (status = 200, description = "Client updated", body = ClientDto),
        (status = 404, description = "Client not found"),
        (status = 409, description = "Email already taken")
    )
)]
pub async fn update_client(
    State(state): State<ClientsApiState>,
    _auth: Auth,
    Path(client_id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateClientRequest>,
) -> Result<Json<ClientDto>, ApiError> {
    let pool = state.database.pool();

    if let Some(email) = &body.email
        && let Some(existing) = client::get_by_email(pool, email)
            .await
            .map_err(ApiError::from_sqlite)?
        && existing.id != client_id
    {
        return Err(ApiError::conflict("EMAIL_TAKEN", "Client email already exists"));
    }

    let row = client::update_client(
        pool,
        &client_id,
        ClientUpdate {
            name: body.name,
            email: body.email,
            phone: body.phone,
        },
    )
    .await
    .map_err(ApiError::from_sqlite)?
    .ok_or_else(|| ApiError::not_found("CLIENT_NOT_FOUND", "Client not found"))?;

    tracing::info!(client_id = %client_id, "Client updated");
    Ok(Json(ClientDto::from(row)))
}

/// Delete a client
#[utoipa::path(
    delete,
    path = "/api/v1/clients/{client_id}",
    tag = "clients",
    responses(
        (status = 204, description = "Client deleted"),
        (status = 404, description = "Client not found")
    )
)]
pub async fn delete_client(
    State(state): State<ClientsApiState>,
    _auth: Auth,
    Path(client_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let deleted = client::delete_client(state.database.pool(), &client_id)
        .await
        .map_err(ApiError::from_sqlite)?;
    if !deleted {
        return Err(ApiError::not_found("CLIENT_NOT_FOUND", "Client not found"));
    }

    tracing::info!(client_id = %client_id, "Client deleted");
    Ok(StatusCode::NO_CONTENT)
}
