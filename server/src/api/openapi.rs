//! OpenAPI specification and Swagger UI

use axum::response::{Html, IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{auth, branches, clients, health, movements, products, stock, users};
use crate::api::types::PaginationMeta;
use crate::data::types::{Role, Scope};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bodega API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Multi-branch inventory management backend"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "auth", description = "Token issuance, refresh, and logout"),
        (name = "products", description = "Product catalog"),
        (name = "branches", description = "Branch management"),
        (name = "stock", description = "Per-branch stock ledger"),
        (name = "movements", description = "Inter-branch stock transfers"),
        (name = "users", description = "User management"),
        (name = "clients", description = "Client management")
    ),
    paths(
        health::health,
        auth::issue_token,
        auth::refresh_token,
        auth::logout,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        branches::list_branches,
        branches::get_branch,
        branches::create_branch,
        branches::update_branch,
        branches::delete_branch,
        stock::list_stock,
        stock::get_stock,
        stock::create_stock,
        stock::update_stock,
        stock::delete_stock,
        movements::create_movement,
        movements::list_movements,
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        clients::list_clients,
        clients::get_client,
        clients::create_client,
        clients::update_client,
        clients::delete_client,
    ),
    components(schemas(
        PaginationMeta,
        Role,
        Scope,
        auth::TokenRequest,
        auth::TokenResponse,
        products::types::ProductDto,
        products::types::CreateProductRequest,
        products::types::UpdateProductRequest,
        branches::BranchDto,
        branches::BranchRequest,
        stock::StockDto,
        stock::CreateStockRequest,
        stock::UpdateStockRequest,
        movements::MovementDto,
        movements::CreateMovementRequest,
        users::types::UserDto,
        users::types::CreateUserRequest,
        users::types::UpdateUserRequest,
        clients::ClientDto,
        clients::CreateClientRequest,
        clients::UpdateClientRequest,
    ))
)]
pub struct ApiDoc;

/// Serve the OpenAPI document
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Serve a minimal Swagger UI page pointing at the OpenAPI document
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Bodega API Docs</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {
      SwaggerUIBundle({ url: "/api/openapi.json", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>"##,
    )
}
