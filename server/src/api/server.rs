//! API server initialization

use std::net::SocketAddr;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::auth::{AuthState, require_auth};
use super::middleware::{self, AllowedOrigins};
use super::openapi::{openapi_json, swagger_ui_html};
use super::routes::{auth, branches, clients, health, movements, products, stock, users};
use crate::core::CoreApp;
use crate::core::constants::{AUTH_BODY_LIMIT, DEFAULT_BODY_LIMIT};

pub struct ApiServer {
    app: CoreApp,
    allowed_origins: AllowedOrigins,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        let allowed_origins = AllowedOrigins::new(&app.config.server.host, app.config.server.port);

        Self {
            app,
            allowed_origins,
        }
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self {
            app,
            allowed_origins,
        } = self;

        // Clone shutdown before moving app
        let shutdown = app.shutdown.clone();

        let host = app.config.server.host.clone();
        let port = app.config.server.port;
        let addr = SocketAddr::new(host.parse()?, port);

        let auth_state = AuthState {
            auth_manager: app.auth.clone(),
        };

        // Auth routes stand alone: no token required to obtain one
        let auth_routes = auth::routes(app.auth.clone(), app.database.clone())
            .layer(DefaultBodyLimit::max(AUTH_BODY_LIMIT));

        // Everything else sits behind the auth middleware; role and scope
        // enforcement happens per-handler.
        let protected = Router::new()
            .nest("/api/v1/products", products::routes(app.database.clone()))
            .nest("/api/v1/branches", branches::routes(app.database.clone()))
            .nest("/api/v1/stock", stock::routes(app.database.clone()))
            .nest("/api/v1/movements", movements::routes(app.database.clone()))
            .nest("/api/v1/users", users::routes(app.database.clone()))
            .nest("/api/v1/clients", clients::routes(app.database.clone()))
            .layer(axum::middleware::from_fn_with_state(
                auth_state,
                require_auth,
            ));

        let router = Router::new()
            .route("/api/v1/health", get(health::health))
            .route("/api/openapi.json", get(openapi_json))
            .route("/api/docs", get(swagger_ui_html))
            .nest("/api/v1/auth", auth_routes)
            .merge(protected)
            .fallback(middleware::handle_404)
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(middleware::cors(&allowed_origins))
            .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT));

        tracing::debug!(%addr, "API server listening");

        let listener = TcpListener::bind(addr).await?;
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait())
        .await?;

        Ok(app)
    }
}
