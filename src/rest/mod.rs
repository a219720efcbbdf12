//! REST API for the furniture catalog.
//!
//! Serves categories, paginated category listings, product details and the
//! admin-curated featured set from a [`CatalogStore`](crate::catalog::CatalogStore).

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{routing::get, Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

pub mod dto;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::ApiState;

/// Build the API router with all routes
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints
        .route("/api/health", get(routes::health::health))
        .route("/api/status", get(routes::health::status))
        // Catalog endpoints
        .route("/api/categorias", get(routes::categories::list))
        .route(
            "/api/productos/detalle/:id",
            get(routes::products::detail),
        )
        .route(
            "/api/productos/:category_id",
            get(routes::products::by_category),
        )
        // Featured products
        .route(
            "/api/productos-destacados",
            get(routes::featured::list).post(routes::featured::replace),
        )
        .route("/api/openapi.json", get(openapi_json))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Start the REST API server and run until Ctrl-C
pub async fn serve(state: ApiState, bind: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr: SocketAddr = format!("{bind}:{port}")
        .parse()
        .with_context(|| format!("Invalid bind address {bind}:{port}"))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("REST API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down REST API");
        })
        .await?;

    Ok(())
}
