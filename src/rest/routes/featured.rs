//! Featured products shown on the homepage.

use axum::{extract::State, Json};

use crate::catalog::Product;
use crate::rest::dto::{FeaturedRequest, FeaturedResponse};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::ApiState;

/// Featured products in display order
#[utoipa::path(
    get,
    path = "/api/productos-destacados",
    tag = "Featured",
    responses(
        (status = 200, description = "Featured products", body = Vec<Product>)
    )
)]
pub async fn list(State(state): State<ApiState>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.store.featured().await?))
}

/// Replace the whole featured set
#[utoipa::path(
    post,
    path = "/api/productos-destacados",
    tag = "Featured",
    request_body = FeaturedRequest,
    responses(
        (status = 200, description = "Featured set replaced", body = FeaturedResponse),
        (status = 400, description = "Too many or duplicate ids", body = ErrorResponse),
        (status = 404, description = "Unknown product id", body = ErrorResponse)
    )
)]
pub async fn replace(
    State(state): State<ApiState>,
    Json(request): Json<FeaturedRequest>,
) -> Result<Json<FeaturedResponse>, ApiError> {
    state.store.replace_featured(&request.products).await?;

    let stored = state
        .store
        .featured()
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();
    Ok(Json(FeaturedResponse { products: stored }))
}
