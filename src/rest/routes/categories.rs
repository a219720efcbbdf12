//! Category listing endpoint.

use axum::{extract::State, Json};

use crate::catalog::Category;
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::ApiState;

/// List all furniture categories
#[utoipa::path(
    get,
    path = "/api/categorias",
    tag = "Catalog",
    responses(
        (status = 200, description = "Categories ordered by name", body = Vec<Category>),
        (status = 500, description = "Catalog store failure", body = ErrorResponse)
    )
)]
pub async fn list(State(state): State<ApiState>) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.store.categories().await?))
}
