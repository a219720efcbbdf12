//! Product listing and detail endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::catalog::{ProductDetail, ProductPage};
use crate::rest::dto::ProductListParams;
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::ApiState;

/// One page of products in a category
#[utoipa::path(
    get,
    path = "/api/productos/{category_id}",
    tag = "Catalog",
    params(
        ("category_id" = i64, Path, description = "Category id"),
        ProductListParams
    ),
    responses(
        (status = 200, description = "Page of products", body = ProductPage),
        (status = 400, description = "Unknown sort order", body = ErrorResponse)
    )
)]
pub async fn by_category(
    State(state): State<ApiState>,
    Path(category_id): Path<i64>,
    Query(params): Query<ProductListParams>,
) -> Result<Json<ProductPage>, ApiError> {
    let catalog = &state.config.catalog;
    let query = params
        .into_query(catalog.page_size, catalog.max_page_size)
        .map_err(ApiError::BadRequest)?;

    let page = state.store.products_by_category(category_id, &query).await?;
    Ok(Json(page))
}

/// Full product record, including its gallery
#[utoipa::path(
    get,
    path = "/api/productos/detalle/{id}",
    tag = "Catalog",
    params(
        ("id" = i64, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product details", body = ProductDetail),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn detail(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductDetail>, ApiError> {
    let product = state
        .store
        .product_detail(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product {id} not found")))?;
    Ok(Json(product))
}
