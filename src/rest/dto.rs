//! Data Transfer Objects for the REST API.
//!
//! Catalog records (`Category`, `Product`, `ProductPage`, ...) are serialized
//! directly; this module holds the request/response shapes that exist only
//! on the wire.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::catalog::{ProductQuery, SortOrder};

// =============================================================================
// Health DTOs
// =============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub category_count: usize,
    pub featured_count: usize,
}

// =============================================================================
// Product listing DTOs
// =============================================================================

/// Query string of the category listing endpoint
#[derive(Debug, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductListParams {
    /// 1-indexed page (values below 1 are treated as 1)
    #[serde(default)]
    pub page: Option<u32>,
    /// Products per page (clamped to the configured maximum)
    #[serde(default)]
    pub limit: Option<u32>,
    /// Only products of this style (case-insensitive)
    #[serde(default)]
    pub style: Option<String>,
    /// recientes | nombre | nombre_desc | descuento
    #[serde(default)]
    pub sort: Option<String>,
}

impl ProductListParams {
    /// Build a normalized query; fails only on an unknown sort value
    pub fn into_query(self, default_limit: u32, max_limit: u32) -> Result<ProductQuery, String> {
        let sort = match self.sort.as_deref().map(str::trim) {
            None | Some("") => SortOrder::default(),
            Some(s) => s.parse()?,
        };
        Ok(ProductQuery {
            page: self.page.unwrap_or(1),
            limit: self.limit.unwrap_or(default_limit),
            style: self.style,
            sort,
        }
        .normalized(max_limit))
    }
}

// =============================================================================
// Featured products DTOs
// =============================================================================

/// Replacement featured set, in display order
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeaturedRequest {
    #[serde(rename = "productos")]
    pub products: Vec<i64>,
}

/// Featured ids as stored
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeaturedResponse {
    #[serde(rename = "productos")]
    pub products: Vec<i64>,
}
