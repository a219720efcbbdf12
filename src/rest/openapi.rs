//! OpenAPI specification builder using utoipa.

use utoipa::OpenApi;

use crate::catalog::{Category, Product, ProductDetail, ProductPage, SortOrder};
use crate::rest::dto::{FeaturedRequest, FeaturedResponse, HealthResponse, StatusResponse};
use crate::rest::error::ErrorResponse;

/// OpenAPI documentation for the showroom REST API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Showroom API",
        description = "Furniture catalog: categories, paginated listings, product details and featured products.",
        license(name = "MIT")
    ),
    paths(
        crate::rest::routes::health::health,
        crate::rest::routes::health::status,
        crate::rest::routes::categories::list,
        crate::rest::routes::products::by_category,
        crate::rest::routes::products::detail,
        crate::rest::routes::featured::list,
        crate::rest::routes::featured::replace,
    ),
    components(
        schemas(
            HealthResponse,
            StatusResponse,
            Category,
            Product,
            ProductDetail,
            ProductPage,
            SortOrder,
            FeaturedRequest,
            FeaturedResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check and status endpoints"),
        (name = "Catalog", description = "Categories and product listings"),
        (name = "Featured", description = "Homepage featured products"),
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI specification as a JSON string
    pub fn json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }

    /// Generate the OpenAPI specification as a YAML string
    pub fn yaml() -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&Self::openapi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_generates() {
        let spec = ApiDoc::json().expect("Failed to generate OpenAPI spec");
        assert!(spec.contains("Showroom API"));
        assert!(spec.contains("/api/health"));
        assert!(spec.contains("/api/productos/{category_id}"));
        assert!(spec.contains("/api/productos/detalle/{id}"));
    }

    #[test]
    fn test_openapi_has_all_tags() {
        let spec = ApiDoc::json().expect("Failed to generate OpenAPI spec");
        assert!(spec.contains("\"Health\""));
        assert!(spec.contains("\"Catalog\""));
        assert!(spec.contains("\"Featured\""));
    }

    #[test]
    fn test_openapi_yaml() {
        let yaml = ApiDoc::yaml().expect("Failed to generate YAML");
        assert!(yaml.contains("openapi:"));
    }
}
