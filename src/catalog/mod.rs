//! Catalog domain types: categories, products, paginated queries.
//!
//! Wire names follow the public JSON API (`nombre`, `totalPaginas`, ...);
//! Rust field names are English.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod memory;
pub mod mysql;
pub mod store;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;
pub use store::{CatalogStore, StoreError};

/// Default number of products per category page
pub const DEFAULT_PAGE_SIZE: u32 = 9;

/// Upper bound for the `limit` query parameter
pub const MAX_PAGE_SIZE: u32 = 50;

/// Size of the featured set shown on the homepage
pub const MAX_FEATURED: usize = 5;

/// A furniture category (salas, comedores, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// A product as listed on category pages and the featured strip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    /// Discount percentage, if any
    #[serde(rename = "descuento", default)]
    pub discount: Option<f64>,
    #[serde(rename = "imagen_principal", default)]
    pub main_image: Option<String>,
    #[serde(rename = "disponible", default = "default_available")]
    pub available: bool,
    /// Category display name
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "categoria_id")]
    pub category_id: i64,
    #[serde(rename = "caracteristicas", default)]
    pub features: Vec<String>,
    #[serde(rename = "etiquetas", default)]
    pub tags: Vec<String>,
}

fn default_available() -> bool {
    true
}

/// Full product record returned by the detail endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    #[serde(rename = "estilo", default)]
    pub style: Option<String>,
    /// Gallery images (stored as a JSON-encoded text column)
    #[serde(rename = "imagenes", default)]
    pub images: Vec<String>,
}

impl ProductDetail {
    pub fn id(&self) -> i64 {
        self.product.id
    }
}

/// Decode the `imagenes` text column. Malformed JSON yields no images.
pub fn decode_images(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(images) => images,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed imagenes column");
            Vec::new()
        }
    }
}

/// Sort order for category listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum SortOrder {
    /// Newest products first
    #[default]
    #[serde(rename = "recientes")]
    Newest,
    #[serde(rename = "nombre")]
    NameAsc,
    #[serde(rename = "nombre_desc")]
    NameDesc,
    /// Largest discount first
    #[serde(rename = "descuento")]
    Discount,
}

impl SortOrder {
    pub fn all() -> &'static [SortOrder] {
        &[
            SortOrder::Newest,
            SortOrder::NameAsc,
            SortOrder::NameDesc,
            SortOrder::Discount,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "recientes",
            SortOrder::NameAsc => "nombre",
            SortOrder::NameDesc => "nombre_desc",
            SortOrder::Discount => "descuento",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Newest => "Newest",
            SortOrder::NameAsc => "Name A-Z",
            SortOrder::NameDesc => "Name Z-A",
            SortOrder::Discount => "Best discount",
        }
    }

    /// Next order in the cycle used by the browser's sort key
    pub fn next(self) -> Self {
        match self {
            SortOrder::Newest => SortOrder::NameAsc,
            SortOrder::NameAsc => SortOrder::NameDesc,
            SortOrder::NameDesc => SortOrder::Discount,
            SortOrder::Discount => SortOrder::Newest,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::all()
            .iter()
            .copied()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| format!("unknown sort order '{s}'"))
    }
}

/// Filters and paging for a category listing
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    /// 1-indexed page number
    pub page: u32,
    pub limit: u32,
    pub style: Option<String>,
    pub sort: SortOrder,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            style: None,
            sort: SortOrder::Newest,
        }
    }
}

impl ProductQuery {
    /// Clamp page to >= 1 and limit into 1..=max_limit; blank styles are dropped
    pub fn normalized(mut self, max_limit: u32) -> Self {
        self.page = self.page.max(1);
        self.limit = self.limit.clamp(1, max_limit.max(1));
        self.style = self
            .style
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }

    /// Number of rows skipped before this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// Whether a product style matches the style filter
    pub fn matches_style(&self, style: Option<&str>) -> bool {
        match &self.style {
            None => true,
            Some(wanted) => style.is_some_and(|s| s.eq_ignore_ascii_case(wanted)),
        }
    }
}

/// One page of a category listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductPage {
    #[serde(rename = "productos")]
    pub products: Vec<Product>,
    #[serde(rename = "totalPaginas")]
    pub total_pages: u32,
    #[serde(rename = "paginaActual")]
    pub current_page: u32,
    #[serde(rename = "totalProductos", default)]
    pub total_products: u64,
}

impl ProductPage {
    pub fn empty(page: u32) -> Self {
        Self {
            products: Vec::new(),
            total_pages: 0,
            current_page: page,
            total_products: 0,
        }
    }
}

/// `ceil(total / limit)`, zero when there are no products
pub fn total_pages(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(u64::from(limit)) as u32
}
