//! In-memory catalog store, seeded from a JSON file.
//!
//! Used when no database URL is configured, and by the test suite.

use std::cmp::Ordering;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::store::{validate_featured_ids, CatalogStore, StoreError};
use super::{
    total_pages, Category, Product, ProductDetail, ProductPage, ProductQuery, SortOrder,
    MAX_FEATURED,
};

/// On-disk seed format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSeed {
    #[serde(rename = "categorias", default)]
    pub categories: Vec<Category>,
    #[serde(rename = "productos", default)]
    pub products: Vec<ProductDetail>,
    #[serde(rename = "destacados", default)]
    pub featured: Vec<i64>,
}

pub struct MemoryStore {
    inner: RwLock<CatalogSeed>,
    max_featured: usize,
}

impl MemoryStore {
    pub fn new(seed: CatalogSeed) -> Self {
        Self {
            inner: RwLock::new(seed),
            max_featured: MAX_FEATURED,
        }
    }

    pub fn empty() -> Self {
        Self::new(CatalogSeed::default())
    }

    pub fn with_max_featured(mut self, max_featured: usize) -> Self {
        self.max_featured = max_featured;
        self
    }

    /// Load a store from a seed JSON file
    pub fn from_seed_file(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Seed(format!("{}: {e}", path.display())))?;
        let seed: CatalogSeed = serde_json::from_str(&content)
            .map_err(|e| StoreError::Seed(format!("{}: {e}", path.display())))?;
        tracing::info!(
            categories = seed.categories.len(),
            products = seed.products.len(),
            "Loaded catalog seed from {}",
            path.display()
        );
        Ok(Self::new(seed))
    }
}

fn compare_products(order: SortOrder, a: &Product, b: &Product) -> Ordering {
    match order {
        SortOrder::Newest => b.id.cmp(&a.id),
        SortOrder::NameAsc => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortOrder::NameDesc => b.name.to_lowercase().cmp(&a.name.to_lowercase()),
        SortOrder::Discount => {
            let da = a.discount.unwrap_or(f64::NEG_INFINITY);
            let db = b.discount.unwrap_or(f64::NEG_INFINITY);
            db.partial_cmp(&da)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.id.cmp(&a.id))
        }
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        let inner = self.inner.read().await;
        let mut categories = inner.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn products_by_category(
        &self,
        category_id: i64,
        query: &ProductQuery,
    ) -> Result<ProductPage, StoreError> {
        let inner = self.inner.read().await;
        let mut matching: Vec<&Product> = inner
            .products
            .iter()
            .filter(|d| d.product.category_id == category_id)
            .filter(|d| query.matches_style(d.style.as_deref()))
            .map(|d| &d.product)
            .collect();

        matching.sort_by(|a, b| compare_products(query.sort, a, b));

        let total = matching.len() as u64;
        let products = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .cloned()
            .collect();

        Ok(ProductPage {
            products,
            total_pages: total_pages(total, query.limit),
            current_page: query.page,
            total_products: total,
        })
    }

    async fn product_detail(&self, id: i64) -> Result<Option<ProductDetail>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.products.iter().find(|d| d.id() == id).cloned())
    }

    async fn featured(&self) -> Result<Vec<Product>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .featured
            .iter()
            .filter_map(|id| inner.products.iter().find(|d| d.id() == *id))
            .take(self.max_featured)
            .map(|d| d.product.clone())
            .collect())
    }

    async fn replace_featured(&self, ids: &[i64]) -> Result<(), StoreError> {
        validate_featured_ids(ids, self.max_featured)?;

        let mut inner = self.inner.write().await;
        if let Some(missing) = ids
            .iter()
            .find(|id| !inner.products.iter().any(|d| d.id() == **id))
        {
            return Err(StoreError::UnknownProduct(*missing));
        }
        inner.featured = ids.to_vec();
        tracing::info!(featured = ?ids, "Replaced featured products");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn product(id: i64, name: &str, category_id: i64, style: &str) -> ProductDetail {
        ProductDetail {
            product: Product {
                id,
                name: name.to_string(),
                description: format!("{name} description"),
                discount: None,
                main_image: Some(format!("/img/{id}.jpg")),
                available: true,
                category: if category_id == 1 { "Salas" } else { "Comedores" }.to_string(),
                category_id,
                features: vec!["madera".to_string()],
                tags: vec![],
            },
            style: Some(style.to_string()),
            images: vec![format!("/img/{id}-a.jpg")],
        }
    }

    /// 20 living-room products (ids 1..=20) and 3 dining-room products (21..=23)
    pub fn seed() -> CatalogSeed {
        let mut products: Vec<ProductDetail> = (1..=20)
            .map(|id| {
                let style = if id % 2 == 0 { "moderno" } else { "rustico" };
                product(id, &format!("Sala {id:02}"), 1, style)
            })
            .collect();
        products.extend((21..=23).map(|id| product(id, &format!("Comedor {id}"), 2, "moderno")));

        CatalogSeed {
            categories: vec![
                Category {
                    id: 2,
                    name: "Comedores".to_string(),
                },
                Category {
                    id: 1,
                    name: "Salas".to_string(),
                },
            ],
            products,
            featured: vec![],
        }
    }
}
