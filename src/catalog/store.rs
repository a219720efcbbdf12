//! Storage abstraction for the catalog.

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

use super::{Category, Product, ProductDetail, ProductPage, ProductQuery};

/// Errors raised by catalog stores
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("at most {max} featured products are allowed, got {got}")]
    TooManyFeatured { max: usize, got: usize },

    #[error("product {0} appears more than once in the featured list")]
    DuplicateFeatured(i64),

    #[error("product {0} does not exist")]
    UnknownProduct(i64),

    #[error("failed to load catalog seed: {0}")]
    Seed(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read and admin operations the REST API needs from a catalog backend
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All categories, ordered by name
    async fn categories(&self) -> Result<Vec<Category>, StoreError>;

    /// One page of a category listing. Unknown categories yield an empty page.
    async fn products_by_category(
        &self,
        category_id: i64,
        query: &ProductQuery,
    ) -> Result<ProductPage, StoreError>;

    async fn product_detail(&self, id: i64) -> Result<Option<ProductDetail>, StoreError>;

    /// Featured products in display order
    async fn featured(&self) -> Result<Vec<Product>, StoreError>;

    /// Replace the whole featured set; display order is the slice order
    async fn replace_featured(&self, ids: &[i64]) -> Result<(), StoreError>;
}

/// Check size and uniqueness of a featured list before it reaches storage
pub fn validate_featured_ids(ids: &[i64], max: usize) -> Result<(), StoreError> {
    if ids.len() > max {
        return Err(StoreError::TooManyFeatured {
            max,
            got: ids.len(),
        });
    }
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(*id) {
            return Err(StoreError::DuplicateFeatured(*id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_featured_ids_accepts_ordered_unique() {
        assert!(validate_featured_ids(&[5, 3, 9], 5).is_ok());
        assert!(validate_featured_ids(&[], 5).is_ok());
    }

    #[test]
    fn test_validate_featured_ids_rejects_too_many() {
        let err = validate_featured_ids(&[1, 2, 3, 4, 5, 6], 5).unwrap_err();
        assert!(matches!(err, StoreError::TooManyFeatured { max: 5, got: 6 }));
    }

    #[test]
    fn test_validate_featured_ids_rejects_duplicates() {
        let err = validate_featured_ids(&[5, 3, 5], 5).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateFeatured(5)));
    }
}
