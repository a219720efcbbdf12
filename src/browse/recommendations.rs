//! Related-product recommendations for the detail view.
//!
//! Loaded lazily once a detail is on screen. Failed fetches are retried on a
//! constant delay up to a fixed attempt count; after that the panel stays hidden.

use std::future::Future;
use std::time::Duration;

use backon::{ConstantBuilder, Retryable};
use tracing::warn;

use crate::catalog::{Product, ProductQuery, SortOrder};
use crate::client::{CatalogClient, ClientError};
use crate::config::RecommendationsConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: usize,
    pub delay: Duration,
    /// Maximum number of related products to show
    pub limit: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(1000),
            limit: 4,
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &RecommendationsConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            delay: Duration::from_millis(config.delay_ms),
            limit: config.limit,
        }
    }

    fn backoff(&self) -> ConstantBuilder {
        ConstantBuilder::default()
            .with_delay(self.delay)
            .with_max_times(self.max_attempts.saturating_sub(1))
    }
}

/// Run `op` under the policy, retrying transient client errors
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, op: F) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    op.retry(policy.backoff())
        .when(ClientError::is_transient)
        .notify(|err, dur| {
            warn!("Retrying recommendations after {:?}: {}", dur, err);
        })
        .await
}

/// Products from the same category, excluding the one on screen
pub fn related_products(current_id: i64, candidates: Vec<Product>, limit: usize) -> Vec<Product> {
    candidates
        .into_iter()
        .filter(|p| p.id != current_id)
        .take(limit)
        .collect()
}

pub async fn load_recommendations(
    client: &CatalogClient,
    product: &Product,
    policy: &RetryPolicy,
) -> Result<Vec<Product>, ClientError> {
    // One extra slot in case the current product is among the results
    let query = ProductQuery {
        page: 1,
        limit: (policy.limit + 1) as u32,
        style: None,
        sort: SortOrder::Newest,
    };
    let category_id = product.category_id;
    let query = &query;
    let page = with_retry(policy, move || client.products(category_id, query)).await?;
    Ok(related_products(product.id, page.products, policy.limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_millis(1),
            limit: 4,
        }
    }

    fn product(id: i64) -> Product {
        Product {
            id,
            name: format!("P{id}"),
            description: String::new(),
            discount: None,
            main_image: None,
            available: true,
            category: "Salas".to_string(),
            category_id: 1,
            features: vec![],
            tags: vec![],
        }
    }

    #[tokio::test]
    async fn test_attempts_are_capped() {
        let counter = AtomicUsize::new(0);
        let attempts = &counter;
        let result: Result<(), ClientError> = with_retry(&fast_policy(), || async move {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(ClientError::Network("connection refused".to_string()))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failure() {
        let counter = AtomicUsize::new(0);
        let attempts = &counter;
        let result = with_retry(&fast_policy(), || async move {
            if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(ClientError::Http {
                    status: 502,
                    message: "bad gateway".to_string(),
                })
            } else {
                Ok(7)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let counter = AtomicUsize::new(0);
        let attempts = &counter;
        let result: Result<(), ClientError> = with_retry(&fast_policy(), || async move {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(ClientError::NotFound("gone".to_string()))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_related_excludes_current_and_limits() {
        let candidates = (1..=6).map(product).collect();
        let related = related_products(2, candidates, 4);
        let ids: Vec<i64> = related.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3, 4, 5]);
    }

    #[test]
    fn test_policy_from_config() {
        let policy = RetryPolicy::from_config(&RecommendationsConfig {
            max_attempts: 0,
            delay_ms: 250,
            limit: 2,
        });
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.delay, Duration::from_millis(250));
    }
}
