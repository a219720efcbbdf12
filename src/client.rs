//! HTTP client for the catalog REST API, used by the terminal frontend and
//! the `featured` admin commands.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::catalog::{Category, Product, ProductDetail, ProductPage, ProductQuery};
use crate::config::ClientConfig;
use crate::rest::dto::{FeaturedRequest, FeaturedResponse};
use crate::rest::error::ErrorResponse;

/// Errors that can occur when talking to the catalog API
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Whether retrying the same request could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Network(_) => true,
            ClientError::Http { status, .. } => *status >= 500,
            ClientError::NotFound(_) | ClientError::Decode(_) => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Query string for a category listing
    pub fn listing_query(query: &ProductQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", query.page.to_string()),
            ("limit", query.limit.to_string()),
            ("sort", query.sort.as_str().to_string()),
        ];
        if let Some(style) = &query.style {
            params.push(("style", style.clone()));
        }
        params
    }

    pub async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        let response = self.http.get(self.url("/api/categorias")).send().await?;
        decode(response).await
    }

    pub async fn products(
        &self,
        category_id: i64,
        query: &ProductQuery,
    ) -> Result<ProductPage, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/api/productos/{category_id}")))
            .query(&Self::listing_query(query))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn product(&self, id: i64) -> Result<ProductDetail, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/api/productos/detalle/{id}")))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn featured(&self) -> Result<Vec<Product>, ClientError> {
        let response = self
            .http
            .get(self.url("/api/productos-destacados"))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn set_featured(&self, ids: &[i64]) -> Result<Vec<i64>, ClientError> {
        let response = self
            .http
            .post(self.url("/api/productos-destacados"))
            .json(&FeaturedRequest {
                products: ids.to_vec(),
            })
            .send()
            .await?;
        let stored: FeaturedResponse = decode(response).await?;
        Ok(stored.products)
    }
}

/// Map non-success statuses to `ClientError`, otherwise decode the JSON body
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()));
    }

    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };

    if status == StatusCode::NOT_FOUND {
        Err(ClientError::NotFound(message))
    } else {
        Err(ClientError::Http {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SortOrder;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = CatalogClient::new("http://localhost:7010/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:7010");
        assert_eq!(
            client.url("/api/categorias"),
            "http://localhost:7010/api/categorias"
        );
    }

    #[test]
    fn test_listing_query_params() {
        let query = ProductQuery {
            page: 2,
            limit: 9,
            style: Some("moderno".to_string()),
            sort: SortOrder::Discount,
        };
        let params = CatalogClient::listing_query(&query);
        assert!(params.contains(&("page", "2".to_string())));
        assert!(params.contains(&("sort", "descuento".to_string())));
        assert!(params.contains(&("style", "moderno".to_string())));

        let params = CatalogClient::listing_query(&ProductQuery::default());
        assert!(!params.iter().any(|(k, _)| *k == "style"));
    }

    #[test]
    fn test_transient_errors() {
        assert!(ClientError::Network("reset".to_string()).is_transient());
        assert!(ClientError::Http {
            status: 503,
            message: String::new()
        }
        .is_transient());
        assert!(!ClientError::Http {
            status: 400,
            message: String::new()
        }
        .is_transient());
        assert!(!ClientError::NotFound("x".to_string()).is_transient());
    }
}
