//! Catalog and stock service clients.
//!
//! # Architecture
//!
//! - The catalog is the source of truth for product metadata and stock levels
//! - [`HttpCatalogClient`] talks to the REST catalog with `reqwest`
//! - Product metadata is cached in memory via `moka`; stock is always fetched
//! - [`InMemoryCatalog`] serves fixed data for tests and offline demos
//!
//! # Endpoints
//!
//! - `GET {base}/products/{id}` - product metadata
//! - `GET {base}/stock/{id}` - `{ "id": 1, "amount": 3 }`

mod http;
mod memory;

pub use http::HttpCatalogClient;
pub use memory::InMemoryCatalog;

use std::future::Future;
use std::sync::Arc;

use rocketshoes_core::{Product, ProductId, Stock};
use thiserror::Error;

/// Errors that can occur when talking to the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Catalog answered with a non-success status.
    #[error("Catalog returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The endpoint URL could not be built from the base URL.
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    /// Catalog is not reachable.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    /// Catalog answered for a different product than the one requested.
    #[error("Catalog returned {resource} {returned} for product {requested}")]
    IdMismatch {
        resource: &'static str,
        requested: ProductId,
        returned: ProductId,
    },
}

/// Check that a catalog payload belongs to the requested product.
///
/// # Errors
///
/// Returns `CatalogError::IdMismatch` when `returned` differs from `requested`.
pub fn ensure_id(
    resource: &'static str,
    requested: ProductId,
    returned: ProductId,
) -> Result<(), CatalogError> {
    if requested == returned {
        Ok(())
    } else {
        Err(CatalogError::IdMismatch {
            resource,
            requested,
            returned,
        })
    }
}

/// Read-only source of product metadata and stock levels.
pub trait CatalogService: Send + Sync {
    /// Fetch product metadata by id.
    fn product(&self, id: ProductId) -> impl Future<Output = Result<Product, CatalogError>> + Send;

    /// Fetch the current stock level by id.
    fn stock(&self, id: ProductId) -> impl Future<Output = Result<Stock, CatalogError>> + Send;
}

impl<T: CatalogService> CatalogService for Arc<T> {
    fn product(&self, id: ProductId) -> impl Future<Output = Result<Product, CatalogError>> + Send {
        (**self).product(id)
    }

    fn stock(&self, id: ProductId) -> impl Future<Output = Result<Stock, CatalogError>> + Send {
        (**self).stock(id)
    }
}
