//! Catalog records as served by the product and stock endpoints.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// Product metadata from `GET /products/{id}`.
///
/// Unknown fields in the catalog payload are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// Product image URL.
    #[serde(rename = "image")]
    pub image_url: String,
}

/// Stock level from `GET /stock/{id}`.
///
/// A read-only snapshot; it is never persisted with the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    /// Units available. The catalog calls this field `amount`.
    #[serde(rename = "amount")]
    pub quantity: u32,
}

impl Stock {
    /// Create a stock snapshot.
    #[must_use]
    pub const fn new(id: ProductId, quantity: u32) -> Self {
        Self { id, quantity }
    }

    /// Whether `requested` units can be held in a cart line.
    #[must_use]
    pub const fn allows(&self, requested: u32) -> bool {
        requested > 0 && requested <= self.quantity
    }
}
