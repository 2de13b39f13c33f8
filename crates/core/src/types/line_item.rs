//! Cart line items and cart-level totals.

use serde::{Deserialize, Serialize};

use super::{CurrencyCode, Price, Product, ProductId};

/// One product entry in the cart with its selected quantity.
///
/// Identity is the product id; a cart never holds two lines with the same id.
/// Field names on the wire match the catalog's product payload plus `amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    #[serde(rename = "image")]
    pub image_url: String,
    /// Selected quantity, always at least 1.
    #[serde(rename = "amount")]
    pub quantity: u32,
}

impl LineItem {
    /// Build a line from catalog metadata.
    #[must_use]
    pub fn from_product(product: Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image_url: product.image_url,
            quantity,
        }
    }

    /// Copy of this line with a different quantity.
    #[must_use]
    pub fn with_quantity(&self, quantity: u32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Aggregate figures for a cart, as shown in a cart badge or footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartSummary {
    /// Number of distinct products.
    pub line_count: usize,
    /// Sum of all quantities.
    pub unit_count: u64,
    pub subtotal: Price,
}

impl CartSummary {
    /// Compute the summary of a sequence of lines.
    #[must_use]
    pub fn of(items: &[LineItem]) -> Self {
        Self {
            line_count: items.len(),
            unit_count: items.iter().map(|item| u64::from(item.quantity)).sum(),
            subtotal: items.iter().map(LineItem::line_total).sum(),
        }
    }

    /// Formatted subtotal (e.g., "R$359.80").
    #[must_use]
    pub fn subtotal_display(&self, currency: CurrencyCode) -> String {
        self.subtotal.display(currency)
    }
}
