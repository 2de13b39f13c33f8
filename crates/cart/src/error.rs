//! Cart operation errors.
//!
//! Every variant is non-fatal: a failed operation leaves both the in-memory
//! cart and the persisted snapshot untouched. The `Display` text is the
//! message shown to the shopper.

use std::fmt;

use rocketshoes_core::ProductId;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::notify::{Notice, Severity};

/// The cart operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AddProduct,
    UpdateAmount,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddProduct => write!(f, "product add"),
            Self::UpdateAmount => write!(f, "quantity update"),
        }
    }
}

/// Errors returned (and notified) by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Catalog or stock request errored or returned a non-success status.
    #[error("{operation} failed")]
    FetchFailure {
        operation: Operation,
        #[source]
        source: CatalogError,
    },

    /// Tried to remove a product that is not in the cart.
    #[error("product remove failed")]
    NotFound(ProductId),

    /// Requested quantity exceeds available stock or is not positive.
    #[error("insufficient stock")]
    StockExceeded {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },
}

impl CartError {
    /// Build a fetch failure for `operation`.
    #[must_use]
    pub fn fetch(operation: Operation, source: CatalogError) -> Self {
        Self::FetchFailure { operation, source }
    }

    /// How prominently the failure should be shown.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::FetchFailure { .. } | Self::NotFound(_) => Severity::Error,
            Self::StockExceeded { .. } => Severity::Warning,
        }
    }

    /// The user-facing notice for this failure.
    #[must_use]
    pub fn notice(&self) -> Notice {
        Notice::new(self.severity(), self.to_string())
    }
}
