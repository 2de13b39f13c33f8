//! Core types for RocketShoes.
//!
//! This module provides type-safe wrappers for catalog and cart concepts.

pub mod id;
pub mod line_item;
pub mod price;
pub mod product;

pub use id::*;
pub use line_item::{CartSummary, LineItem};
pub use price::{CurrencyCode, Price, UnknownCurrency};
pub use product::{Product, Stock};
