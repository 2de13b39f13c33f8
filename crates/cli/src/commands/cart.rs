//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! rs-cart add 1
//! rs-cart update 1 2
//! rs-cart remove 1
//! rs-cart show
//! ```

use std::fmt::Write as _;

use rocketshoes_cart::AmountUpdate;
use rocketshoes_core::{CartSummary, CurrencyCode, LineItem, ProductId};
use tracing::info;

use super::{CliStore, CommandError};

/// Add one unit of a product.
///
/// # Errors
///
/// Returns `CommandError::Cart` if the cart rejected the action.
pub async fn add(store: &mut CliStore, product_id: ProductId) -> Result<(), CommandError> {
    store.add_product(product_id).await?;
    info!(product_id = %product_id, quantity = ?store.quantity_of(product_id), "Added to cart");
    Ok(())
}

/// Remove a product.
///
/// # Errors
///
/// Returns `CommandError::Cart` if the product is not in the cart.
pub fn remove(store: &mut CliStore, product_id: ProductId) -> Result<(), CommandError> {
    store.remove_product(product_id)?;
    info!(product_id = %product_id, "Removed from cart");
    Ok(())
}

/// Set a product's quantity.
///
/// # Errors
///
/// Returns `CommandError::Cart` if the cart rejected the action.
pub async fn update(
    store: &mut CliStore,
    product_id: ProductId,
    amount: u32,
) -> Result<(), CommandError> {
    store
        .update_product_amount(AmountUpdate::new(product_id, amount))
        .await?;
    info!(product_id = %product_id, quantity = ?store.quantity_of(product_id), "Quantity updated");
    Ok(())
}

/// Print the cart to stdout.
#[allow(clippy::print_stdout)] // The cart table is the command's output
pub fn show(store: &CliStore, currency: CurrencyCode) {
    print!("{}", render_cart(store.cart(), currency));
}

/// Format the cart as a plain-text table with a subtotal line.
#[must_use]
pub fn render_cart(items: &[LineItem], currency: CurrencyCode) -> String {
    if items.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:>6}  {:>4}  {:>12}  {:>12}  TITLE", "ID", "QTY", "PRICE", "TOTAL");
    for item in items {
        let _ = writeln!(
            out,
            "{:>6}  {:>4}  {:>12}  {:>12}  {}",
            item.id,
            item.quantity,
            item.price.display(currency),
            item.line_total().display(currency),
            item.title
        );
    }

    let summary = CartSummary::of(items);
    let _ = writeln!(
        out,
        "{} item(s), subtotal {}",
        summary.unit_count,
        summary.subtotal_display(currency)
    );
    out
}
