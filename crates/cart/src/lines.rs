//! Pure cart transitions.
//!
//! Each function takes the current line sequence by reference and returns a
//! brand-new sequence. The input is never modified, so a rejected change
//! cannot leave a half-applied cart behind.

use rocketshoes_core::{LineItem, Product, ProductId, Stock};

use crate::error::CartError;

/// Add one unit of product `id`.
///
/// A product not yet in the cart is appended with quantity 1. A product
/// already present is incremented by one while below `stock`. The line is
/// keyed by `id`, not by the id inside `product`.
///
/// # Errors
///
/// Returns `CartError::StockExceeded` when the resulting quantity would
/// exceed `stock.quantity`.
pub fn add_unit(
    items: &[LineItem],
    id: ProductId,
    product: Product,
    stock: Stock,
) -> Result<Vec<LineItem>, CartError> {
    let Some(current) = find(items, id) else {
        if !stock.allows(1) {
            return Err(CartError::StockExceeded {
                product_id: id,
                requested: 1,
                available: stock.quantity,
            });
        }
        let mut next = items.to_vec();
        next.push(LineItem {
            id,
            ..LineItem::from_product(product, 1)
        });
        return Ok(next);
    };

    let requested = current.quantity.saturating_add(1);
    if !stock.allows(requested) {
        return Err(CartError::StockExceeded {
            product_id: id,
            requested,
            available: stock.quantity,
        });
    }
    Ok(replace_quantity(items, id, requested))
}

/// Remove the line for `id`.
///
/// # Errors
///
/// Returns `CartError::NotFound` when `id` is not in the cart.
pub fn remove_line(items: &[LineItem], id: ProductId) -> Result<Vec<LineItem>, CartError> {
    if find(items, id).is_none() {
        return Err(CartError::NotFound(id));
    }
    Ok(items.iter().filter(|item| item.id != id).cloned().collect())
}

/// Set the quantity of `id` to exactly `amount`.
///
/// Returns `Ok(None)` when `id` is not in the cart (nothing to update).
///
/// # Errors
///
/// Returns `CartError::StockExceeded` unless `0 < amount <= stock.quantity`.
pub fn set_quantity(
    items: &[LineItem],
    id: ProductId,
    amount: u32,
    stock: Stock,
) -> Result<Option<Vec<LineItem>>, CartError> {
    if find(items, id).is_none() {
        return Ok(None);
    }
    if !stock.allows(amount) {
        return Err(CartError::StockExceeded {
            product_id: id,
            requested: amount,
            available: stock.quantity,
        });
    }
    Ok(Some(replace_quantity(items, id, amount)))
}

/// The line for `id`, if present.
#[must_use]
pub fn find(items: &[LineItem], id: ProductId) -> Option<&LineItem> {
    items.iter().find(|item| item.id == id)
}

fn replace_quantity(items: &[LineItem], id: ProductId, quantity: u32) -> Vec<LineItem> {
    items
        .iter()
        .map(|item| {
            if item.id == id {
                item.with_quantity(quantity)
            } else {
                item.clone()
            }
        })
        .collect()
}
