//! The cart store.
//!
//! Owns the in-memory line items, validates changes against the catalog, and
//! writes the full cart to storage after every successful mutation. Each
//! operation either commits a whole new line sequence (storage first, then
//! memory) or changes nothing at all.

use rocketshoes_core::{CartSummary, LineItem, ProductId};
use tracing::{debug, instrument, warn};

use crate::catalog::{self, CatalogService};
use crate::error::{CartError, Operation};
use crate::lines;
use crate::notify::{Notifier, TracingNotifier};
use crate::snapshot;
use crate::storage::PersistentKv;

/// Storage key of the cart slot.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Request to set a line's quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountUpdate {
    pub product_id: ProductId,
    pub amount: u32,
}

impl AmountUpdate {
    #[must_use]
    pub const fn new(product_id: ProductId, amount: u32) -> Self {
        Self { product_id, amount }
    }
}

/// Shopping cart state, mirrored to a persistent key-value slot.
///
/// Failed operations return a [`CartError`] and also send its notice to the
/// store's [`Notifier`]; the cart is unchanged in both memory and storage.
pub struct CartStore<C, K, N = TracingNotifier> {
    catalog: C,
    storage: K,
    notifier: N,
    storage_key: String,
    items: Vec<LineItem>,
}

impl<C, K, N> std::fmt::Debug for CartStore<C, K, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("storage_key", &self.storage_key)
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

impl<C, K, N> CartStore<C, K, N>
where
    C: CatalogService,
    K: PersistentKv,
    N: Notifier,
{
    /// Open the store, seeding the cart from `storage_key`.
    ///
    /// A missing, unreadable or undecodable snapshot yields an empty cart.
    pub fn open(catalog: C, storage: K, notifier: N, storage_key: impl Into<String>) -> Self {
        let storage_key = storage_key.into();
        let items = load_items(&storage, &storage_key);
        debug!(key = %storage_key, lines = items.len(), "Cart loaded");

        Self {
            catalog,
            storage,
            notifier,
            storage_key,
            items,
        }
    }

    /// Current line items, in insertion order.
    #[must_use]
    pub fn cart(&self) -> &[LineItem] {
        &self.items
    }

    /// Line count, unit count and subtotal.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary::of(&self.items)
    }

    /// Quantity of `id` in the cart, if present.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> Option<u32> {
        lines::find(&self.items, id).map(|item| item.quantity)
    }

    /// Add one unit of a product.
    ///
    /// Fetches the product and its stock concurrently. New products are
    /// appended with quantity 1; existing ones are incremented while below
    /// stock.
    ///
    /// # Errors
    ///
    /// - `FetchFailure` if either catalog request fails
    /// - `StockExceeded` if no more units are available
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let result = self.try_add_product(product_id).await;
        self.settle(result)
    }

    /// Remove a product's line.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the product is not in the cart.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn remove_product(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let result = lines::remove_line(&self.items, product_id).map(|next| self.commit(next));
        self.settle(result)
    }

    /// Set a line's quantity to exactly `update.amount`.
    ///
    /// Does nothing when the product is not in the cart.
    ///
    /// # Errors
    ///
    /// - `FetchFailure` if the stock request fails
    /// - `StockExceeded` unless `0 < amount <= stock`
    #[instrument(skip(self), fields(product_id = %update.product_id, amount = update.amount))]
    pub async fn update_product_amount(&mut self, update: AmountUpdate) -> Result<(), CartError> {
        let result = self.try_update_product_amount(update).await;
        self.settle(result)
    }

    async fn try_add_product(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let (product, stock) = tokio::try_join!(
            self.catalog.product(product_id),
            self.catalog.stock(product_id)
        )
        .and_then(|(product, stock)| {
            catalog::ensure_id("product", product_id, product.id)?;
            catalog::ensure_id("stock", product_id, stock.id)?;
            Ok((product, stock))
        })
        .map_err(|source| CartError::fetch(Operation::AddProduct, source))?;

        let next = lines::add_unit(&self.items, product_id, product, stock)?;
        self.commit(next);
        Ok(())
    }

    async fn try_update_product_amount(&mut self, update: AmountUpdate) -> Result<(), CartError> {
        let stock = self
            .catalog
            .stock(update.product_id)
            .await
            .and_then(|stock| {
                catalog::ensure_id("stock", update.product_id, stock.id)?;
                Ok(stock)
            })
            .map_err(|source| CartError::fetch(Operation::UpdateAmount, source))?;

        match lines::set_quantity(&self.items, update.product_id, update.amount, stock)? {
            Some(next) => self.commit(next),
            None => debug!("Product not in cart, nothing to update"),
        }
        Ok(())
    }

    /// Report a failed operation to the notifier.
    fn settle(&self, result: Result<(), CartError>) -> Result<(), CartError> {
        if let Err(err) = &result {
            debug!(error = %err, source = ?std::error::Error::source(err), "Cart operation rejected");
            self.notifier.notify(err.notice());
        }
        result
    }

    /// Persist `next` and make it the current cart.
    fn commit(&mut self, next: Vec<LineItem>) {
        self.persist(&next);
        self.items = next;
        debug!(lines = self.items.len(), "Cart committed");
    }

    /// Best-effort write; a failure is logged and otherwise ignored.
    fn persist(&self, items: &[LineItem]) {
        let blob = match snapshot::encode(items) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "Failed to encode cart snapshot");
                return;
            }
        };
        if let Err(e) = self.storage.set(&self.storage_key, &blob) {
            warn!(key = %self.storage_key, error = %e, "Failed to persist cart");
        }
    }
}

fn load_items<K: PersistentKv>(storage: &K, key: &str) -> Vec<LineItem> {
    let blob = match storage.get(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "Failed to read stored cart, starting empty");
            return Vec::new();
        }
    };

    snapshot::decode(&blob).unwrap_or_else(|e| {
        warn!(key, error = %e, "Stored cart is unusable, starting empty");
        Vec::new()
    })
}
