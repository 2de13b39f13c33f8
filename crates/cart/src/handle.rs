//! Shared cart handle.
//!
//! The handle is created once at application start, cloned into every
//! consumer that needs the cart, and dropped at shutdown. Operations are
//! serialized through an async mutex, so at most one cart action is in flight
//! and each one commits as a unit.

use std::sync::Arc;

use rocketshoes_core::{CartSummary, LineItem, ProductId};
use tokio::sync::Mutex;

use crate::catalog::CatalogService;
use crate::error::CartError;
use crate::notify::{Notifier, TracingNotifier};
use crate::storage::PersistentKv;
use crate::store::{AmountUpdate, CartStore};

/// Cloneable handle to a single [`CartStore`].
pub struct CartHandle<C, K, N = TracingNotifier> {
    inner: Arc<Mutex<CartStore<C, K, N>>>,
}

impl<C, K, N> Clone for CartHandle<C, K, N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C, K, N> CartHandle<C, K, N>
where
    C: CatalogService,
    K: PersistentKv,
    N: Notifier,
{
    /// Wrap an opened store.
    #[must_use]
    pub fn new(store: CartStore<C, K, N>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Snapshot of the current line items.
    pub async fn cart(&self) -> Vec<LineItem> {
        self.inner.lock().await.cart().to_vec()
    }

    /// Line count, unit count and subtotal.
    pub async fn summary(&self) -> CartSummary {
        self.inner.lock().await.summary()
    }

    /// See [`CartStore::add_product`].
    ///
    /// # Errors
    ///
    /// Propagates the store's `CartError`.
    pub async fn add_product(&self, product_id: ProductId) -> Result<(), CartError> {
        self.inner.lock().await.add_product(product_id).await
    }

    /// See [`CartStore::remove_product`].
    ///
    /// # Errors
    ///
    /// Propagates the store's `CartError`.
    pub async fn remove_product(&self, product_id: ProductId) -> Result<(), CartError> {
        self.inner.lock().await.remove_product(product_id)
    }

    /// See [`CartStore::update_product_amount`].
    ///
    /// # Errors
    ///
    /// Propagates the store's `CartError`.
    pub async fn update_product_amount(&self, update: AmountUpdate) -> Result<(), CartError> {
        self.inner.lock().await.update_product_amount(update).await
    }
}
