//! In-memory catalog for tests and offline demos.

use std::collections::HashMap;
use std::future::{Future, ready};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rocketshoes_core::{Product, ProductId, Stock};

use super::{CatalogError, CatalogService};

/// A catalog backed by hash maps.
///
/// Stock levels can be changed at any time, and the whole catalog can be
/// taken offline to simulate network failures.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    state: Mutex<CatalogState>,
}

#[derive(Debug, Default)]
struct CatalogState {
    products: HashMap<ProductId, Product>,
    stock: HashMap<ProductId, u32>,
    offline: bool,
    stock_offline: bool,
    requests: usize,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: add a product with its stock level.
    #[must_use]
    pub fn with_product(self, product: Product, stock: u32) -> Self {
        self.put_product(product, stock);
        self
    }

    /// Insert or replace a product and its stock level.
    pub fn put_product(&self, product: Product, stock: u32) {
        let mut state = self.lock();
        state.stock.insert(product.id, stock);
        state.products.insert(product.id, product);
    }

    /// Change the stock level of a product.
    pub fn set_stock(&self, id: ProductId, quantity: u32) {
        self.lock().stock.insert(id, quantity);
    }

    /// Make every request fail with `CatalogError::Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Make only stock requests fail; product metadata is still served.
    pub fn set_stock_offline(&self, offline: bool) {
        self.lock().stock_offline = offline;
    }

    /// Number of requests served (including failed ones).
    #[must_use]
    pub fn requests(&self) -> usize {
        self.lock().requests
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lookup<T>(
        &self,
        id: ProductId,
        resource: &str,
        find: impl FnOnce(&CatalogState) -> Option<T>,
    ) -> Result<T, CatalogError> {
        let mut state = self.lock();
        state.requests += 1;
        if state.offline || (resource == "stock" && state.stock_offline) {
            return Err(CatalogError::Unavailable(format!("/{resource}/{id}")));
        }
        find(&state).ok_or_else(|| CatalogError::NotFound(format!("/{resource}/{id}")))
    }
}

impl CatalogService for InMemoryCatalog {
    fn product(&self, id: ProductId) -> impl Future<Output = Result<Product, CatalogError>> + Send {
        ready(self.lookup(id, "products", |state| state.products.get(&id).cloned()))
    }

    fn stock(&self, id: ProductId) -> impl Future<Output = Result<Stock, CatalogError>> + Send {
        ready(self.lookup(id, "stock", |state| {
            state.stock.get(&id).map(|&quantity| Stock::new(id, quantity))
        }))
    }
}
