//! Cart commands and the store they operate on.
//!
//! # Environment Variables
//!
//! - `CATALOG_BASE_URL` - Catalog REST API base URL
//! - `CART_STORAGE_PATH` - Local storage file holding the cart

pub mod cart;

use rocketshoes_cart::{
    CartConfig, CartError, CartStore, CatalogError, FileKv, HttpCatalogClient, TracingNotifier,
};
use thiserror::Error;
use tracing::debug;

/// Store type used by the CLI: live catalog, file storage, log notices.
pub type CliStore = CartStore<HttpCatalogClient, FileKv, TracingNotifier>;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The catalog client could not be created.
    #[error("Catalog client error: {0}")]
    Catalog(#[from] CatalogError),

    /// The cart rejected the action (already shown as a notice).
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),
}

/// Open the cart from local storage.
///
/// # Errors
///
/// Returns `CommandError::Catalog` if the catalog client cannot be built.
pub fn open_store(config: &CartConfig) -> Result<CliStore, CommandError> {
    let catalog = HttpCatalogClient::new(&config.catalog)?;
    let storage = FileKv::new(&config.storage.path);
    debug!(
        catalog = %catalog.base_url(),
        storage = %storage.path().display(),
        "Opening cart"
    );
    Ok(CartStore::open(
        catalog,
        storage,
        TracingNotifier,
        config.storage.key.as_str(),
    ))
}
