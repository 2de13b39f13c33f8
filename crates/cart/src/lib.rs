//! RocketShoes cart library.
//!
//! Holds the shopper's cart in memory, validates every change against the
//! catalog's stock service, and mirrors the cart to local storage after each
//! successful mutation so it survives restarts.
//!
//! # Architecture
//!
//! - [`store::CartStore`] owns the line items and exposes the three cart
//!   operations (`add_product`, `remove_product`, `update_product_amount`)
//! - [`lines`] holds the pure transitions; the store only commits their result
//! - [`catalog`] fetches product metadata and stock (`reqwest` + `moka`)
//! - [`storage`] is the single-slot key-value persistence
//! - [`snapshot`] is the versioned encoding of the cart in storage
//! - [`notify`] delivers user-facing notices for failed operations
//! - [`handle::CartHandle`] is the cloneable provider handed to consumers
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_cart::{CartConfig, CartStore, HttpCatalogClient, FileKv, TracingNotifier};
//!
//! let config = CartConfig::from_env()?;
//! let catalog = HttpCatalogClient::new(&config.catalog)?;
//! let storage = FileKv::new(&config.storage.path);
//! let mut store = CartStore::open(catalog, storage, TracingNotifier, &config.storage.key);
//!
//! store.add_product(ProductId::new(7)).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod handle;
pub mod lines;
pub mod notify;
pub mod snapshot;
pub mod storage;
pub mod store;

pub use catalog::{CatalogError, CatalogService, HttpCatalogClient, InMemoryCatalog};
pub use config::{CartConfig, CatalogConfig, ConfigError, StorageConfig};
pub use error::{CartError, Operation};
pub use handle::CartHandle;
pub use notify::{Notice, Notifier, RecordingNotifier, Severity, TracingNotifier};
pub use storage::{FileKv, MemoryKv, PersistentKv, StorageError};
pub use store::{AmountUpdate, CartStore, DEFAULT_STORAGE_KEY};
