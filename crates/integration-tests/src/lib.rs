//! Integration tests for the RocketShoes cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! Tests run the real `HttpCatalogClient` against [`FakeCatalog`], an axum
//! server on an ephemeral loopback port that serves the catalog's
//! `/products/{id}` and `/stock/{id}` endpoints from memory.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use url::Url;

#[derive(Default)]
struct FakeState {
    products: Mutex<HashMap<i64, Value>>,
    stock: Mutex<HashMap<i64, u32>>,
    failing: AtomicBool,
    stock_failing: AtomicBool,
    product_hits: AtomicUsize,
    stock_hits: AtomicUsize,
}

impl FakeState {
    fn products(&self) -> MutexGuard<'_, HashMap<i64, Value>> {
        self.products.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn stock(&self) -> MutexGuard<'_, HashMap<i64, u32>> {
        self.stock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// In-process catalog HTTP server.
///
/// Shuts down when dropped.
pub struct FakeCatalog {
    addr: SocketAddr,
    state: Arc<FakeState>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl FakeCatalog {
    /// Bind to `127.0.0.1:0` and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::default());
        let app = Router::new()
            .route("/products/{id}", get(get_product))
            .route("/stock/{id}", get(get_stock))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake catalog");
        let addr = listener.local_addr().expect("Fake catalog has no address");

        let (shutdown, stopped) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = stopped.await;
                })
                .await;
        });

        Self {
            addr,
            state,
            shutdown: Some(shutdown),
            task: Some(task),
        }
    }

    /// Base URL to configure the client with.
    ///
    /// # Panics
    ///
    /// Never in practice; the address always forms a valid URL.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("Invalid fake catalog URL")
    }

    /// Register a product with a price in cents and a stock level.
    pub fn put_product(&self, id: i64, title: &str, price_cents: i64, stock: u32) {
        #[allow(clippy::cast_precision_loss)] // Test prices are small
        let price = price_cents as f64 / 100.0;
        self.state.products().insert(
            id,
            json!({
                "id": id,
                "title": title,
                "price": price,
                "image": format!("https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis{id}.jpg"),
            }),
        );
        self.state.stock().insert(id, stock);
    }

    /// Change a product's stock level.
    pub fn set_stock(&self, id: i64, stock: u32) {
        self.state.stock().insert(id, stock);
    }

    /// Answer every request with HTTP 500 while `failing` is set.
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    /// Answer only `/stock/{id}` with HTTP 500 while `failing` is set.
    pub fn set_stock_failing(&self, failing: bool) {
        self.state.stock_failing.store(failing, Ordering::SeqCst);
    }

    /// Requests served on `/products/{id}`.
    #[must_use]
    pub fn product_hits(&self) -> usize {
        self.state.product_hits.load(Ordering::SeqCst)
    }

    /// Requests served on `/stock/{id}`.
    #[must_use]
    pub fn stock_hits(&self) -> usize {
        self.state.stock_hits.load(Ordering::SeqCst)
    }

    /// Stop the server and wait for it to exit.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for FakeCatalog {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

async fn get_product(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    state.product_hits.fetch_add(1, Ordering::SeqCst);
    if state.failing.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    state
        .products()
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn get_stock(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    state.stock_hits.fetch_add(1, Ordering::SeqCst);
    if state.failing.load(Ordering::SeqCst) || state.stock_failing.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    state
        .stock()
        .get(&id)
        .map(|amount| Json(json!({ "id": id, "amount": amount })))
        .ok_or(StatusCode::NOT_FOUND)
}
