//! End-to-end cart tests against an HTTP catalog and file storage.

use std::path::Path;
use std::sync::Arc;

use rocketshoes_cart::snapshot;
use rocketshoes_cart::{
    AmountUpdate, CartError, CartHandle, CartStore, CatalogConfig, CatalogError, FileKv,
    HttpCatalogClient, Operation, PersistentKv, RecordingNotifier, DEFAULT_STORAGE_KEY,
};
use rocketshoes_core::{LineItem, Price, ProductId};
use rocketshoes_integration_tests::FakeCatalog;

type HttpStore = CartStore<HttpCatalogClient, FileKv, RecordingNotifier>;

async fn catalog() -> FakeCatalog {
    let catalog = FakeCatalog::start().await;
    catalog.put_product(1, "Tênis de Caminhada Leve Confortável", 17990, 3);
    catalog.put_product(2, "Tênis VR Caminhada Confortável Detalhes Couro Masculino", 13990, 5);
    catalog.put_product(7, "Tênis Adidas Duramo Lite 2.0", 21990, 3);
    catalog
}

fn open(catalog: &FakeCatalog, storage: &Path, notices: &RecordingNotifier) -> HttpStore {
    let client = HttpCatalogClient::new(&CatalogConfig::new(catalog.base_url())).unwrap();
    CartStore::open(
        client,
        FileKv::new(storage),
        notices.clone(),
        DEFAULT_STORAGE_KEY,
    )
}

fn stored(storage: &Path) -> Vec<LineItem> {
    let blob = FileKv::new(storage).get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    snapshot::decode(&blob).unwrap()
}

fn quantities(items: &[LineItem]) -> Vec<(i64, u32)> {
    items.iter().map(|i| (i.id.as_i64(), i.quantity)).collect()
}

// =============================================================================
// add_product
// =============================================================================

#[tokio::test]
async fn test_add_new_product_over_http() {
    let catalog = catalog().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("storage.json");
    let notices = RecordingNotifier::new();
    let mut store = open(&catalog, &storage, &notices);

    store.add_product(ProductId::new(7)).await.unwrap();

    let cart = store.cart();
    assert_eq!(quantities(cart), vec![(7, 1)]);
    assert_eq!(cart[0].title, "Tênis Adidas Duramo Lite 2.0");
    assert_eq!(cart[0].price, Price::from_cents(21990));
    assert_eq!(stored(&storage), cart);
    assert!(notices.notices().is_empty());
}

#[tokio::test]
async fn test_add_until_stock_runs_out() {
    let catalog = catalog().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("storage.json");
    let notices = RecordingNotifier::new();
    let mut store = open(&catalog, &storage, &notices);

    for _ in 0..3 {
        store.add_product(ProductId::new(1)).await.unwrap();
    }
    let err = store.add_product(ProductId::new(1)).await.unwrap_err();

    assert!(matches!(
        err,
        CartError::StockExceeded { requested: 4, available: 3, .. }
    ));
    assert_eq!(quantities(store.cart()), vec![(1, 3)]);
    assert_eq!(quantities(&stored(&storage)), vec![(1, 3)]);
    assert_eq!(notices.messages(), vec!["insufficient stock".to_string()]);

    // Restock and try again
    catalog.set_stock(1, 5);
    store.add_product(ProductId::new(1)).await.unwrap();
    assert_eq!(quantities(store.cart()), vec![(1, 4)]);
}

#[tokio::test]
async fn test_product_metadata_is_cached_but_stock_is_not() {
    let catalog = catalog().await;
    let dir = tempfile::tempdir().unwrap();
    let notices = RecordingNotifier::new();
    let mut store = open(&catalog, &dir.path().join("storage.json"), &notices);

    store.add_product(ProductId::new(2)).await.unwrap();
    store.add_product(ProductId::new(2)).await.unwrap();
    store.add_product(ProductId::new(2)).await.unwrap();

    assert_eq!(catalog.product_hits(), 1);
    assert_eq!(catalog.stock_hits(), 3);
}

#[tokio::test]
async fn test_add_unknown_product_is_fetch_failure() {
    let catalog = catalog().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("storage.json");
    let notices = RecordingNotifier::new();
    let mut store = open(&catalog, &storage, &notices);

    let err = store.add_product(ProductId::new(404)).await.unwrap_err();

    match err {
        CartError::FetchFailure { operation, source } => {
            assert_eq!(operation, Operation::AddProduct);
            assert!(matches!(source, CatalogError::NotFound(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(store.cart().is_empty());
    assert!(!storage.exists());
    assert_eq!(notices.messages(), vec!["product add failed".to_string()]);
}

#[tokio::test]
async fn test_add_during_catalog_outage_is_fetch_failure() {
    let catalog = catalog().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("storage.json");
    let notices = RecordingNotifier::new();
    let mut store = open(&catalog, &storage, &notices);
    store.add_product(ProductId::new(2)).await.unwrap();

    catalog.set_failing(true);
    let err = store.add_product(ProductId::new(1)).await.unwrap_err();

    assert!(matches!(
        err,
        CartError::FetchFailure {
            source: CatalogError::Status { status: 500, .. },
            ..
        }
    ));
    assert_eq!(quantities(store.cart()), vec![(2, 1)]);
    assert_eq!(quantities(&stored(&storage)), vec![(2, 1)]);
}

#[tokio::test]
async fn test_add_with_cached_product_but_failing_stock() {
    let catalog = catalog().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("storage.json");
    let notices = RecordingNotifier::new();
    let mut store = open(&catalog, &storage, &notices);
    store.add_product(ProductId::new(7)).await.unwrap();
    let before = std::fs::read_to_string(&storage).unwrap();

    catalog.set_stock_failing(true);
    let err = store.add_product(ProductId::new(7)).await.unwrap_err();

    match err {
        CartError::FetchFailure { operation, source } => {
            assert_eq!(operation, Operation::AddProduct);
            assert!(matches!(source, CatalogError::Status { status: 500, .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // Product came from the cache; only stock went to the server
    assert_eq!(catalog.product_hits(), 1);
    assert_eq!(catalog.stock_hits(), 2);
    assert_eq!(quantities(store.cart()), vec![(7, 1)]);
    assert_eq!(std::fs::read_to_string(&storage).unwrap(), before);
    assert_eq!(notices.messages(), vec!["product add failed".to_string()]);
}

#[tokio::test]
async fn test_add_when_catalog_is_down() {
    let catalog = catalog().await;
    let dir = tempfile::tempdir().unwrap();
    let notices = RecordingNotifier::new();
    let mut store = open(&catalog, &dir.path().join("storage.json"), &notices);
    catalog.stop().await;

    let err = store.add_product(ProductId::new(1)).await.unwrap_err();
    assert!(matches!(
        err,
        CartError::FetchFailure {
            source: CatalogError::Http(_),
            ..
        }
    ));
    assert_eq!(notices.messages(), vec!["product add failed".to_string()]);
}

// =============================================================================
// remove_product / update_product_amount
// =============================================================================

#[tokio::test]
async fn test_remove_and_update_over_http() {
    let catalog = catalog().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("storage.json");
    let notices = RecordingNotifier::new();
    let mut store = open(&catalog, &storage, &notices);

    store.add_product(ProductId::new(1)).await.unwrap();
    store.add_product(ProductId::new(2)).await.unwrap();
    store.add_product(ProductId::new(7)).await.unwrap();

    store
        .update_product_amount(AmountUpdate::new(ProductId::new(2), 5))
        .await
        .unwrap();
    assert_eq!(quantities(store.cart()), vec![(1, 1), (2, 5), (7, 1)]);

    let err = store
        .update_product_amount(AmountUpdate::new(ProductId::new(2), 6))
        .await
        .unwrap_err();
    assert!(matches!(err, CartError::StockExceeded { .. }));

    let err = store
        .update_product_amount(AmountUpdate::new(ProductId::new(2), 0))
        .await
        .unwrap_err();
    assert!(matches!(err, CartError::StockExceeded { .. }));
    assert_eq!(store.quantity_of(ProductId::new(2)), Some(5));

    store.remove_product(ProductId::new(1)).unwrap();
    assert_eq!(quantities(store.cart()), vec![(2, 5), (7, 1)]);
    assert_eq!(stored(&storage), store.cart());

    assert!(store.remove_product(ProductId::new(1)).is_err());
    assert_eq!(
        notices.messages(),
        vec![
            "insufficient stock".to_string(),
            "insufficient stock".to_string(),
            "product remove failed".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_update_product_not_in_cart_is_ignored() {
    let catalog = catalog().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("storage.json");
    let notices = RecordingNotifier::new();
    let mut store = open(&catalog, &storage, &notices);

    store
        .update_product_amount(AmountUpdate::new(ProductId::new(7), 2))
        .await
        .unwrap();

    assert!(store.cart().is_empty());
    assert!(!storage.exists());
    assert!(notices.notices().is_empty());
    assert_eq!(catalog.stock_hits(), 1);
}

#[tokio::test]
async fn test_update_during_outage() {
    let catalog = catalog().await;
    let dir = tempfile::tempdir().unwrap();
    let notices = RecordingNotifier::new();
    let mut store = open(&catalog, &dir.path().join("storage.json"), &notices);
    store.add_product(ProductId::new(7)).await.unwrap();

    catalog.set_failing(true);
    let err = store
        .update_product_amount(AmountUpdate::new(ProductId::new(7), 2))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "quantity update failed");
    assert_eq!(store.quantity_of(ProductId::new(7)), Some(1));
}

// =============================================================================
// Persistence across restarts
// =============================================================================

#[tokio::test]
async fn test_restart_reloads_identical_cart() {
    let catalog = catalog().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("storage.json");
    let notices = RecordingNotifier::new();

    let before = {
        let mut store = open(&catalog, &storage, &notices);
        store.add_product(ProductId::new(7)).await.unwrap();
        store.add_product(ProductId::new(1)).await.unwrap();
        store.add_product(ProductId::new(7)).await.unwrap();
        store.cart().to_vec()
    };

    let reopened = open(&catalog, &storage, &notices);
    assert_eq!(reopened.cart(), before.as_slice());
    assert_eq!(quantities(reopened.cart()), vec![(7, 2), (1, 1)]);
}

#[tokio::test]
async fn test_legacy_storage_is_loaded_and_upgraded() {
    let catalog = catalog().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("storage.json");
    let legacy = r#"[{"id":2,"title":"Tênis VR Caminhada Confortável Detalhes Couro Masculino","price":139.9,"image":"https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis2.jpg","amount":2}]"#;
    FileKv::new(&storage).set(DEFAULT_STORAGE_KEY, legacy).unwrap();

    let notices = RecordingNotifier::new();
    let mut store = open(&catalog, &storage, &notices);
    assert_eq!(quantities(store.cart()), vec![(2, 2)]);

    store.add_product(ProductId::new(2)).await.unwrap();
    let blob = FileKv::new(&storage).get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    assert!(blob.starts_with(r#"{"version":1"#));
    assert_eq!(quantities(&stored(&storage)), vec![(2, 3)]);
}

#[tokio::test]
async fn test_corrupt_storage_starts_empty() {
    let catalog = catalog().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("storage.json");
    FileKv::new(&storage)
        .set(DEFAULT_STORAGE_KEY, r#"{"version":9,"items":[]}"#)
        .unwrap();

    let notices = RecordingNotifier::new();
    let mut store = open(&catalog, &storage, &notices);
    assert!(store.cart().is_empty());

    store.add_product(ProductId::new(1)).await.unwrap();
    assert_eq!(quantities(&stored(&storage)), vec![(1, 1)]);
}

// =============================================================================
// Shared handle
// =============================================================================

#[tokio::test]
async fn test_handle_serializes_concurrent_adds() {
    let catalog = catalog().await;
    catalog.set_stock(2, 4);
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("storage.json");
    let notices = RecordingNotifier::new();
    let handle = CartHandle::new(open(&catalog, &storage, &notices));

    let tasks: Vec<_> = (0..6)
        .map(|_| {
            let handle = handle.clone();
            tokio::spawn(async move { handle.add_product(ProductId::new(2)).await })
        })
        .collect();

    let mut accepted = 0;
    for task in tasks {
        if task.await.unwrap().is_ok() {
            accepted += 1;
        }
    }

    assert_eq!(accepted, 4);
    assert_eq!(quantities(&handle.cart().await), vec![(2, 4)]);
    assert_eq!(quantities(&stored(&storage)), vec![(2, 4)]);
    assert_eq!(notices.messages().len(), 2);
    assert_eq!(handle.summary().await.subtotal, Price::from_cents(13990 * 4));
}

#[tokio::test]
async fn test_handle_is_shared_between_consumers() {
    let catalog = catalog().await;
    let dir = tempfile::tempdir().unwrap();
    let notices = RecordingNotifier::new();
    let handle = Arc::new(CartHandle::new(open(
        &catalog,
        &dir.path().join("storage.json"),
        &notices,
    )));

    let header = Arc::clone(&handle);
    handle.add_product(ProductId::new(1)).await.unwrap();
    assert_eq!(header.summary().await.unit_count, 1);
}
