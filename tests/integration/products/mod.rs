//! Product add / LIFO delete tests against the database

use pickup_common::Error;
use serial_test::serial;

use crate::common::TestApp;

#[tokio::test]
#[serial]
async fn test_products_are_deleted_last_in_first_out() {
    let app = TestApp::new().await.unwrap();
    let pvz = app.create_pvz().await;
    app.pvz.create_reception(pvz.id, None).await.unwrap();

    let mut added = Vec::new();
    for product_type in ["electronics", "clothes", "shoes"] {
        added.push(app.pvz.add_product(pvz.id, product_type).await.unwrap());
    }

    for expected in added.iter().rev() {
        let deleted = app.pvz.delete_last_product(pvz.id).await.unwrap();
        assert_eq!(deleted.id, expected.id);
    }

    let err = app.pvz.delete_last_product(pvz.id).await.unwrap_err();
    assert!(matches!(err, Error::NoProductsToDelete));
    assert_eq!(app.count("products").await, 0);
}

#[tokio::test]
#[serial]
async fn test_product_type_is_stored_canonically() {
    let app = TestApp::new().await.unwrap();
    let pvz = app.create_pvz().await;
    app.pvz.create_reception(pvz.id, None).await.unwrap();
    let before = app.counter("products_added_total");

    let product = app.pvz.add_product(pvz.id, "ELECTRONICS").await.unwrap();
    assert_eq!(product.product_type, "electronics");
    assert_eq!(app.counter("products_added_total") - before, 1.0);
}

#[tokio::test]
#[serial]
async fn test_invalid_type_creates_no_row() {
    let app = TestApp::new().await.unwrap();
    let pvz = app.create_pvz().await;
    app.pvz.create_reception(pvz.id, None).await.unwrap();

    let err = app.pvz.add_product(pvz.id, "furniture").await.unwrap_err();
    assert_eq!(err.error_code(), "INVALID_PRODUCT_TYPE");
    assert_eq!(app.count("products").await, 0);
}

#[tokio::test]
#[serial]
async fn test_add_product_requires_open_reception() {
    let app = TestApp::new().await.unwrap();
    let pvz = app.create_pvz().await;

    let err = app.pvz.add_product(pvz.id, "shoes").await.unwrap_err();
    assert!(matches!(err, Error::NoOpenReception));

    app.pvz.create_reception(pvz.id, None).await.unwrap();
    app.pvz.add_product(pvz.id, "shoes").await.unwrap();
    app.pvz.close_reception(pvz.id).await.unwrap();

    let err = app.pvz.add_product(pvz.id, "shoes").await.unwrap_err();
    assert!(matches!(err, Error::NoOpenReception));
    assert_eq!(app.count("products").await, 1);
}

#[tokio::test]
#[serial]
async fn test_closed_reception_products_cannot_be_deleted() {
    let app = TestApp::new().await.unwrap();
    let pvz = app.create_pvz().await;
    app.pvz.create_reception(pvz.id, None).await.unwrap();
    app.pvz.add_product(pvz.id, "clothes").await.unwrap();
    app.pvz.close_reception(pvz.id).await.unwrap();

    let err = app.pvz.delete_last_product(pvz.id).await.unwrap_err();
    assert!(matches!(err, Error::NoProductsToDelete));
    assert_eq!(app.count("products").await, 1);
}

#[tokio::test]
#[serial]
async fn test_concurrent_adds_are_all_recorded() {
    let app = TestApp::new().await.unwrap();
    let pvz = app.create_pvz().await;
    app.pvz.create_reception(pvz.id, None).await.unwrap();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let service = app.pvz.clone();
            tokio::spawn(async move { service.add_product(pvz.id, "shoes").await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(app.count("products").await, 10);
}
