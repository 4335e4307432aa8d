//! Concurrency stress test for order placement.
//!
//! The defining hazard of this engine is the check-then-act race on a
//! product's stock: two order placements racing for the last unit must
//! not both succeed. These tests hammer a single product from many tasks
//! and assert that exactly the available stock gets sold, never more.

use soko_core::{CoreError, OrderCreate, ProductCreate, ProductStatus};
use soko_db::{Database, DbConfig, DbError};
use tempfile::TempDir;

const STOCK: i64 = 5;
const TASKS: usize = 32;

async fn test_db(max_connections: u32) -> (TempDir, Database) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let config = DbConfig::new(dir.path().join("soko-stress.db")).max_connections(max_connections);
    let db = Database::new(config).await.expect("failed to open database");
    (dir, db)
}

async fn create_product(db: &Database, name: &str, quantity: i64) -> String {
    db.products()
        .create(&ProductCreate {
            name: name.to_string(),
            description: None,
            price_cents: 2000,
            quantity,
        })
        .await
        .expect("failed to create product")
        .id
}

/// Places one order, retrying a bounded number of times if the writer
/// lock timed out. Busy is the one transient error; anything else is a
/// final verdict.
async fn place_one(db: Database, product_id: String) -> Result<(), DbError> {
    let mut attempts = 0;
    loop {
        match db
            .orders()
            .place_order(&OrderCreate {
                product_id: product_id.clone(),
                quantity: 1,
            })
            .await
        {
            Err(err) if err.is_retryable() && attempts < 20 => {
                attempts += 1;
                continue;
            }
            Err(err) => return Err(err),
            Ok(_) => return Ok(()),
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_orders_never_oversell() {
    let (_dir, db) = test_db(8).await;
    let product_id = create_product(&db, "Contested Shirt", STOCK).await;

    let mut handles = Vec::with_capacity(TASKS);
    for _ in 0..TASKS {
        handles.push(tokio::spawn(place_one(db.clone(), product_id.clone())));
    }

    let mut successes = 0usize;
    let mut rejections = 0usize;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(()) => successes += 1,
            Err(err) => {
                // Losers must be told the stock ran out, nothing else.
                assert!(
                    matches!(
                        err,
                        DbError::Domain(
                            CoreError::ProductSold(_) | CoreError::InsufficientStock { .. }
                        )
                    ),
                    "unexpected rejection: {err}"
                );
                rejections += 1;
            }
        }
    }

    // Exactly the available stock was sold.
    assert_eq!(successes, STOCK as usize);
    assert_eq!(rejections, TASKS - STOCK as usize);

    let product = db.products().get_by_id(&product_id).await.unwrap().unwrap();
    assert_eq!(product.quantity, 0);
    assert_eq!(product.status, ProductStatus::Sold);

    // One order row per successful reservation, no orphans.
    let orders = db.orders().list().await.unwrap();
    assert_eq!(orders.len(), STOCK as usize);
    assert!(orders.iter().all(|o| o.product_id == product_id));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn two_racers_for_the_last_unit() {
    let (_dir, db) = test_db(4).await;
    let product_id = create_product(&db, "Last Shirt", 1).await;

    let a = tokio::spawn(place_one(db.clone(), product_id.clone()));
    let b = tokio::spawn(place_one(db.clone(), product_id.clone()));

    let results = [a.await.unwrap(), b.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();

    assert_eq!(successes, 1, "exactly one racer may take the last unit");

    let product = db.products().get_by_id(&product_id).await.unwrap().unwrap();
    assert_eq!(product.quantity, 0);
    assert_eq!(product.status, ProductStatus::Sold);
    assert_eq!(db.orders().list().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn orders_on_different_products_are_independent() {
    let (_dir, db) = test_db(8).await;

    let mut product_ids = Vec::new();
    for i in 0..4 {
        product_ids.push(create_product(&db, &format!("Item {i}"), 1).await);
    }

    let mut handles = Vec::new();
    for id in &product_ids {
        handles.push(tokio::spawn(place_one(db.clone(), id.clone())));
    }

    for handle in handles {
        handle
            .await
            .expect("task panicked")
            .expect("independent orders must all succeed");
    }

    for id in &product_ids {
        let product = db.products().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(product.quantity, 0);
        assert_eq!(product.status, ProductStatus::Sold);
    }
}
