//! # Order Repository
//!
//! Atomic order placement and order lookup.
//!
//! ## Order Placement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     place_order, step by step                       │
//! │                                                                     │
//! │  BEGIN                                                              │
//! │    │                                                                │
//! │    ├── reserve_stock(product_id, qty)   guarded UPDATE on products  │
//! │    │       │                                                        │
//! │    │       └── returns the product row read in the same step,       │
//! │    │           so the price used for the total cannot drift         │
//! │    │                                                                │
//! │    ├── INSERT INTO orders (…, unit_price, total = price × qty)      │
//! │    │                                                                │
//! │  COMMIT                                                             │
//! │                                                                     │
//! │  Any failure before COMMIT rolls back both writes: there is no      │
//! │  state where stock is decremented but no order exists, or an order  │
//! │  exists whose stock was never reserved.                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use crate::repository::new_entity_id;
use crate::repository::product::ProductRepository;
use soko_core::{Order, OrderCreate};

/// Columns fetched for every order read; keep in sync with the struct.
const ORDER_COLUMNS: &str = "id, product_id, quantity, unit_price_cents, total_cents, created_at";

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Places an order: reserves stock and records the order as one
    /// atomic unit.
    ///
    /// The total is frozen at placement: `quantity × unit price`, where
    /// the unit price comes from the very row version the reservation
    /// decremented. Later product edits never change an existing order.
    ///
    /// ## Failures
    /// Everything `reserve_stock` reports (`InvalidInput`, `NotFound`,
    /// `ProductSold`, `InsufficientStock`), plus `Busy` under write
    /// contention.
    pub async fn place_order(&self, input: &OrderCreate) -> DbResult<Order> {
        debug!(
            product_id = %input.product_id,
            quantity = input.quantity,
            "Placing order"
        );

        let mut tx = self.pool.begin().await?;

        let product =
            ProductRepository::reserve_stock(&mut tx, &input.product_id, input.quantity).await?;

        let order = Order {
            id: new_entity_id(),
            product_id: product.id.clone(),
            quantity: input.quantity,
            unit_price_cents: product.price_cents,
            total_cents: product.price().multiply_quantity(input.quantity).cents(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, product_id, quantity, unit_price_cents, total_cents,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&order.id)
        .bind(&order.product_id)
        .bind(order.quantity)
        .bind(order.unit_price_cents)
        .bind(order.total_cents)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            id = %order.id,
            product_id = %order.product_id,
            quantity = order.quantity,
            total = %order.total(),
            "Order placed"
        );
        Ok(order)
    }

    /// Gets an order by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Order))` - Order found
    /// * `Ok(None)` - Order not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1");
        let order: Option<Order> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// Lists all orders, newest first.
    ///
    /// Ordering is `created_at DESC` with `id DESC` as a deterministic
    /// tie-break for colliding timestamps.
    pub async fn list(&self) -> DbResult<Vec<Order>> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC");
        let orders: Vec<Order> = sqlx::query_as(&query).fetch_all(&self.pool).await?;

        Ok(orders)
    }
}
