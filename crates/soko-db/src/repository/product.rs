//! # Product Repository
//!
//! Database operations for products: lifecycle CRUD plus the atomic
//! stock-reservation primitive that order placement is built on.
//!
//! ## The Reservation Primitive
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │              Why reserve_stock is a single UPDATE                   │
//! │                                                                     │
//! │  ❌ WRONG: check-then-act as separate statements                    │
//! │     SELECT quantity FROM products WHERE id = ?   (reads 1)          │
//! │     -- another writer sells the last unit here --                   │
//! │     UPDATE products SET quantity = 0 WHERE id = ? (oversold!)       │
//! │                                                                     │
//! │  ✅ CORRECT: the check is part of the write                         │
//! │     UPDATE products                                                 │
//! │     SET    quantity = quantity - ?,                                 │
//! │            status   = CASE WHEN quantity - ? = 0                    │
//! │                       THEN 'sold' ELSE 'available' END              │
//! │     WHERE  id = ? AND status = 'available' AND quantity >= ?        │
//! │                                                                     │
//! │  Zero rows affected means the reservation did not happen, and a     │
//! │  follow-up read inside the same transaction tells the caller why.   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::sqlite::SqliteConnection;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use crate::repository::new_entity_id;
use soko_core::validation;
use soko_core::{CoreError, Product, ProductCreate, ProductStatus, ProductUpdate};

/// Columns fetched for every product read; keep in sync with the struct.
const PRODUCT_COLUMNS: &str =
    "id, name, description, price_cents, quantity, status, created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let product = repo.create(&input).await?;
/// let restocked = repo.update(&product.id, &update).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Creates a new product.
    ///
    /// ## Rules
    /// - name non-empty, price positive, initial quantity at least 1
    /// - status derives from the initial quantity (always `available`
    ///   here, since quantity >= 1)
    pub async fn create(&self, input: &ProductCreate) -> DbResult<Product> {
        validation::validate_product_create(input).map_err(CoreError::from)?;

        let now = Utc::now();
        let product = Product {
            id: new_entity_id(),
            name: input.name.trim().to_string(),
            description: input.description.clone(),
            price_cents: input.price_cents,
            quantity: input.quantity,
            status: ProductStatus::for_quantity(input.quantity),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, price_cents, quantity, status,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.quantity)
        .bind(product.status)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        info!(id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product: Option<Product> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Lists all products, newest first.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let query =
            format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC, id DESC");
        let products: Vec<Product> = sqlx::query_as(&query).fetch_all(&self.pool).await?;

        Ok(products)
    }

    /// Overwrites a product's mutable fields.
    ///
    /// Status is re-derived from the new quantity: setting 0 marks the
    /// product sold, and restocking a sold-out product (including one
    /// explicitly marked sold) makes it purchasable again.
    pub async fn update(&self, id: &str, input: &ProductUpdate) -> DbResult<Product> {
        validation::validate_product_update(input).map_err(CoreError::from)?;

        let status = ProductStatus::for_quantity(input.quantity);
        let now = Utc::now();

        debug!(id = %id, quantity = input.quantity, status = ?status, "Updating product");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                price_cents = ?4,
                quantity = ?5,
                status = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(input.price_cents)
        .bind(input.quantity)
        .bind(status)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::ProductNotFound(id.to_string()).into());
        }

        let product = fetch_product(&mut tx, id).await?;
        tx.commit().await?;

        Ok(product)
    }

    /// Forces a product's status to `sold`, regardless of stock.
    ///
    /// ## Failures
    /// * `NotFound` - no such product
    /// * `AlreadySold` - the product is already sold
    pub async fn mark_sold(&self, id: &str) -> DbResult<Product> {
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE products SET
                status = 'sold',
                updated_at = ?2
            WHERE id = ?1 AND status != 'sold'
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
            let existing: Option<Product> = sqlx::query_as(&query)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

            return Err(match existing {
                None => CoreError::ProductNotFound(id.to_string()).into(),
                Some(_) => CoreError::AlreadySold(id.to_string()).into(),
            });
        }

        let product = fetch_product(&mut tx, id).await?;
        tx.commit().await?;

        info!(id = %id, "Product marked sold");
        Ok(product)
    }

    /// Deletes a product.
    ///
    /// Its orders and their payments go with it (`ON DELETE CASCADE`); an
    /// order has no meaning without its product.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::ProductNotFound(id.to_string()).into());
        }

        info!(id = %id, "Product deleted (orders and payments cascaded)");
        Ok(())
    }

    /// Atomically reserves stock for an order.
    ///
    /// This is the one primitive order placement is allowed to decrement
    /// stock through. It runs on the caller's transaction connection so
    /// the reservation and the order insert commit or roll back together.
    ///
    /// The guarded `UPDATE` is the whole trick: the availability check and
    /// the decrement are a single statement, so two concurrent calls can
    /// never both take the last unit. When the decrement drains the stock,
    /// the same statement flips the status to `sold`.
    ///
    /// ## Failures
    /// * `InvalidInput` (via validation) - requested quantity < 1
    /// * `NotFound` - no such product
    /// * `ProductSold` - the product is sold out / withdrawn
    /// * `InsufficientStock` - fewer units available than requested
    pub async fn reserve_stock(
        conn: &mut SqliteConnection,
        id: &str,
        requested: i64,
    ) -> DbResult<Product> {
        validation::validate_order_quantity(requested).map_err(CoreError::from)?;

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                quantity = quantity - ?2,
                status = CASE WHEN quantity - ?2 = 0 THEN 'sold' ELSE 'available' END,
                updated_at = ?3
            WHERE id = ?1 AND status = 'available' AND quantity >= ?2
            "#,
        )
        .bind(id)
        .bind(requested)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            // The reservation did not happen. Read the row in the same
            // transaction to report why.
            let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
            let existing: Option<Product> = sqlx::query_as(&query)
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;

            return Err(match existing {
                None => CoreError::ProductNotFound(id.to_string()).into(),
                Some(p) if p.is_sold() => CoreError::ProductSold(id.to_string()).into(),
                Some(p) => CoreError::InsufficientStock {
                    product_id: id.to_string(),
                    available: p.quantity,
                    requested,
                }
                .into(),
            });
        }

        let product = fetch_product(conn, id).await?;

        debug!(
            id = %id,
            reserved = requested,
            remaining = product.quantity,
            "Stock reserved"
        );
        Ok(product)
    }
}

/// Fetches a product that is known to exist on this connection.
async fn fetch_product(conn: &mut SqliteConnection, id: &str) -> DbResult<Product> {
    let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
    let product: Product = sqlx::query_as(&query).bind(id).fetch_one(&mut *conn).await?;
    Ok(product)
}
