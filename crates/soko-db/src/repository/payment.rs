//! # Payment Repository
//!
//! Payment verification and the payment audit trail.
//!
//! Verification here is a deterministic local check against the order's
//! frozen total - there is no gateway round-trip. What matters is the
//! bookkeeping: a `completed` payment exists if and only if an attempt
//! matched the total exactly, and an order can never complete twice.
//!
//! ## Verification Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  verify(order_id, amount, method)                                   │
//! │                                                                     │
//! │  validate amount > 0, method ∈ {paypal, stripe, mpesa}              │
//! │       │                                                             │
//! │  BEGIN                                                              │
//! │       ├── load order ───────────── absent? → NotFound               │
//! │       ├── completed payment already? → AlreadyPaid                  │
//! │       ├── amount ≠ total? → record FAILED attempt, → AmountMismatch │
//! │       └── amount = total? → record COMPLETED payment                │
//! │  COMMIT                                                             │
//! │                                                                     │
//! │  Failed attempts are committed on purpose: they are the audit       │
//! │  trail. The error still reaches the caller.                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::sqlite::SqliteConnection;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::new_entity_id;
use soko_core::validation;
use soko_core::{CoreError, Order, Payment, PaymentRequest, PaymentStatus};

/// Columns fetched for every payment read; keep in sync with the struct.
const PAYMENT_COLUMNS: &str = "id, order_id, method, amount_cents, status, created_at";

/// Repository for payment database operations.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    /// Creates a new PaymentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PaymentRepository { pool }
    }

    /// Verifies a payment against an order and records the outcome.
    ///
    /// On an exact match the returned payment is `completed`. A mismatch
    /// is recorded as a `failed` attempt for auditability and surfaces as
    /// `AmountMismatch`. Retries after failures are allowed; once a
    /// `completed` payment exists, any further attempt is `AlreadyPaid`
    /// (a partial unique index backs this up at the schema level, so even
    /// two racing verifications cannot both complete).
    ///
    /// ## Failures
    /// * `InvalidInput` - non-positive amount, unknown method
    /// * `NotFound` - no such order
    /// * `AmountMismatch` - amount differs from the frozen total
    /// * `AlreadyPaid` - the order already completed a payment
    pub async fn verify(&self, request: &PaymentRequest) -> DbResult<Payment> {
        let method = validation::validate_payment_method(&request.method)
            .map_err(CoreError::from)?;
        validation::validate_payment_amount(request.amount_cents).map_err(CoreError::from)?;

        debug!(
            order_id = %request.order_id,
            amount_cents = request.amount_cents,
            method = %method,
            "Verifying payment"
        );

        let mut tx = self.pool.begin().await?;

        let order: Option<Order> = sqlx::query_as(
            "SELECT id, product_id, quantity, unit_price_cents, total_cents, created_at \
             FROM orders WHERE id = ?1",
        )
        .bind(&request.order_id)
        .fetch_optional(&mut *tx)
        .await?;

        let order =
            order.ok_or_else(|| CoreError::OrderNotFound(request.order_id.clone()))?;

        let completed: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM payments WHERE order_id = ?1 AND status = 'completed'",
        )
        .bind(&order.id)
        .fetch_one(&mut *tx)
        .await?;

        if completed > 0 {
            return Err(CoreError::AlreadyPaid(order.id).into());
        }

        let now = Utc::now();

        if request.amount_cents != order.total_cents {
            let failed = Payment {
                id: new_entity_id(),
                order_id: order.id.clone(),
                method,
                amount_cents: request.amount_cents,
                status: PaymentStatus::Failed,
                created_at: now,
            };
            insert_payment(&mut tx, &failed).await?;
            tx.commit().await?;

            warn!(
                order_id = %order.id,
                expected_cents = order.total_cents,
                paid_cents = request.amount_cents,
                "Payment amount mismatch, failed attempt recorded"
            );
            return Err(CoreError::AmountMismatch {
                order_id: order.id,
                expected_cents: order.total_cents,
                paid_cents: request.amount_cents,
            }
            .into());
        }

        let payment = Payment {
            id: new_entity_id(),
            order_id: order.id.clone(),
            method,
            amount_cents: request.amount_cents,
            status: PaymentStatus::Completed,
            created_at: now,
        };

        // The partial unique index on completed payments catches the race
        // where two verifications pass the COUNT check on the same order.
        if let Err(err) = insert_payment(&mut tx, &payment).await {
            return Err(match err {
                DbError::UniqueViolation { .. } => CoreError::AlreadyPaid(order.id).into(),
                other => other,
            });
        }
        tx.commit().await?;

        info!(
            id = %payment.id,
            order_id = %payment.order_id,
            amount = %payment.amount(),
            method = %payment.method,
            "Payment completed"
        );
        Ok(payment)
    }

    /// Gets a payment by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Payment>> {
        let query = format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = ?1");
        let payment: Option<Payment> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(payment)
    }

    /// Lists all payment attempts for an order, oldest first.
    pub async fn list_by_order(&self, order_id: &str) -> DbResult<Vec<Payment>> {
        let query = format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE order_id = ?1 \
             ORDER BY created_at ASC, id ASC"
        );
        let payments: Vec<Payment> = sqlx::query_as(&query)
            .bind(order_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(payments)
    }
}

/// Inserts a payment row on the given connection.
async fn insert_payment(conn: &mut SqliteConnection, payment: &Payment) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO payments (
            id, order_id, method, amount_cents, status, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&payment.id)
    .bind(&payment.order_id)
    .bind(payment.method)
    .bind(payment.amount_cents)
    .bind(payment.status)
    .bind(payment.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
