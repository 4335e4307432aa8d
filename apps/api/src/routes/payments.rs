//! # Payment Routes
//!
//! Payment verification. The check itself is deterministic and local;
//! this handler only relays the request and the verdict.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;
use soko_core::{Payment, PaymentRequest};

/// `POST /payments/verify` - verify a payment against an order and record
/// the outcome.
pub async fn verify_payment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<Payment>, ApiError> {
    debug!(
        order_id = %request.order_id,
        amount_cents = request.amount_cents,
        method = %request.method,
        "verify_payment request"
    );

    let payment = state.db.payments().verify(&request).await?;
    Ok(Json(payment))
}
