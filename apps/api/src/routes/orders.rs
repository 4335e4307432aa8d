//! # Order Routes
//!
//! Order placement and lookup. Placement delegates to the atomic
//! reserve-and-insert unit in the order repository.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;
use soko_core::{Order, OrderCreate};

/// `POST /orders` - place an order.
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(input): Json<OrderCreate>,
) -> Result<Json<Order>, ApiError> {
    debug!(
        product_id = %input.product_id,
        quantity = input.quantity,
        "create_order request"
    );

    let order = state.db.orders().place_order(&input).await?;
    Ok(Json(order))
}

/// `GET /orders` - list all orders, newest first.
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let orders = state.db.orders().list().await?;
    Ok(Json(orders))
}

/// `GET /orders/{id}` - fetch one order.
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order = state
        .db
        .orders()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order", &id))?;

    Ok(Json(order))
}
