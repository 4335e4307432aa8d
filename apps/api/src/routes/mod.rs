//! # HTTP Routes
//!
//! Route registration and the health endpoint. Handlers live in the
//! sibling modules, one per aggregate.

pub mod orders;
pub mod payments;
pub mod products;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Builds the application router with all routes registered.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/products",
            post(products::create_product).get(products::list_products),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/products/{id}/mark-sold", patch(products::mark_product_sold))
        .route("/orders", post(orders::create_order).get(orders::list_orders))
        .route("/orders/{id}", get(orders::get_order))
        .route("/payments/verify", post(payments::verify_payment))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
}

/// Liveness probe: reports whether the database answers queries.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database = if state.db.health_check().await {
        "ok"
    } else {
        "unavailable"
    };

    Json(HealthResponse {
        status: "ok",
        database,
    })
}
