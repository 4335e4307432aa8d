//! # Product Routes
//!
//! Product lifecycle handlers. Validation and status derivation happen in
//! the repositories; these handlers only translate HTTP to repository
//! calls and errors back to statuses.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;
use soko_core::{Product, ProductCreate, ProductUpdate};

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: String,
}

/// `POST /products` - create a product.
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ProductCreate>,
) -> Result<Json<Product>, ApiError> {
    debug!(name = %input.name, "create_product request");

    let product = state.db.products().create(&input).await?;
    Ok(Json(product))
}

/// `GET /products` - list all products.
pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.db.products().list().await?;
    Ok(Json(products))
}

/// `GET /products/{id}` - fetch one product.
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id))?;

    Ok(Json(product))
}

/// `PUT /products/{id}` - overwrite a product's fields.
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<ProductUpdate>,
) -> Result<Json<Product>, ApiError> {
    debug!(id = %id, "update_product request");

    let product = state.db.products().update(&id, &input).await?;
    Ok(Json(product))
}

/// `PATCH /products/{id}/mark-sold` - withdraw a product from sale.
pub async fn mark_product_sold(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    debug!(id = %id, "mark_product_sold request");

    let product = state.db.products().mark_sold(&id).await?;
    Ok(Json(product))
}

/// `DELETE /products/{id}` - delete a product and everything it owns.
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    debug!(id = %id, "delete_product request");

    state.db.products().delete(&id).await?;
    Ok(Json(DeleteResponse { deleted: true, id }))
}
