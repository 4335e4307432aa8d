//! # Repository Module
//!
//! Database repository implementations for Soko.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   Repository Pattern Explained                      │
//! │                                                                     │
//! │  The Repository pattern abstracts database access behind a clean    │
//! │  API, and here it also owns the transactional units of work.        │
//! │                                                                     │
//! │  HTTP handler                                                       │
//! │       │                                                             │
//! │       │  db.orders().place_order(&input)                            │
//! │       ▼                                                             │
//! │  OrderRepository                                                    │
//! │  ├── BEGIN                                                          │
//! │  ├── ProductRepository::reserve_stock(tx, …)  ← conditional UPDATE  │
//! │  ├── INSERT INTO orders …                                           │
//! │  └── COMMIT                                                         │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite Database                                                    │
//! │                                                                     │
//! │  Benefits:                                                          │
//! │  • SQL is isolated in one place                                     │
//! │  • Multi-record changes are atomic by construction                  │
//! │  • Easy to exercise in integration tests                            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product lifecycle and the stock
//!   reservation primitive
//! - [`order::OrderRepository`] - Atomic order placement and lookup
//! - [`payment::PaymentRepository`] - Payment verification and audit trail

pub mod order;
pub mod payment;
pub mod product;

use uuid::Uuid;

/// Generates a fresh entity ID.
///
/// UUID v4 strings everywhere: products, orders and payments share the
/// same identifier scheme.
pub fn new_entity_id() -> String {
    Uuid::new_v4().to_string()
}
