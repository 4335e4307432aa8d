//! # soko-db: Database Layer for Soko
//!
//! This crate provides database access for the Soko engine. It uses SQLite
//! for storage with sqlx for async operations, and it is the only place
//! where state is mutated.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Soko Data Flow                              │
//! │                                                                     │
//! │  HTTP handler (POST /orders)                                        │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                    soko-db (THIS CRATE)                     │   │
//! │  │                                                             │   │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌─────────────┐  │   │
//! │  │   │   Database    │   │  Repositories │   │  Migrations │  │   │
//! │  │   │   (pool.rs)   │   │ (repository/) │   │  (embedded) │  │   │
//! │  │   │               │   │               │   │             │  │   │
//! │  │   │ SqlitePool    │◄──│ ProductRepo   │   │ 001_init…   │  │   │
//! │  │   │ WAL + FK on   │   │ OrderRepo     │   │             │  │   │
//! │  │   │               │   │ PaymentRepo   │   │             │  │   │
//! │  │   └───────────────┘   └───────────────┘   └─────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database file                                               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The one rule that matters
//!
//! Every multi-record state change (reserve stock + insert order, read
//! order + record payment) runs inside a single sqlx transaction, and the
//! stock reservation itself is a single conditional `UPDATE`. There is no
//! code path that reads a quantity, computes in Rust, and writes the
//! result back as a separate statement.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, order, payment)

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::order::OrderRepository;
pub use repository::payment::PaymentRepository;
pub use repository::product::ProductRepository;
