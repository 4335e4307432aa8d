//! # Soko API
//!
//! HTTP server exposing the inventory / order / payment engine.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Soko API Routes                             │
//! │                                                                     │
//! │  Products                           Orders                          │
//! │  ├── POST   /products               ├── POST /orders                │
//! │  ├── GET    /products               ├── GET  /orders                │
//! │  ├── GET    /products/{id}          └── GET  /orders/{id}           │
//! │  ├── PUT    /products/{id}                                          │
//! │  ├── PATCH  /products/{id}/mark-sold                                │
//! │  └── DELETE /products/{id}          Payments                        │
//! │                                     └── POST /payments/verify       │
//! │  Diagnostics                                                        │
//! │  └── GET    /health                                                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (a local `.env` file is honored):
//! - `DATABASE_PATH` - SQLite database file (default: ./soko.db)
//! - `HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Bind port (default: 8000)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `RUST_LOG` - Tracing filter (default: info)

pub mod config;
pub mod error;
pub mod routes;

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ErrorCode};

use soko_db::Database;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}
