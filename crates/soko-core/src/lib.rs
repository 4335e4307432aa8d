//! # soko-core: Pure Business Logic for Soko
//!
//! This crate is the **heart** of Soko. It contains the business rules of
//! the inventory / order / payment engine as pure functions and types with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Soko Architecture                           │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (apps/api)                      │   │
//! │  │   /products ──► /orders ──► /payments/verify                │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │                                     │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │               ★ soko-core (THIS CRATE) ★                    │   │
//! │  │                                                             │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────────────────┐  │   │
//! │  │   │   types   │  │   money   │  │      validation       │  │   │
//! │  │   │  Product  │  │   Money   │  │   rules and checks    │  │   │
//! │  │   │   Order   │  │  (cents)  │  │                       │  │   │
//! │  │   │  Payment  │  └───────────┘  └───────────────────────┘  │   │
//! │  │   └───────────┘                                             │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │                                     │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │                  soko-db (Database Layer)                   │   │
//! │  │        SQLite queries, migrations, repositories             │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, Payment, enums, inputs)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use soko_core::Money` instead of
// `use soko_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity accepted for a single order.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
/// Can be made configurable in future versions.
pub const MAX_ORDER_QUANTITY: i64 = 999;

/// Maximum length of a product name.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length of a product description.
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;
