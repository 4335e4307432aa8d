//! # Domain Types
//!
//! Core domain types used throughout Soko.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                               │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐   │
//! │  │    Product      │   │     Order       │   │    Payment      │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │   │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │   │
//! │  │  name           │   │  product_id(FK) │   │  order_id (FK)  │   │
//! │  │  price_cents    │   │  quantity       │   │  method         │   │
//! │  │  quantity       │   │  total_cents    │   │  amount_cents   │   │
//! │  │  status         │   │  (frozen)       │   │  status         │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘   │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐   │
//! │  │ ProductStatus   │   │ PaymentMethod   │   │ PaymentStatus   │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │   │
//! │  │  Available      │   │  Paypal         │   │  Pending        │   │
//! │  │  Sold           │   │  Stripe         │   │  Completed      │   │
//! │  └─────────────────┘   │  Mpesa          │   │  Failed         │   │
//! │                        └─────────────────┘   └─────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ownership runs strictly downward: a Product owns its Orders, an Order
//! owns its Payments. Deleting an owner cascades to its dependents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::money::Money;

// =============================================================================
// Product Status
// =============================================================================

/// Whether a product can currently be ordered.
///
/// Derived from stock on every quantity-changing operation: a product is
/// `Sold` exactly when its quantity reaches zero. The explicit mark-sold
/// operation is the one override that forces `Sold` with stock remaining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// In stock and orderable.
    Available,
    /// Out of stock (or explicitly withdrawn from sale).
    Sold,
}

impl ProductStatus {
    /// Derives the status implied by a stock level.
    #[inline]
    pub const fn for_quantity(quantity: i64) -> Self {
        if quantity == 0 {
            ProductStatus::Sold
        } else {
            ProductStatus::Available
        }
    }
}

impl Default for ProductStatus {
    fn default() -> Self {
        ProductStatus::Available
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Optional free-form description.
    pub description: Option<String>,

    /// Price in cents (smallest currency unit). Always positive.
    pub price_cents: i64,

    /// Units currently in stock. Never negative.
    pub quantity: i64,

    /// Orderability, kept in lockstep with `quantity` (see [`ProductStatus`]).
    pub status: ProductStatus,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether the product is marked sold.
    #[inline]
    pub fn is_sold(&self) -> bool {
        self.status == ProductStatus::Sold
    }
}

// =============================================================================
// Order
// =============================================================================

/// A placed order for a single product.
///
/// Uses the snapshot pattern: the unit price and total are frozen at
/// placement time and never recomputed, so later product edits do not
/// change what an order costs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    /// The product this order reserved stock from.
    pub product_id: String,
    /// Units reserved. At least 1.
    pub quantity: i64,
    /// Unit price in cents at time of placement (frozen).
    pub unit_price_cents: i64,
    /// Total in cents at time of placement (frozen): quantity × unit price.
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the frozen total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// Supported payment channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Paypal,
    Stripe,
    Mpesa,
}

impl PaymentMethod {
    /// All supported methods, for validation messages.
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Paypal,
        PaymentMethod::Stripe,
        PaymentMethod::Mpesa,
    ];

    /// The lowercase wire name of this method.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::Stripe => "stripe",
            PaymentMethod::Mpesa => "mpesa",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paypal" => Ok(PaymentMethod::Paypal),
            "stripe" => Ok(PaymentMethod::Stripe),
            "mpesa" => Ok(PaymentMethod::Mpesa),
            _ => Err(()),
        }
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// Outcome of a payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Recorded but not yet settled.
    Pending,
    /// Verified: amount matched the order total exactly.
    Completed,
    /// Rejected: kept for auditability.
    Failed,
}

// =============================================================================
// Payment
// =============================================================================

/// A payment attempt recorded against an order.
///
/// An order may accumulate several failed attempts, but at most one
/// payment can ever be `Completed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub method: PaymentMethod,
    /// Amount tendered in cents.
    pub amount_cents: i64,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Returns the tendered amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Operation Inputs
// =============================================================================

/// Fields accepted when creating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_cents: i64,
    pub quantity: i64,
}

/// Fields accepted when updating a product. This is a full overwrite of
/// the mutable fields; status is re-derived from the new quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_cents: i64,
    pub quantity: i64,
}

/// A request to place an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub product_id: String,
    pub quantity: i64,
}

/// A request to verify a payment against an order.
///
/// `method` arrives as a raw string from the boundary and is validated
/// against the supported set, so an unknown channel surfaces as an input
/// error rather than a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub order_id: String,
    pub amount_cents: i64,
    pub method: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_quantity() {
        assert_eq!(ProductStatus::for_quantity(0), ProductStatus::Sold);
        assert_eq!(ProductStatus::for_quantity(1), ProductStatus::Available);
        assert_eq!(ProductStatus::for_quantity(500), ProductStatus::Available);
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("paypal".parse(), Ok(PaymentMethod::Paypal));
        assert_eq!("Stripe".parse(), Ok(PaymentMethod::Stripe));
        assert_eq!(" mpesa ".parse(), Ok(PaymentMethod::Mpesa));
        assert_eq!("bitcoin".parse::<PaymentMethod>(), Err(()));
        assert_eq!("".parse::<PaymentMethod>(), Err(()));
    }

    #[test]
    fn test_payment_method_round_trip() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.as_str().parse(), Ok(method));
        }
    }

    #[test]
    fn test_order_money_helpers() {
        let order = Order {
            id: "o-1".to_string(),
            product_id: "p-1".to_string(),
            quantity: 3,
            unit_price_cents: 2000,
            total_cents: 6000,
            created_at: Utc::now(),
        };
        assert_eq!(order.unit_price().cents(), 2000);
        assert_eq!(order.total(), order.unit_price().multiply_quantity(3));
    }
}
