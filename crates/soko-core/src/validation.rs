//! # Validation Module
//!
//! Input validation for the inventory / order / payment engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Validation Layers                             │
//! │                                                                     │
//! │  Layer 1: HTTP boundary (apps/api)                                  │
//! │  ├── Shape validation (deserialization)                             │
//! │  └── Path/query parameter checks                                    │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: Repositories (soko-db)                                    │
//! │  └── THIS MODULE: business rule validation before any write         │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  ├── CHECK constraints (price > 0, quantity >= 0)                   │
//! │  ├── UNIQUE constraints (one completed payment per order)           │
//! │  └── Foreign key constraints                                        │
//! │                                                                     │
//! │  Multiple layers catch different errors                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::{PaymentMethod, ProductCreate, ProductUpdate};
use crate::{MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, MAX_ORDER_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 200 characters
///
/// ## Example
/// ```rust
/// use soko_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Kitenge Shirt").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates an optional product description.
pub fn validate_description(description: Option<&str>) -> ValidationResult<()> {
    if let Some(text) = description {
        if text.len() > MAX_DESCRIPTION_LENGTH {
            return Err(ValidationError::TooLong {
                field: "description".to_string(),
                max: MAX_DESCRIPTION_LENGTH,
            });
        }
    }

    Ok(())
}

/// Validates a product price in cents.
///
/// ## Rules
/// - Must be strictly positive; free items are not sellable inventory
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price_cents".to_string(),
        });
    }

    Ok(())
}

/// Validates the initial stock level of a new product.
///
/// ## Rules
/// - Must be at least 1; a product is created because there is something
///   to sell
pub fn validate_initial_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 1 {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock level on update.
///
/// ## Rules
/// - Must be non-negative; setting 0 is allowed and marks the product sold
pub fn validate_stock_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates an order quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ORDER_QUANTITY (999)
pub fn validate_order_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_ORDER_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ORDER_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a payment amount in cents.
///
/// ## Rules
/// - Must be positive (> 0); zero or negative amounts are never a valid
///   tender
pub fn validate_payment_amount(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount_cents".to_string(),
        });
    }

    Ok(())
}

/// Validates and parses a payment method name.
///
/// ## Example
/// ```rust
/// use soko_core::validation::validate_payment_method;
/// use soko_core::PaymentMethod;
///
/// assert_eq!(validate_payment_method("mpesa").unwrap(), PaymentMethod::Mpesa);
/// assert!(validate_payment_method("bitcoin").is_err());
/// ```
pub fn validate_payment_method(method: &str) -> ValidationResult<PaymentMethod> {
    PaymentMethod::from_str(method).map_err(|_| ValidationError::NotAllowed {
        field: "method".to_string(),
        allowed: PaymentMethod::ALL.iter().map(|m| m.to_string()).collect(),
    })
}

/// Validates a UUID string format.
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates every field of a product creation request.
pub fn validate_product_create(input: &ProductCreate) -> ValidationResult<()> {
    validate_product_name(&input.name)?;
    validate_description(input.description.as_deref())?;
    validate_price_cents(input.price_cents)?;
    validate_initial_quantity(input.quantity)?;
    Ok(())
}

/// Validates every field of a product update request.
///
/// Same constraints as creation, except quantity may be set to 0 - the
/// update path is how a product is restocked or drained, and a zero stock
/// level simply re-derives the sold status.
pub fn validate_product_update(input: &ProductUpdate) -> ValidationResult<()> {
    validate_product_name(&input.name)?;
    validate_description(input.description.as_deref())?;
    validate_price_cents(input.price_cents)?;
    validate_stock_quantity(input.quantity)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
