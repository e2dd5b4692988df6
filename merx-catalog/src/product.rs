use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog product with its current stock level.
///
/// Price is in the smallest currency unit (cents). `quantity` is the stock
/// currently available for ordering and is never negative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price_cents: i64,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(name: String, price_cents: i64, quantity: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            price_cents,
            quantity,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for registering a product in the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price_cents: i64,
    pub quantity: i32,
}

impl NewProduct {
    /// Creation rules: a product needs a name, a positive price and a
    /// non-negative opening stock.
    pub fn validate(&self) -> Result<(), ProductError> {
        if self.name.trim().is_empty() {
            return Err(ProductError::Invalid("name must not be empty".to_string()));
        }
        if self.price_cents <= 0 {
            return Err(ProductError::Invalid("price must be positive".to_string()));
        }
        if self.quantity < 0 {
            return Err(ProductError::Invalid(
                "quantity must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// A replacement stock level for one product. The new quantity is absolute:
/// callers compute the decrement themselves and the store writes the value
/// as given.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuantityUpdate {
    pub id: Uuid,
    pub quantity: i32,
}

/// Product-related errors
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Product already exists: {0}")]
    DuplicateName(String),

    #[error("Invalid product: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_product_passes() {
        let input = NewProduct {
            name: "Keyboard".to_string(),
            price_cents: 4500,
            quantity: 10,
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_price() {
        let input = NewProduct {
            name: "Keyboard".to_string(),
            price_cents: 0,
            quantity: 10,
        };
        assert!(matches!(input.validate(), Err(ProductError::Invalid(_))));
    }

    #[test]
    fn test_rejects_negative_quantity() {
        let input = NewProduct {
            name: "Keyboard".to_string(),
            price_cents: 100,
            quantity: -1,
        };
        assert!(matches!(input.validate(), Err(ProductError::Invalid(_))));
    }

    #[test]
    fn test_rejects_blank_name() {
        let input = NewProduct {
            name: "  ".to_string(),
            price_cents: 100,
            quantity: 1,
        };
        assert!(matches!(input.validate(), Err(ProductError::Invalid(_))));
    }
}
