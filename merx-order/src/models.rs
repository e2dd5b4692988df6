use chrono::{DateTime, Utc};
use merx_customer::Customer;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One requested line of an order: which product and how many.
/// Transient input, never persisted directly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderLineRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// A persisted order line. `price_cents` is the catalog price captured at
/// the moment the order was placed, so later catalog changes do not touch
/// existing orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderLineItem {
    pub product_id: Uuid,
    pub quantity: i32,
    pub price_cents: i64,
}

/// A placed order: the customer it belongs to and its line items, in the
/// order they were requested. Orders are written once and never updated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    pub id: Uuid,
    pub customer: Customer,
    pub items: Vec<OrderLineItem>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(customer: Customer, items: Vec<OrderLineItem>) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer,
            items,
            created_at: Utc::now(),
        }
    }

    /// Sum of quantity x snapshotted price over all lines.
    pub fn total_cents(&self) -> i64 {
        self.items
            .iter()
            .map(|item| item.price_cents * i64::from(item.quantity))
            .sum()
    }
}
