use async_trait::async_trait;
use uuid::Uuid;

use merx_catalog::{NewProduct, Product, QuantityUpdate};
use merx_customer::{Customer, NewCustomer};
use merx_order::{Order, OrderLineItem};

pub type RepoResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Repository trait for customer data access
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn create_customer(&self, customer: &NewCustomer) -> RepoResult<Customer>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Customer>>;

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Customer>>;
}

/// Repository trait for product catalog access
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create_product(&self, product: &NewProduct) -> RepoResult<Product>;

    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Product>>;

    /// Batch fetch by id. Ids with no matching product are silently absent
    /// from the result; callers decide whether that is an error.
    async fn find_all_by_id(&self, ids: &[Uuid]) -> RepoResult<Vec<Product>>;

    /// Replace the stock level of each listed product with the given value,
    /// as one batch write, and return the updated records. Fails if an
    /// update targets an id that no longer exists in the catalog.
    async fn update_quantity(&self, updates: &[QuantityUpdate]) -> RepoResult<Vec<Product>>;
}

/// Repository trait for order data access
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a new order for `customer` with the given line items and
    /// return the stored order (id and timestamps assigned).
    async fn create_order(
        &self,
        customer: &Customer,
        items: &[OrderLineItem],
    ) -> RepoResult<Order>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Order>>;
}
