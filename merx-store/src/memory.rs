//! In-memory repositories backed by HashMaps. Used by the integration tests
//! and handy for running the API without a database.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use merx_catalog::{NewProduct, Product, ProductError, QuantityUpdate};
use merx_core::repository::{
    CustomerRepository, OrderRepository, ProductRepository, RepoResult,
};
use merx_customer::{Customer, NewCustomer};
use merx_order::{Order, OrderLineItem};

#[derive(Default)]
pub struct MemoryCustomerRepository {
    customers: RwLock<HashMap<Uuid, Customer>>,
}

impl MemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerRepository for MemoryCustomerRepository {
    async fn create_customer(&self, customer: &NewCustomer) -> RepoResult<Customer> {
        let created = Customer::new(customer.name.clone(), customer.email.clone());
        self.customers
            .write()
            .await
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Customer>> {
        Ok(self.customers.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Customer>> {
        Ok(self
            .customers
            .read()
            .await
            .values()
            .find(|customer| customer.email == email)
            .cloned())
    }
}

#[derive(Default)]
pub struct MemoryProductRepository {
    products: RwLock<HashMap<Uuid, Product>>,
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn create_product(&self, product: &NewProduct) -> RepoResult<Product> {
        let created = Product::new(product.name.clone(), product.price_cents, product.quantity);
        self.products
            .write()
            .await
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Product>> {
        Ok(self
            .products
            .read()
            .await
            .values()
            .find(|product| product.name == name)
            .cloned())
    }

    async fn find_all_by_id(&self, ids: &[Uuid]) -> RepoResult<Vec<Product>> {
        let products = self.products.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| products.get(id).cloned())
            .collect())
    }

    async fn update_quantity(&self, updates: &[QuantityUpdate]) -> RepoResult<Vec<Product>> {
        let mut products = self.products.write().await;

        for update in updates {
            if !products.contains_key(&update.id) {
                return Err(Box::new(ProductError::NotFound(update.id.to_string())));
            }
        }

        let mut updated = Vec::with_capacity(updates.len());
        for update in updates {
            let product = products
                .get_mut(&update.id)
                .ok_or_else(|| ProductError::NotFound(update.id.to_string()))?;
            product.quantity = update.quantity;
            product.updated_at = chrono::Utc::now();
            updated.push(product.clone());
        }

        Ok(updated)
    }
}

#[derive(Default)]
pub struct MemoryOrderRepository {
    orders: RwLock<HashMap<Uuid, Order>>,
}

impl MemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn create_order(
        &self,
        customer: &Customer,
        items: &[OrderLineItem],
    ) -> RepoResult<Order> {
        let order = Order::new(customer.clone(), items.to_vec());
        self.orders.write().await.insert(order.id, order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Order>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }
}
