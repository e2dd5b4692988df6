use std::sync::Arc;

use merx_core::{CustomerRepository, OrderRepository, OrderService, ProductRepository};

#[derive(Clone)]
pub struct AppState {
    pub customer_repo: Arc<dyn CustomerRepository>,
    pub product_repo: Arc<dyn ProductRepository>,
    pub order_repo: Arc<dyn OrderRepository>,
    pub order_service: Arc<OrderService>,
}

impl AppState {
    /// Wire the service over the given repositories.
    pub fn new(
        customer_repo: Arc<dyn CustomerRepository>,
        product_repo: Arc<dyn ProductRepository>,
        order_repo: Arc<dyn OrderRepository>,
    ) -> Self {
        let order_service = Arc::new(OrderService::new(
            order_repo.clone(),
            product_repo.clone(),
            customer_repo.clone(),
        ));

        Self {
            customer_repo,
            product_repo,
            order_repo,
            order_service,
        }
    }
}
