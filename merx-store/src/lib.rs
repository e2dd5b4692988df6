pub mod app_config;
pub mod catalog_repo;
pub mod customer_repo;
pub mod database;
pub mod memory;
pub mod order_repo;

pub use catalog_repo::PgProductRepository;
pub use customer_repo::PgCustomerRepository;
pub use database::DbClient;
pub use memory::{MemoryCustomerRepository, MemoryOrderRepository, MemoryProductRepository};
pub use order_repo::PgOrderRepository;
