pub mod repository;
pub mod service;

pub use repository::{CustomerRepository, OrderRepository, ProductRepository, RepoResult};
pub use service::{OrderError, OrderService};
