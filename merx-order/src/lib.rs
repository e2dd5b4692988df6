pub mod models;

pub use models::{Order, OrderLineItem, OrderLineRequest};
