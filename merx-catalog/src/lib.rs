pub mod product;

pub use product::{NewProduct, Product, ProductError, QuantityUpdate};
