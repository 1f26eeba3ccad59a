// ecom/src/service/mod.rs

pub mod order_service;
pub mod product_service;

pub use order_service::{OrderService, OrderServiceImpl, PlaceOrderPhase};
pub use product_service::{ProductService, ProductServiceImpl};
