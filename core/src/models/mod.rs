// ecom/src/models/mod.rs

//! Rows of the relational store and the transient order request.

pub mod order;
pub mod order_item;
pub mod product;
pub mod request;

pub use order::{Order, OrderDetails};
pub use order_item::{NewOrderItem, OrderItem};
pub use product::Product;
pub use request::{CreateOrderRequest, OrderLine};
