// ecom/src/lib.rs

//! ecom: the order-placement core of a small e-commerce backend.
//!
//! Placing an order validates the request, then in a single store transaction
//! creates the order row, and for every requested line (in input order):
//!  - reads and locks the product,
//!  - checks that enough stock is available,
//!  - records an order item priced at the product's current price,
//!  - decrements the product's stock.
//!
//! The transaction commits only if every line succeeds; any failure rolls the
//! whole order back, so readers never see an order without items or a stock
//! level below zero.
//!
//! Stores plug in through [`store::TransactionManager`] and
//! [`store::OrderRepository`]. Two are provided: [`PgStore`] for PostgreSQL
//! and [`MemoryStore`] for tests and database-less runs.

pub mod error;
pub mod models;
pub mod service;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::error::{ErrorKind, OrderError, ProductError, Result, StoreError, TxStage};
pub use crate::models::{CreateOrderRequest, NewOrderItem, Order, OrderDetails, OrderItem, OrderLine, Product};
pub use crate::service::{OrderService, OrderServiceImpl, PlaceOrderPhase, ProductService, ProductServiceImpl};
pub use crate::store::{MemoryStore, PgStore};
