// ecom/src/store/mod.rs

//! Data-access seams.
//!
//! Transaction control ([`TransactionManager`]) is kept apart from the queries
//! ([`OrderRepository`]) so that the service decides transaction scope and the
//! repository only ever runs statements against the handle it is handed.

pub mod memory;
pub mod postgres;

pub use memory::{MemoryStore, MemoryTx};
pub use postgres::{PgStore, PgTx};

use crate::error::StoreError;
use crate::models::{NewOrderItem, Order, OrderItem, Product};
use async_trait::async_trait;

/// Opens and closes transactions on a store.
///
/// Dropping a `Tx` without committing it must discard its writes, so a
/// cancelled or panicking caller never leaves partial state behind.
#[async_trait]
pub trait TransactionManager: Send + Sync {
  type Tx: Send;

  async fn begin(&self) -> Result<Self::Tx, StoreError>;

  async fn commit(&self, tx: Self::Tx) -> Result<(), StoreError>;

  async fn rollback(&self, tx: Self::Tx) -> Result<(), StoreError>;
}

/// Parameterized statements used by order placement, run against a caller-owned transaction.
#[async_trait]
pub trait OrderRepository<Tx: Send>: Send + Sync {
  /// Reads a product and locks its row until the transaction ends.
  async fn find_product_by_id(&self, tx: &mut Tx, product_id: i64) -> Result<Option<Product>, StoreError>;

  async fn create_order(&self, tx: &mut Tx, customer_id: i64) -> Result<Order, StoreError>;

  async fn create_order_item(&self, tx: &mut Tx, item: NewOrderItem) -> Result<OrderItem, StoreError>;

  /// Decrements stock only if at least `quantity` is available.
  ///
  /// Returns the remaining quantity, or `None` when nothing was updated
  /// (insufficient stock or unknown product).
  async fn reserve_stock(&self, tx: &mut Tx, product_id: i64, quantity: i32) -> Result<Option<i32>, StoreError>;

  async fn find_order_by_id(&self, tx: &mut Tx, order_id: i64) -> Result<Option<Order>, StoreError>;

  async fn list_order_items(&self, tx: &mut Tx, order_id: i64) -> Result<Vec<OrderItem>, StoreError>;
}

/// Catalogue reads that need no transaction.
#[async_trait]
pub trait ProductRepository: Send + Sync {
  async fn list_products(&self) -> Result<Vec<Product>, StoreError>;
}
