// ecom/src/store/memory.rs

//! In-process transactional store.
//!
//! A transaction owns the table lock for its whole lifetime and works on a
//! private copy of the tables; commit publishes the copy, rollback or drop
//! discards it. Concurrent transactions are therefore fully serialized, which
//! is at least as strong as the row locking the PostgreSQL store relies on.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

use crate::error::StoreError;
use crate::models::{NewOrderItem, Order, OrderItem, Product};
use crate::store::{OrderRepository, ProductRepository, TransactionManager};

#[derive(Debug, Clone, Default)]
struct Tables {
  products: BTreeMap<i64, Product>,
  orders: BTreeMap<i64, Order>,
  order_items: BTreeMap<i64, OrderItem>,
  last_product_id: i64,
  last_order_id: i64,
  last_order_item_id: i64,
}

#[derive(Debug, Default)]
struct Faults {
  fail_next_begin: bool,
  fail_next_commit: bool,
  fail_next_order_item: bool,
}

#[derive(Debug, Default)]
struct Counters {
  begins: AtomicUsize,
  commits: AtomicUsize,
  rollbacks: AtomicUsize,
}

/// Handle of an open [`MemoryStore`] transaction.
pub struct MemoryTx {
  guard: OwnedMutexGuard<Tables>,
  working: Tables,
}

impl std::fmt::Debug for MemoryTx {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MemoryTx")
      .field("orders", &self.working.orders.len())
      .field("order_items", &self.working.order_items.len())
      .finish()
  }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  tables: Arc<AsyncMutex<Tables>>,
  faults: Arc<Mutex<Faults>>,
  counters: Arc<Counters>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Inserts a product outside of any transaction and returns the stored row.
  pub async fn seed_product(&self, name: &str, price_in_cents: i32, quantity: i32) -> Product {
    let mut tables = self.tables.lock().await;
    tables.last_product_id += 1;
    let product = Product {
      id: tables.last_product_id,
      name: name.to_string(),
      price_in_cents,
      quantity,
      created_at: Utc::now(),
    };
    tables.products.insert(product.id, product.clone());
    product
  }

  /// Changes a product price outside of any transaction. Returns `false` if the product is unknown.
  pub async fn set_product_price(&self, product_id: i64, price_in_cents: i32) -> bool {
    let mut tables = self.tables.lock().await;
    match tables.products.get_mut(&product_id) {
      Some(product) => {
        product.price_in_cents = price_in_cents;
        true
      }
      None => false,
    }
  }

  pub async fn product(&self, product_id: i64) -> Option<Product> {
    self.tables.lock().await.products.get(&product_id).cloned()
  }

  pub async fn orders(&self) -> Vec<Order> {
    self.tables.lock().await.orders.values().cloned().collect()
  }

  pub async fn order_items(&self) -> Vec<OrderItem> {
    self.tables.lock().await.order_items.values().cloned().collect()
  }

  pub fn begin_count(&self) -> usize {
    self.counters.begins.load(Ordering::SeqCst)
  }

  pub fn commit_count(&self) -> usize {
    self.counters.commits.load(Ordering::SeqCst)
  }

  pub fn rollback_count(&self) -> usize {
    self.counters.rollbacks.load(Ordering::SeqCst)
  }

  /// Makes the next `begin` fail with [`StoreError::Unavailable`].
  pub fn fail_next_begin(&self) {
    self.faults.lock().fail_next_begin = true;
  }

  /// Makes the next `commit` fail; the transaction's writes are discarded.
  pub fn fail_next_commit(&self) {
    self.faults.lock().fail_next_commit = true;
  }

  /// Makes the next `create_order_item` fail with [`StoreError::Unavailable`].
  pub fn fail_next_order_item(&self) {
    self.faults.lock().fail_next_order_item = true;
  }

  fn take_fault(&self, pick: impl FnOnce(&mut Faults) -> &mut bool) -> bool {
    let mut faults = self.faults.lock();
    std::mem::take(pick(&mut *faults))
  }
}

#[async_trait]
impl TransactionManager for MemoryStore {
  type Tx = MemoryTx;

  async fn begin(&self) -> Result<MemoryTx, StoreError> {
    self.counters.begins.fetch_add(1, Ordering::SeqCst);
    if self.take_fault(|f| &mut f.fail_next_begin) {
      return Err(StoreError::Unavailable("injected begin failure".to_string()));
    }
    let guard = Arc::clone(&self.tables).lock_owned().await;
    let working = guard.clone();
    debug!("memory transaction opened");
    Ok(MemoryTx { guard, working })
  }

  async fn commit(&self, tx: MemoryTx) -> Result<(), StoreError> {
    if self.take_fault(|f| &mut f.fail_next_commit) {
      // tx is dropped here, so nothing it wrote becomes visible.
      return Err(StoreError::Unavailable("injected commit failure".to_string()));
    }
    let MemoryTx { mut guard, working } = tx;
    *guard = working;
    self.counters.commits.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }

  async fn rollback(&self, tx: MemoryTx) -> Result<(), StoreError> {
    drop(tx);
    self.counters.rollbacks.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }
}

#[async_trait]
impl OrderRepository<MemoryTx> for MemoryStore {
  async fn find_product_by_id(&self, tx: &mut MemoryTx, product_id: i64) -> Result<Option<Product>, StoreError> {
    Ok(tx.working.products.get(&product_id).cloned())
  }

  async fn create_order(&self, tx: &mut MemoryTx, customer_id: i64) -> Result<Order, StoreError> {
    let tables = &mut tx.working;
    tables.last_order_id += 1;
    let order = Order {
      id: tables.last_order_id,
      customer_id,
      created_at: Utc::now(),
    };
    tables.orders.insert(order.id, order.clone());
    Ok(order)
  }

  async fn create_order_item(&self, tx: &mut MemoryTx, item: NewOrderItem) -> Result<OrderItem, StoreError> {
    if self.take_fault(|f| &mut f.fail_next_order_item) {
      return Err(StoreError::Unavailable("injected order item failure".to_string()));
    }
    let tables = &mut tx.working;
    if !tables.orders.contains_key(&item.order_id) {
      return Err(StoreError::Constraint(format!(
        "order_items.order_id references missing order {}",
        item.order_id
      )));
    }
    if !tables.products.contains_key(&item.product_id) {
      return Err(StoreError::Constraint(format!(
        "order_items.product_id references missing product {}",
        item.product_id
      )));
    }
    tables.last_order_item_id += 1;
    let created = OrderItem {
      id: tables.last_order_item_id,
      order_id: item.order_id,
      product_id: item.product_id,
      quantity: item.quantity,
      price_cents: item.price_cents,
    };
    tables.order_items.insert(created.id, created.clone());
    Ok(created)
  }

  async fn reserve_stock(&self, tx: &mut MemoryTx, product_id: i64, quantity: i32) -> Result<Option<i32>, StoreError> {
    match tx.working.products.get_mut(&product_id) {
      Some(product) if product.quantity >= quantity => {
        product.quantity -= quantity;
        Ok(Some(product.quantity))
      }
      _ => Ok(None),
    }
  }

  async fn find_order_by_id(&self, tx: &mut MemoryTx, order_id: i64) -> Result<Option<Order>, StoreError> {
    Ok(tx.working.orders.get(&order_id).cloned())
  }

  async fn list_order_items(&self, tx: &mut MemoryTx, order_id: i64) -> Result<Vec<OrderItem>, StoreError> {
    Ok(
      tx.working
        .order_items
        .values()
        .filter(|item| item.order_id == order_id)
        .cloned()
        .collect(),
    )
  }
}

#[async_trait]
impl ProductRepository for MemoryStore {
  async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
    Ok(self.tables.lock().await.products.values().cloned().collect())
  }
}
