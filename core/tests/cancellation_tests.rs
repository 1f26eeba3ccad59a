// tests/cancellation_tests.rs
mod common;

use async_trait::async_trait;
use common::*;
use ecom::store::{MemoryTx, OrderRepository, TransactionManager};
use ecom::{CreateOrderRequest, MemoryStore, NewOrderItem, Order, OrderItem, OrderService, OrderServiceImpl, Product, StoreError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Delegates to a `MemoryStore` but never returns from the `stall_on`-th `reserve_stock` call.
///
/// Before stalling it records how many items the open transaction already holds.
#[derive(Clone)]
struct StallingStore {
  inner: MemoryStore,
  stall_on: usize,
  reserve_calls: Arc<AtomicUsize>,
  items_in_tx: Arc<AtomicUsize>,
  stalled: Arc<Notify>,
}

impl StallingStore {
  fn new(inner: MemoryStore, stall_on: usize) -> Self {
    Self {
      inner,
      stall_on,
      reserve_calls: Arc::new(AtomicUsize::new(0)),
      items_in_tx: Arc::new(AtomicUsize::new(0)),
      stalled: Arc::new(Notify::new()),
    }
  }
}

#[async_trait]
impl TransactionManager for StallingStore {
  type Tx = MemoryTx;

  async fn begin(&self) -> Result<MemoryTx, StoreError> {
    self.inner.begin().await
  }

  async fn commit(&self, tx: MemoryTx) -> Result<(), StoreError> {
    self.inner.commit(tx).await
  }

  async fn rollback(&self, tx: MemoryTx) -> Result<(), StoreError> {
    self.inner.rollback(tx).await
  }
}

#[async_trait]
impl OrderRepository<MemoryTx> for StallingStore {
  async fn find_product_by_id(&self, tx: &mut MemoryTx, product_id: i64) -> Result<Option<Product>, StoreError> {
    self.inner.find_product_by_id(tx, product_id).await
  }

  async fn create_order(&self, tx: &mut MemoryTx, customer_id: i64) -> Result<Order, StoreError> {
    self.inner.create_order(tx, customer_id).await
  }

  async fn create_order_item(&self, tx: &mut MemoryTx, item: NewOrderItem) -> Result<OrderItem, StoreError> {
    self.inner.create_order_item(tx, item).await
  }

  async fn reserve_stock(&self, tx: &mut MemoryTx, product_id: i64, quantity: i32) -> Result<Option<i32>, StoreError> {
    let call = self.reserve_calls.fetch_add(1, Ordering::SeqCst) + 1;
    if call == self.stall_on {
      // First order in a fresh store.
      let items = self.inner.list_order_items(tx, 1).await?;
      self.items_in_tx.store(items.len(), Ordering::SeqCst);
      self.stalled.notify_one();
      std::future::pending::<()>().await;
    }
    self.inner.reserve_stock(tx, product_id, quantity).await
  }

  async fn find_order_by_id(&self, tx: &mut MemoryTx, order_id: i64) -> Result<Option<Order>, StoreError> {
    self.inner.find_order_by_id(tx, order_id).await
  }

  async fn list_order_items(&self, tx: &mut MemoryTx, order_id: i64) -> Result<Vec<OrderItem>, StoreError> {
    self.inner.list_order_items(tx, order_id).await
  }
}

fn stalling_service(store: &MemoryStore, stall_on: usize) -> (OrderServiceImpl<StallingStore, StallingStore>, StallingStore) {
  let stalling = StallingStore::new(store.clone(), stall_on);
  (OrderServiceImpl::new(stalling.clone(), stalling.clone()), stalling)
}

/// Polls `place_order` until the store stalls, then drops the future.
async fn place_until_stalled(
  service: &OrderServiceImpl<StallingStore, StallingStore>,
  stalling: &StallingStore,
  request: CreateOrderRequest,
) {
  tokio::select! {
    result = service.place_order(request) => panic!("place_order should stall, got {:?}", result),
    _ = stalling.stalled.notified() => {}
  }
}

#[tokio::test]
async fn test_dropping_after_first_item_persists_nothing() {
  setup_tracing();
  let store = MemoryStore::new();
  let products = seed_catalog(&store, &[("desk lamp", 500, 5)]).await;
  let lamp = &products[0];
  let (service, stalling) = stalling_service(&store, 1);

  place_until_stalled(&service, &stalling, CreateOrderRequest::new(1, [(lamp.id, 2)])).await;

  assert_eq!(stalling.items_in_tx.load(Ordering::SeqCst), 1);
  assert_nothing_persisted(&store).await;
  assert_eq!(stock_of(&store, lamp.id).await, 5);
  assert_eq!(store.commit_count(), 0);
}

#[tokio::test]
async fn test_dropping_mid_order_discards_reserved_lines() {
  setup_tracing();
  let store = MemoryStore::new();
  let products = seed_catalog(&store, &[("desk lamp", 500, 5), ("chair", 4_000, 2)]).await;
  let (lamp, chair) = (&products[0], &products[1]);
  let (service, stalling) = stalling_service(&store, 2);

  place_until_stalled(
    &service,
    &stalling,
    CreateOrderRequest::new(1, [(lamp.id, 2), (chair.id, 1)]),
  )
  .await;

  // The first line was fully reserved and the second item written inside the dropped transaction.
  assert_eq!(stalling.items_in_tx.load(Ordering::SeqCst), 2);
  assert_nothing_persisted(&store).await;
  assert_eq!(stock_of(&store, lamp.id).await, 5);
  assert_eq!(stock_of(&store, chair.id).await, 2);
  assert_eq!(store.commit_count(), 0);
}

#[tokio::test]
async fn test_store_usable_after_dropped_order() {
  setup_tracing();
  let store = MemoryStore::new();
  let products = seed_catalog(&store, &[("desk lamp", 500, 5)]).await;
  let lamp = &products[0];
  let (service, stalling) = stalling_service(&store, 1);

  place_until_stalled(&service, &stalling, CreateOrderRequest::new(1, [(lamp.id, 2)])).await;

  // The dropped transaction released the store; the next call is past the stall point.
  let order = service
    .place_order(CreateOrderRequest::new(2, [(lamp.id, 3)]))
    .await
    .expect("order should be placed");

  assert_eq!(store.orders().await, vec![order]);
  assert_eq!(stock_of(&store, lamp.id).await, 2);
  assert_eq!(store.commit_count(), 1);
}
