// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use ecom::{MemoryStore, OrderServiceImpl, Product};
use once_cell::sync::Lazy;
use tracing::Level;

pub type MemoryOrderService = OrderServiceImpl<MemoryStore, MemoryStore>;

// --- Helper for Tracing Setup ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// A fresh store with a service wired on top of it.
pub fn service_with_store() -> (MemoryOrderService, MemoryStore) {
  let store = MemoryStore::new();
  let service = OrderServiceImpl::new(store.clone(), store.clone());
  (service, store)
}

/// Seeds `(name, price_in_cents, quantity)` rows in order and returns them.
pub async fn seed_catalog(store: &MemoryStore, rows: &[(&str, i32, i32)]) -> Vec<Product> {
  let mut products = Vec::with_capacity(rows.len());
  for (name, price, quantity) in rows {
    products.push(store.seed_product(name, *price, *quantity).await);
  }
  products
}

pub async fn stock_of(store: &MemoryStore, product_id: i64) -> i32 {
  store
    .product(product_id)
    .await
    .map(|p| p.quantity)
    .unwrap_or_else(|| panic!("product {} missing from store", product_id))
}

pub async fn assert_nothing_persisted(store: &MemoryStore) {
  assert!(store.orders().await.is_empty(), "orders should be empty");
  assert!(store.order_items().await.is_empty(), "order_items should be empty");
}
