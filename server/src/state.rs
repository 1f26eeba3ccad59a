// ecom_server/src/state.rs
use crate::config::AppConfig;
use ecom::{MemoryStore, OrderService, OrderServiceImpl, PgStore, ProductService, ProductServiceImpl};
use sqlx::PgPool;
use std::sync::Arc;

/// Shared by every worker. Services are trait objects so handlers do not care
/// which store is underneath.
#[derive(Clone)]
pub struct AppState {
  pub order_service: Arc<dyn OrderService>,
  pub product_service: Arc<dyn ProductService>,
  pub config: Arc<AppConfig>, // Share loaded config
}

impl AppState {
  pub fn postgres(pool: PgPool, config: Arc<AppConfig>) -> Self {
    let store = PgStore::new(pool);
    Self {
      order_service: Arc::new(OrderServiceImpl::new(store.clone(), store.clone())),
      product_service: Arc::new(ProductServiceImpl::new(store)),
      config,
    }
  }

  pub fn memory(store: MemoryStore, config: Arc<AppConfig>) -> Self {
    Self {
      order_service: Arc::new(OrderServiceImpl::new(store.clone(), store.clone())),
      product_service: Arc::new(ProductServiceImpl::new(store)),
      config,
    }
  }
}
