// tests/common/mod.rs
#![allow(dead_code)]

use ecom::MemoryStore;
use ecom_server::config::{AppConfig, StoreBackend};
use ecom_server::state::AppState;
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

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

pub fn test_config(request_timeout: Duration) -> Arc<AppConfig> {
  Arc::new(AppConfig {
    store_backend: StoreBackend::Memory,
    request_timeout,
    ..AppConfig::default()
  })
}

pub fn memory_state(store: &MemoryStore) -> AppState {
  AppState::memory(store.clone(), test_config(Duration::from_secs(5)))
}
