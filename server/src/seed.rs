// ecom_server/src/seed.rs

use ecom::MemoryStore;

/// `(name, price_in_cents, quantity)`
const DEMO_CATALOG: &[(&str, i32, i32)] = &[
  ("Desk lamp", 2_499, 25),
  ("Office chair", 14_900, 8),
  ("Notebook (A5, dotted)", 650, 120),
  ("Mechanical keyboard", 8_999, 0),
];

/// Fills an empty in-memory store with a few products so the API is usable
/// without a database.
pub async fn seed_demo_catalog(store: &MemoryStore) -> usize {
  for (name, price, quantity) in DEMO_CATALOG {
    store.seed_product(name, *price, *quantity).await;
  }
  tracing::info!(products = DEMO_CATALOG.len(), "Seeded demo catalogue into the in-memory store.");
  DEMO_CATALOG.len()
}
