// ecom/src/store/postgres.rs

//! PostgreSQL store backed by a `sqlx::PgPool`.
//!
//! Expected schema (see `server/migrations`):
//!
//! ```sql
//! CREATE TABLE products (
//!     id BIGSERIAL PRIMARY KEY,
//!     name TEXT NOT NULL,
//!     price_in_cents INTEGER NOT NULL CHECK (price_in_cents >= 0),
//!     quantity INTEGER NOT NULL CHECK (quantity >= 0),
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! CREATE TABLE orders (
//!     id BIGSERIAL PRIMARY KEY,
//!     customer_id BIGINT NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! CREATE TABLE order_items (
//!     id BIGSERIAL PRIMARY KEY,
//!     order_id BIGINT NOT NULL REFERENCES orders (id),
//!     product_id BIGINT NOT NULL REFERENCES products (id),
//!     quantity INTEGER NOT NULL CHECK (quantity > 0),
//!     price_cents INTEGER NOT NULL
//! );
//! ```

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use crate::error::StoreError;
use crate::models::{NewOrderItem, Order, OrderItem, Product};
use crate::store::{OrderRepository, ProductRepository, TransactionManager};

pub type PgTx = Transaction<'static, Postgres>;

const PRODUCT_COLUMNS: &str = "id, name, price_in_cents, quantity, created_at";

#[derive(Debug, Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }
}

#[async_trait]
impl TransactionManager for PgStore {
  type Tx = PgTx;

  async fn begin(&self) -> Result<PgTx, StoreError> {
    Ok(self.pool.begin().await?)
  }

  async fn commit(&self, tx: PgTx) -> Result<(), StoreError> {
    tx.commit().await?;
    Ok(())
  }

  async fn rollback(&self, tx: PgTx) -> Result<(), StoreError> {
    tx.rollback().await?;
    Ok(())
  }
}

#[async_trait]
impl OrderRepository<PgTx> for PgStore {
  #[instrument(name = "pg::find_product_by_id", skip(self, tx), level = "debug")]
  async fn find_product_by_id(&self, tx: &mut PgTx, product_id: i64) -> Result<Option<Product>, StoreError> {
    let product = sqlx::query_as::<_, Product>(&format!(
      "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 FOR UPDATE"
    ))
    .bind(product_id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(product)
  }

  #[instrument(name = "pg::create_order", skip(self, tx), level = "debug")]
  async fn create_order(&self, tx: &mut PgTx, customer_id: i64) -> Result<Order, StoreError> {
    let order = sqlx::query_as::<_, Order>(
      "INSERT INTO orders (customer_id) VALUES ($1) RETURNING id, customer_id, created_at",
    )
    .bind(customer_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(order)
  }

  #[instrument(name = "pg::create_order_item", skip(self, tx), level = "debug")]
  async fn create_order_item(&self, tx: &mut PgTx, item: NewOrderItem) -> Result<OrderItem, StoreError> {
    let created = sqlx::query_as::<_, OrderItem>(
      "INSERT INTO order_items (order_id, product_id, quantity, price_cents) VALUES ($1, $2, $3, $4) \
       RETURNING id, order_id, product_id, quantity, price_cents",
    )
    .bind(item.order_id)
    .bind(item.product_id)
    .bind(item.quantity)
    .bind(item.price_cents)
    .fetch_one(&mut **tx)
    .await?;
    Ok(created)
  }

  #[instrument(name = "pg::reserve_stock", skip(self, tx), level = "debug")]
  async fn reserve_stock(&self, tx: &mut PgTx, product_id: i64, quantity: i32) -> Result<Option<i32>, StoreError> {
    let remaining = sqlx::query_scalar::<_, i32>(
      "UPDATE products SET quantity = quantity - $2 WHERE id = $1 AND quantity >= $2 RETURNING quantity",
    )
    .bind(product_id)
    .bind(quantity)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(remaining)
  }

  async fn find_order_by_id(&self, tx: &mut PgTx, order_id: i64) -> Result<Option<Order>, StoreError> {
    let order = sqlx::query_as::<_, Order>("SELECT id, customer_id, created_at FROM orders WHERE id = $1")
      .bind(order_id)
      .fetch_optional(&mut **tx)
      .await?;
    Ok(order)
  }

  async fn list_order_items(&self, tx: &mut PgTx, order_id: i64) -> Result<Vec<OrderItem>, StoreError> {
    let items = sqlx::query_as::<_, OrderItem>(
      "SELECT id, order_id, product_id, quantity, price_cents FROM order_items WHERE order_id = $1 ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(&mut **tx)
    .await?;
    Ok(items)
  }
}

#[async_trait]
impl ProductRepository for PgStore {
  async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
    let products = sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"))
      .fetch_all(&self.pool)
      .await?;
    Ok(products)
  }
}
