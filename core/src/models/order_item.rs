// ecom/src/models/order_item.rs

use serde::Serialize;
use sqlx::FromRow;

/// A line of a committed order. `price_cents` is the product price copied at
/// creation time and is never recomputed from the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
  pub id: i64,
  pub order_id: i64,
  pub product_id: i64,
  pub quantity: i32,
  pub price_cents: i32,
}

/// Parameters of the `order_items` insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderItem {
  pub order_id: i64,
  pub product_id: i64,
  pub quantity: i32,
  pub price_cents: i32,
}
