// ecom/src/models/order.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::order_item::OrderItem;

/// An order header. Both `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: i64,
  pub customer_id: i64,
  pub created_at: DateTime<Utc>,
}

/// An order read back together with its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDetails {
  pub order: Order,
  pub items: Vec<OrderItem>,
}
