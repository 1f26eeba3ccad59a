// ecom/src/models/product.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A catalogue entry. `quantity` is the stock still available for sale and never goes negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: i64,
  pub name: String,
  pub price_in_cents: i32,
  pub quantity: i32,
  pub created_at: DateTime<Utc>,
}
