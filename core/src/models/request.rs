// ecom/src/models/request.rs

use serde::{Deserialize, Serialize};

use crate::error::OrderError;

/// One requested line: which product and how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
  pub product_id: i64,
  pub quantity: i32,
}

/// Inbound order request. Never persisted; validated and discarded.
///
/// An absent `customerId` or `items` deserializes to its zero value and is
/// reported by [`CreateOrderRequest::validate`]. Lines must name both
/// `productId` and `quantity`; a line missing either fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
  #[serde(default)]
  pub customer_id: i64,
  #[serde(default)]
  pub items: Vec<OrderLine>,
}

impl CreateOrderRequest {
  pub fn new(customer_id: i64, items: impl IntoIterator<Item = (i64, i32)>) -> Self {
    Self {
      customer_id,
      items: items
        .into_iter()
        .map(|(product_id, quantity)| OrderLine { product_id, quantity })
        .collect(),
    }
  }

  /// Checks the request shape without touching the store.
  pub fn validate(&self) -> Result<(), OrderError> {
    if self.customer_id <= 0 {
      return Err(OrderError::InvalidCustomer);
    }
    if self.items.is_empty() {
      return Err(OrderError::EmptyOrder);
    }
    if let Some(line) = self.items.iter().find(|line| line.quantity <= 0) {
      return Err(OrderError::InvalidQuantity {
        product_id: line.product_id,
        quantity: line.quantity,
      });
    }
    Ok(())
  }
}
