// ecom/src/service/order_service.rs

//! Order placement: validation, stock reservation and the all-or-nothing write.

use std::fmt;

use async_trait::async_trait;
use tracing::{debug, error, field, info, instrument, warn, Span};

use crate::error::{OrderError, Result, TxStage};
use crate::models::{CreateOrderRequest, NewOrderItem, Order, OrderDetails};
use crate::store::{OrderRepository, TransactionManager};

/// Where a single `place_order` call currently is.
///
/// `Committed` and `RolledBack` are terminal; a failed commit ends in `RolledBack`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOrderPhase {
  Validating,
  TransactionOpen,
  ProcessingItem(usize),
  Committing,
  Committed,
  RolledBack,
}

impl fmt::Display for PlaceOrderPhase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PlaceOrderPhase::Validating => f.write_str("validating"),
      PlaceOrderPhase::TransactionOpen => f.write_str("transaction_open"),
      PlaceOrderPhase::ProcessingItem(index) => write!(f, "processing_item({index})"),
      PlaceOrderPhase::Committing => f.write_str("committing"),
      PlaceOrderPhase::Committed => f.write_str("committed"),
      PlaceOrderPhase::RolledBack => f.write_str("rolled_back"),
    }
  }
}

fn enter_phase(phase: PlaceOrderPhase) {
  Span::current().record("phase", field::display(phase));
  debug!(%phase, "place_order phase");
}

/// Order capability consumed by the HTTP layer.
#[async_trait]
pub trait OrderService: Send + Sync {
  /// Validates `request` and persists an order with one item per requested line,
  /// decrementing stock as it goes. On any error nothing is persisted.
  async fn place_order(&self, request: CreateOrderRequest) -> Result<Order>;

  /// Reads a committed order together with its items.
  async fn get_order(&self, order_id: i64) -> Result<OrderDetails>;
}

/// [`OrderService`] over a store `S` and a repository `R` that runs on `S`'s transactions.
///
/// Both are usually the same value, e.g. `OrderServiceImpl::new(store.clone(), store)`.
#[derive(Debug, Clone)]
pub struct OrderServiceImpl<S, R> {
  store: S,
  repo: R,
}

impl<S, R> OrderServiceImpl<S, R>
where
  S: TransactionManager,
  R: OrderRepository<S::Tx>,
{
  pub fn new(store: S, repo: R) -> Self {
    Self { store, repo }
  }

  /// Steps run inside the open transaction. Any `Err` means the caller must roll back.
  async fn write_order(&self, tx: &mut S::Tx, request: &CreateOrderRequest) -> Result<Order> {
    let order = self
      .repo
      .create_order(tx, request.customer_id)
      .await
      .map_err(OrderError::at(TxStage::CreateOrder))?;

    // Lines run in input order; a repeated product sees the stock taken by earlier lines.
    for (index, line) in request.items.iter().enumerate() {
      enter_phase(PlaceOrderPhase::ProcessingItem(index));

      let product = self
        .repo
        .find_product_by_id(tx, line.product_id)
        .await
        .map_err(OrderError::at(TxStage::FindProduct))?
        .ok_or(OrderError::ProductNotFound {
          product_id: line.product_id,
        })?;

      if product.quantity < line.quantity {
        return Err(OrderError::ProductOutOfStock {
          product_id: product.id,
          requested: line.quantity,
          available: product.quantity,
        });
      }

      self
        .repo
        .create_order_item(
          tx,
          NewOrderItem {
            order_id: order.id,
            product_id: product.id,
            quantity: line.quantity,
            price_cents: product.price_in_cents,
          },
        )
        .await
        .map_err(OrderError::at(TxStage::CreateOrderItem))?;

      let remaining = self
        .repo
        .reserve_stock(tx, product.id, line.quantity)
        .await
        .map_err(OrderError::at(TxStage::ReserveStock))?
        .ok_or(OrderError::ProductOutOfStock {
          product_id: product.id,
          requested: line.quantity,
          available: product.quantity,
        })?;

      debug!(
        product_id = product.id,
        quantity = line.quantity,
        price_cents = product.price_in_cents,
        remaining,
        "order item reserved"
      );
    }

    Ok(order)
  }

  async fn abort(&self, tx: S::Tx) {
    if let Err(e) = self.store.rollback(tx).await {
      // The handle is consumed; uncommitted work is discarded on drop.
      error!(error = %e, "explicit rollback failed");
    }
    enter_phase(PlaceOrderPhase::RolledBack);
  }
}

#[async_trait]
impl<S, R> OrderService for OrderServiceImpl<S, R>
where
  S: TransactionManager + 'static,
  R: OrderRepository<S::Tx> + 'static,
{
  #[instrument(
    name = "OrderService::place_order",
    skip(self, request),
    fields(
      customer_id = request.customer_id,
      items = request.items.len(),
      phase = field::Empty,
    ),
    err(Display)
  )]
  async fn place_order(&self, request: CreateOrderRequest) -> Result<Order> {
    enter_phase(PlaceOrderPhase::Validating);
    request.validate()?;

    let mut tx = self.store.begin().await.map_err(OrderError::at(TxStage::Begin))?;
    enter_phase(PlaceOrderPhase::TransactionOpen);

    let order = match self.write_order(&mut tx, &request).await {
      Ok(order) => order,
      Err(e) => {
        warn!(error = %e, "placing order failed, rolling back");
        self.abort(tx).await;
        return Err(e);
      }
    };

    enter_phase(PlaceOrderPhase::Committing);
    if let Err(e) = self.store.commit(tx).await {
      enter_phase(PlaceOrderPhase::RolledBack);
      return Err(OrderError::Transaction {
        stage: TxStage::Commit,
        source: e,
      });
    }
    enter_phase(PlaceOrderPhase::Committed);

    info!(order_id = order.id, "order placed");
    Ok(order)
  }

  #[instrument(name = "OrderService::get_order", skip(self), err(Display))]
  async fn get_order(&self, order_id: i64) -> Result<OrderDetails> {
    let mut tx = self.store.begin().await.map_err(OrderError::at(TxStage::Begin))?;

    let read = async {
      let order = self
        .repo
        .find_order_by_id(&mut tx, order_id)
        .await
        .map_err(OrderError::at(TxStage::ReadOrder))?
        .ok_or(OrderError::OrderNotFound { order_id })?;
      let items = self
        .repo
        .list_order_items(&mut tx, order_id)
        .await
        .map_err(OrderError::at(TxStage::ReadOrder))?;
      Ok::<_, OrderError>(OrderDetails { order, items })
    }
    .await;

    // Read-only; nothing to publish.
    if let Err(e) = self.store.rollback(tx).await {
      warn!(error = %e, "closing read transaction failed");
    }
    read
  }
}
