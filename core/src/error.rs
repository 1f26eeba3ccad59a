// ecom/src/error.rs
use std::fmt;
use thiserror::Error;

/// Failure reported by a store implementation.
///
/// Repositories surface these unmodified; only the services classify them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("constraint violated: {0}")]
    Constraint(String),
}

/// Coarse class of an [`OrderError`], used by callers to pick a response severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself is malformed; the caller can fix it.
    Validation,
    /// The request is well formed but violates a catalogue rule (unknown product, stock).
    BusinessRule,
    /// The store failed. Opaque to the caller.
    Infrastructure,
}

/// The transactional operation that was running when a store error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStage {
    Begin,
    CreateOrder,
    FindProduct,
    CreateOrderItem,
    ReserveStock,
    ReadOrder,
    Commit,
}

impl fmt::Display for TxStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            TxStage::Begin => "begin",
            TxStage::CreateOrder => "create order",
            TxStage::FindProduct => "find product",
            TxStage::CreateOrderItem => "create order item",
            TxStage::ReserveStock => "reserve stock",
            TxStage::ReadOrder => "read order",
            TxStage::Commit => "commit",
        };
        f.write_str(stage)
    }
}

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("customer ID is required")]
    InvalidCustomer,

    #[error("at least one item is required")]
    EmptyOrder,

    #[error("quantity for product {product_id} must be positive, got {quantity}")]
    InvalidQuantity { product_id: i64, quantity: i32 },

    #[error("product {product_id} not found")]
    ProductNotFound { product_id: i64 },

    #[error("product {product_id} does not have enough stock (requested {requested}, available {available})")]
    ProductOutOfStock {
        product_id: i64,
        requested: i32,
        available: i32,
    },

    #[error("order {order_id} not found")]
    OrderNotFound { order_id: i64 },

    #[error("transaction failed during {stage}: {source}")]
    Transaction {
        stage: TxStage,
        #[source]
        source: StoreError,
    },
}

impl OrderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrderError::InvalidCustomer | OrderError::EmptyOrder | OrderError::InvalidQuantity { .. } => {
                ErrorKind::Validation
            }
            OrderError::ProductNotFound { .. }
            | OrderError::ProductOutOfStock { .. }
            | OrderError::OrderNotFound { .. } => ErrorKind::BusinessRule,
            OrderError::Transaction { .. } => ErrorKind::Infrastructure,
        }
    }

    /// Adapter for `map_err` that tags a store error with the stage it came from.
    pub(crate) fn at(stage: TxStage) -> impl FnOnce(StoreError) -> OrderError {
        move |source| OrderError::Transaction { stage, source }
    }
}

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("failed to load products: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T, E = OrderError> = std::result::Result<T, E>;
