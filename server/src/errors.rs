// ecom_server/src/errors.rs

use actix_web::http::{header::ContentType, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use ecom::{ErrorKind, OrderError, ProductError};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Order(#[from] OrderError),

  #[error(transparent)]
  Product(#[from] ProductError),

  /// The request body could not be decoded.
  #[error("Invalid request body: {0}")]
  BadRequest(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Request timed out after {0:?}")]
  Timeout(Duration),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  /// Text sent to the client. Infrastructure failures stay opaque; their
  /// detail only goes to the server log.
  fn public_message(&self) -> String {
    match self {
      AppError::Order(e) if e.kind() == ErrorKind::Infrastructure => "internal server error".to_string(),
      AppError::Product(_) | AppError::Config(_) | AppError::Internal(_) => "internal server error".to_string(),
      other => other.to_string(),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Order(e) => match e {
        OrderError::ProductNotFound { .. } | OrderError::OrderNotFound { .. } => StatusCode::NOT_FOUND,
        OrderError::ProductOutOfStock { .. } => StatusCode::CONFLICT,
        _ => match e.kind() {
          ErrorKind::Validation => StatusCode::BAD_REQUEST,
          ErrorKind::BusinessRule => StatusCode::UNPROCESSABLE_ENTITY,
          ErrorKind::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
        },
      },
      AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
      AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
      AppError::Product(_) | AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    // Log the full error when it's turned into a response
    if status.is_server_error() {
      tracing::error!(application_error = %self, detail = ?self, %status, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, %status, "Responding with error");
    }
    HttpResponse::build(status)
      .content_type(ContentType::plaintext())
      .body(self.public_message())
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;
  use ecom::{StoreError, TxStage};

  fn order(e: OrderError) -> AppError {
    AppError::Order(e)
  }

  #[test]
  fn maps_order_errors_to_statuses() {
    assert_eq!(order(OrderError::InvalidCustomer).status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(order(OrderError::EmptyOrder).status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
      order(OrderError::InvalidQuantity {
        product_id: 1,
        quantity: -1
      })
      .status_code(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      order(OrderError::ProductNotFound { product_id: 9 }).status_code(),
      StatusCode::NOT_FOUND
    );
    assert_eq!(
      order(OrderError::ProductOutOfStock {
        product_id: 9,
        requested: 2,
        available: 1
      })
      .status_code(),
      StatusCode::CONFLICT
    );
    assert_eq!(
      order(OrderError::Transaction {
        stage: TxStage::Commit,
        source: StoreError::Unavailable("down".into())
      })
      .status_code(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(AppError::Timeout(Duration::from_secs(1)).status_code(), StatusCode::GATEWAY_TIMEOUT);
  }

  #[test]
  fn infrastructure_detail_is_not_exposed() {
    let err = order(OrderError::Transaction {
      stage: TxStage::Begin,
      source: StoreError::Unavailable("connection refused by 10.0.0.5".into()),
    });
    assert_eq!(err.public_message(), "internal server error");

    let not_found = order(OrderError::ProductNotFound { product_id: 999 });
    assert_eq!(not_found.public_message(), "product 999 not found");
  }
}
