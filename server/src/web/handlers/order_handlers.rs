// ecom_server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use ecom::CreateOrderRequest;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;

#[instrument(
    name = "handler::place_order",
    skip(app_state, payload),
    fields(customer_id = payload.customer_id, items = payload.items.len())
)]
pub async fn place_order_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
  let request = payload.into_inner();
  let timeout = app_state.config.request_timeout;

  // Elapsing drops the service future, and with it the open transaction.
  let order = tokio::time::timeout(timeout, app_state.order_service.place_order(request))
    .await
    .map_err(|_| {
      warn!(?timeout, "Order placement exceeded the request timeout.");
      AppError::Timeout(timeout)
    })??;

  info!(order_id = order.id, "Order {} created.", order.id);
  Ok(HttpResponse::Created().json(order))
}

#[instrument(name = "handler::get_order", skip(app_state, path), fields(order_id = *path))]
pub async fn get_order_handler(app_state: web::Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let details = app_state.order_service.get_order(order_id).await?;
  Ok(HttpResponse::Ok().json(details))
}
