// ecom_server/src/web/routes.rs

use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse};

use crate::errors::AppError;
use crate::web::handlers::{order_handlers, product_handlers};

/// Liveness probe. Does not touch the store.
async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().body("all good")
}

/// Malformed or mistyped JSON bodies become plain-text 400s like every other client error.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  AppError::BadRequest(err.to_string()).into()
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .route("/health", web::get().to(health_check_handler))
    .route("/products", web::get().to(product_handlers::list_products_handler))
    .service(
      web::scope("/orders")
        .route("", web::post().to(order_handlers::place_order_handler))
        .route("/{order_id}", web::get().to(order_handlers::get_order_handler)),
    );
}
