// ecom/src/service/product_service.rs

use async_trait::async_trait;
use tracing::instrument;

use crate::error::ProductError;
use crate::models::Product;
use crate::store::ProductRepository;

#[async_trait]
pub trait ProductService: Send + Sync {
  async fn list_products(&self) -> Result<Vec<Product>, ProductError>;
}

#[derive(Debug, Clone)]
pub struct ProductServiceImpl<R> {
  repo: R,
}

impl<R: ProductRepository> ProductServiceImpl<R> {
  pub fn new(repo: R) -> Self {
    Self { repo }
  }
}

#[async_trait]
impl<R: ProductRepository + 'static> ProductService for ProductServiceImpl<R> {
  #[instrument(name = "ProductService::list_products", skip(self), err(Display))]
  async fn list_products(&self) -> Result<Vec<Product>, ProductError> {
    Ok(self.repo.list_products().await?)
  }
}
