// ecom_server/src/main.rs

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use ecom::MemoryStore;
use ecom_server::config::{AppConfig, LogFormat, StoreBackend};
use ecom_server::seed::seed_demo_catalog;
use ecom_server::state::AppState;
use ecom_server::web::configure_app_routes;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::INFO.as_str())); // Allow RUST_LOG override
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE); // Log when spans close, showing duration

  match format {
    LogFormat::Pretty => builder.init(),
    LogFormat::Json => builder.json().init(),
  }
}

async fn build_state(config: Arc<AppConfig>) -> anyhow::Result<AppState> {
  match config.store_backend {
    StoreBackend::Postgres => {
      let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to the database")?;
      tracing::info!("Successfully connected to the database.");

      if config.run_migrations {
        sqlx::migrate!("./migrations")
          .run(&pool)
          .await
          .context("Failed to run database migrations")?;
        tracing::info!("Database migrations applied.");
      }
      if config.seed_db {
        tracing::warn!("SEED_DB only applies to the in-memory store; ignoring it for Postgres.");
      }
      Ok(AppState::postgres(pool, config))
    }
    StoreBackend::Memory => {
      tracing::warn!("Using the in-memory store; all data is lost when the process exits.");
      let store = MemoryStore::new();
      if config.seed_db {
        seed_demo_catalog(&store).await;
      }
      Ok(AppState::memory(store, config))
    }
  }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  let app_config = Arc::new(AppConfig::from_env().context("Failed to load application configuration")?);
  init_tracing(app_config.log_format);

  tracing::info!("Starting ecom server...");
  tracing::debug!(
    backend = ?app_config.store_backend,
    request_timeout = ?app_config.request_timeout,
    "Application configuration loaded."
  );

  let app_state = build_state(app_config.clone()).await?;

  let server_address = app_config.server_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(web::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(tracing_actix_web::TracingLogger::default()) // Request span with request id
      .configure(configure_app_routes)
  })
  .client_request_timeout(app_config.client_request_timeout)
  .keep_alive(app_config.keep_alive)
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {}", server_address))?
  .run()
  .await
  .context("HTTP server terminated with an error")?;

  Ok(())
}
