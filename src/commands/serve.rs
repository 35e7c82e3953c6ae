//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use apalis_sql::postgres::PostgresStorage;

use super::jobs::connect_job_pool;
use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Cache, Database, LoggingAssetStore};
use crate::jobs::{EmailJob, PostgresEmailQueue};

pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    tracing::info!("Database connected");

    let cache = Cache::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Redis connection failed: {}", e)))?;
    tracing::info!("Redis cache connected");

    // Emails are written to the apalis queue and delivered by `jobs work`
    let pool = connect_job_pool(&config).await?;
    let storage: PostgresStorage<EmailJob> = PostgresStorage::new(pool);
    let emails = Arc::new(PostgresEmailQueue::new(storage));

    let assets = Arc::new(LoggingAssetStore::new(config.asset_base_url.clone()));

    let app_state = AppState::from_config(Arc::new(db), Arc::new(cache), emails, assets, config);
    let app = create_router(app_state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
