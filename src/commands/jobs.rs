//! Jobs command - email queue management.
//!
//! ```bash
//! blog-api jobs work    # deliver queued emails
//! blog-api jobs list    # counts per status
//! blog-api jobs clear   # drop failed jobs
//! ```

use apalis::prelude::*;
use apalis_sql::postgres::PostgresStorage;
use apalis_sql::sqlx::postgres::{PgPool, PgPoolOptions};
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};

use crate::cli::args::{JobsAction, JobsArgs};
use crate::config::{Config, JOB_NAME_EMAIL, JOB_POOL_MAX_CONNECTIONS};
use crate::errors::{AppError, AppResult};
use crate::infra::Database;
use crate::jobs::{email_job_handler, EmailJob};

pub async fn execute(args: JobsArgs, config: Config) -> AppResult<()> {
    match args.action {
        JobsAction::Work => run_worker(&config).await,
        JobsAction::List => list_jobs(&config).await,
        JobsAction::Clear => clear_failed_jobs(&config).await,
    }
}

/// Pool for the apalis storage, with its tables created.
pub(crate) async fn connect_job_pool(config: &Config) -> AppResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(JOB_POOL_MAX_CONNECTIONS)
        .connect(&config.database_url)
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect job pool: {}", e)))?;

    PostgresStorage::setup(&pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to setup job storage: {}", e)))?;

    Ok(pool)
}

async fn run_worker(config: &Config) -> AppResult<()> {
    let pool = connect_job_pool(config).await?;
    let storage: PostgresStorage<EmailJob> = PostgresStorage::new(pool);

    let worker = WorkerBuilder::new(JOB_NAME_EMAIL)
        .backend(storage)
        .build_fn(email_job_handler);
    let monitor = Monitor::new().register(worker);

    tracing::info!("Email worker started. Press Ctrl+C to stop.");

    tokio::select! {
        result = monitor.run() => {
            result.map_err(|e| AppError::internal(format!("Worker failed: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping worker...");
        }
    }

    tracing::info!("Email worker stopped");
    Ok(())
}

async fn queue_connection(config: &Config) -> AppResult<Option<DatabaseConnection>> {
    let db = Database::connect_without_migrations(config).await?.get_connection();

    let row = db
        .query_one(Statement::from_string(
            DatabaseBackend::Postgres,
            "SELECT EXISTS(SELECT 1 FROM information_schema.schemata WHERE schema_name = 'apalis') AS exists",
        ))
        .await?;
    let initialized = row
        .and_then(|r| r.try_get::<bool>("", "exists").ok())
        .unwrap_or(false);

    Ok(initialized.then_some(db))
}

async fn list_jobs(config: &Config) -> AppResult<()> {
    let Some(db) = queue_connection(config).await? else {
        println!("Job queue not initialized. Run 'jobs work' or 'serve' first.");
        return Ok(());
    };

    let rows = db
        .query_all(Statement::from_string(
            DatabaseBackend::Postgres,
            "SELECT status::text AS status, COUNT(*)::bigint AS count FROM apalis.jobs GROUP BY status ORDER BY status",
        ))
        .await?;

    println!("\n=== Email Queue ===");
    for row in rows {
        let status: String = row.try_get("", "status")?;
        let count: i64 = row.try_get("", "count")?;
        println!("{:<10}{}", format!("{}:", status), count);
    }
    println!("===================\n");

    Ok(())
}

async fn clear_failed_jobs(config: &Config) -> AppResult<()> {
    let Some(db) = queue_connection(config).await? else {
        println!("Job queue not initialized. Nothing to clear.");
        return Ok(());
    };

    let result = db
        .execute(Statement::from_string(
            DatabaseBackend::Postgres,
            "DELETE FROM apalis.jobs WHERE status = 'Failed'",
        ))
        .await?;

    println!("Cleared {} failed job(s).", result.rows_affected());
    Ok(())
}
