//! Database connection and schema management.

use std::collections::HashSet;

use sea_orm::{
    ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr, EntityTrait, QueryOrder,
    Statement,
};
use sea_orm_migration::{seaql_migrations, MigratorTrait};

use crate::config::Config;

pub mod migrations;

pub use migrations::Migrator;

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Connect and apply pending migrations.
    pub async fn connect(config: &Config) -> Result<Self, DbErr> {
        let db = Self::connect_without_migrations(config).await?;
        db.run_migrations().await.inspect_err(|e| {
            tracing::error!(error = %e, "Failed to run migrations");
        })?;

        tracing::info!("Database connected and migrations applied");
        Ok(db)
    }

    /// Connect without touching the schema (used by the CLI).
    pub async fn connect_without_migrations(config: &Config) -> Result<Self, DbErr> {
        let connection = SeaDatabase::connect(&config.database_url).await?;
        Ok(Self { connection })
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    pub async fn run_migrations(&self) -> Result<(), DbErr> {
        Migrator::up(&self.connection, None).await
    }

    /// Roll back the most recent migration.
    pub async fn rollback_migration(&self) -> Result<(), DbErr> {
        Migrator::down(&self.connection, Some(1)).await
    }

    /// Every known migration paired with whether it has been applied.
    pub async fn migration_status(&self) -> Result<Vec<(String, bool)>, DbErr> {
        let applied: HashSet<String> = seaql_migrations::Entity::find()
            .order_by_asc(seaql_migrations::Column::Version)
            .all(&self.connection)
            .await?
            .into_iter()
            .map(|m| m.version)
            .collect();

        Ok(Migrator::migrations()
            .iter()
            .map(|m| {
                let name = m.name().to_string();
                let is_applied = applied.contains(&name);
                (name, is_applied)
            })
            .collect())
    }

    /// Drop everything and re-run all migrations.
    pub async fn fresh_migrations(&self) -> Result<(), DbErr> {
        Migrator::fresh(&self.connection).await
    }

    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}
