//! Database module providing connection management, migrations, and queries.

pub mod analyses;
pub mod brain;
pub mod dashboard;
pub mod lead_groups;
pub mod leads;
pub mod record_store;
pub mod recordings;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::migration::Migrator;

/// Database connection pool wrapper.
/// SeaORM's `DatabaseConnection` is already pooled and cheap to clone.
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Create a new database pool from configuration.
    pub async fn new(config: &Config) -> AppResult<Self> {
        let mut options = ConnectOptions::new(config.database.url.clone());
        options
            .max_connections(config.database.max_connections)
            .min_connections(config.database.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        let conn = Database::connect(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        info!(
            "Database pool ready (max_connections={})",
            config.database.max_connections
        );

        Ok(Self { conn })
    }

    /// Wrap an existing connection.
    pub fn from_connection(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Get access to the connection for executing queries.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Apply all pending migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        Migrator::up(self.connection(), None)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {}", e)))?;

        info!("Database migrations applied");
        Ok(())
    }
}
