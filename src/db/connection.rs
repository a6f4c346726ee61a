//! Database connection pool and utility functions.

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait};
use std::time::Duration;
use tracing::log::LevelFilter;

use crate::config::DatabaseConfig;
use crate::entities::prelude::*;

use super::employee::SeaOrmEmployeeStore;
use super::schema::ensure_schema;

/// Create a new database connection with configured pool settings.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    Database::connect(opt).await
}

/// Test database connection by executing a simple query.
pub async fn test_connection(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.execute_unprepared("SELECT 1").await?;
    Ok(())
}

/// Number of stored employees.
pub async fn employee_count(db: &DatabaseConnection) -> Result<u64, DbErr> {
    Employees::find().count(db).await
}

/// Connect to the configured database, check it responds and bootstrap the schema.
pub async fn open_store(config: &DatabaseConfig) -> crate::Result<SeaOrmEmployeeStore> {
    let db = connect(&config.connection_string(), config.max_connections).await?;
    test_connection(&db).await?;
    ensure_schema(&db).await?;

    let count = employee_count(&db).await?;
    tracing::info!("Connected to {}: {} employees", config.name, count);

    Ok(SeaOrmEmployeeStore::new(db))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_sqlite_and_count() {
        let db = connect("sqlite::memory:", 1).await.unwrap();
        test_connection(&db).await.unwrap();
        ensure_schema(&db).await.unwrap();
        // Running the bootstrap twice is a no-op.
        ensure_schema(&db).await.unwrap();

        assert_eq!(employee_count(&db).await.unwrap(), 0);
    }
}
