//! Schema bootstrap.

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Schema};
use tracing::info;

use crate::entities::prelude::*;

/// Create the `employees` table, with its unique email index, if it is missing.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut statement = schema.create_table_from_entity(Employees);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;

    info!("Schema ready ({backend:?})");
    Ok(())
}
