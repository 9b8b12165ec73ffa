//! Pool setup and schema bootstrap.

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};

use crate::config::DatabaseSettings;
use crate::entity;

/// Opens the connection pool and makes sure the `todos` table exists.
pub async fn connect(settings: &DatabaseSettings) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(settings.url.clone());
    options
        .max_connections(settings.max_connections)
        .sqlx_logging(false);
    let db = Database::connect(options).await?;
    create_schema(&db).await?;
    log::info!("database ready at {}", settings.url);
    Ok(db)
}

/// `CREATE TABLE IF NOT EXISTS todos (...)`, derived from the entity.
pub async fn create_schema<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let mut statement = Schema::new(backend).create_table_from_entity(entity::Entity);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;
    Ok(())
}
