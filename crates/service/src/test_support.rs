#![cfg(test)]
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use migration::MigratorTrait;

/// A fresh, migrated in-memory SQLite database for one test.
///
/// The pool holds exactly one connection: every SQLite `:memory:` connection
/// is its own database, so a second one would see empty tables.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
