use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;

use crate::queries::ddl;

/// Open a file-based database connection pool for production use
/// Enables WAL mode and creates the file if it does not exist
pub async fn open_database_connection(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Create the metadata and entries tables plus the count indexes
pub async fn init_database_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for sql in [
        ddl::create_metadata_table(),
        ddl::create_entries_table(),
        ddl::create_entries_language_index(),
        ddl::create_entries_environment_index(),
        ddl::create_entries_intent_index(),
    ] {
        sqlx::query(&sql).execute(pool).await?;
    }
    Ok(())
}

/// Create an in-memory database connection for testing
/// Single connection so every query sees the same database
pub async fn create_test_connection_in_memory() -> SqlitePool {
    let options = SqliteConnectOptions::new().in_memory(true);
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to create in-memory database")
}
