// Library interface for testing

// Declare all modules
pub mod audio;
pub mod config;
pub mod constants;
pub mod csv;
pub mod db;
pub mod entry;
pub mod error;
pub mod export;
pub mod queries;
pub mod schema;
pub mod serve;
pub mod store;
pub mod store_csv;
pub mod store_db;
pub mod validate;

// Re-export the expected schema version for convenience
pub use constants::EXPECTED_SCHEMA_VERSION;
