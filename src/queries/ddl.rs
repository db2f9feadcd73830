use sea_query::{ColumnDef, Index, SqliteQueryBuilder, Table};

use crate::schema::{Entries, Metadata};

/// CREATE TABLE IF NOT EXISTS metadata (key TEXT PRIMARY KEY, value TEXT NOT NULL)
pub fn create_metadata_table() -> String {
    Table::create()
        .table(Metadata::Table)
        .if_not_exists()
        .col(ColumnDef::new(Metadata::Key).string().primary_key())
        .col(ColumnDef::new(Metadata::Value).string().not_null())
        .to_string(SqliteQueryBuilder)
}

/// CREATE TABLE IF NOT EXISTS entries (
///     filename TEXT PRIMARY KEY,
///     speaker_id TEXT NOT NULL,
///     text TEXT NOT NULL,
///     language TEXT NOT NULL,
///     environment TEXT NOT NULL,
///     intent TEXT NOT NULL DEFAULT '',
///     object_color TEXT NOT NULL DEFAULT '',
///     target_color TEXT NOT NULL DEFAULT '',
///     direction TEXT NOT NULL DEFAULT '',
///     timestamp TEXT NOT NULL,
///     audio_b64 TEXT
/// )
pub fn create_entries_table() -> String {
    Table::create()
        .table(Entries::Table)
        .if_not_exists()
        .col(ColumnDef::new(Entries::Filename).string().primary_key())
        .col(ColumnDef::new(Entries::SpeakerId).string().not_null())
        .col(ColumnDef::new(Entries::Text).string().not_null())
        .col(ColumnDef::new(Entries::Language).string().not_null())
        .col(ColumnDef::new(Entries::Environment).string().not_null())
        .col(ColumnDef::new(Entries::Intent).string().not_null().default(""))
        .col(
            ColumnDef::new(Entries::ObjectColor)
                .string()
                .not_null()
                .default(""),
        )
        .col(
            ColumnDef::new(Entries::TargetColor)
                .string()
                .not_null()
                .default(""),
        )
        .col(
            ColumnDef::new(Entries::Direction)
                .string()
                .not_null()
                .default(""),
        )
        .col(ColumnDef::new(Entries::Timestamp).string().not_null())
        .col(ColumnDef::new(Entries::AudioB64).string())
        .to_string(SqliteQueryBuilder)
}

/// CREATE INDEX IF NOT EXISTS idx_entries_language ON entries(language)
pub fn create_entries_language_index() -> String {
    Index::create()
        .if_not_exists()
        .name("idx_entries_language")
        .table(Entries::Table)
        .col(Entries::Language)
        .to_string(SqliteQueryBuilder)
}

/// CREATE INDEX IF NOT EXISTS idx_entries_environment ON entries(environment)
pub fn create_entries_environment_index() -> String {
    Index::create()
        .if_not_exists()
        .name("idx_entries_environment")
        .table(Entries::Table)
        .col(Entries::Environment)
        .to_string(SqliteQueryBuilder)
}

/// CREATE INDEX IF NOT EXISTS idx_entries_intent ON entries(intent)
pub fn create_entries_intent_index() -> String {
    Index::create()
        .if_not_exists()
        .name("idx_entries_intent")
        .table(Entries::Table)
        .col(Entries::Intent)
        .to_string(SqliteQueryBuilder)
}
