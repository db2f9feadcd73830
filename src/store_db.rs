use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::audio::AudioPayload;
use crate::constants::EXPECTED_SCHEMA_VERSION;
use crate::entry::{now_timestamp, Entry, ValidatedFields};
use crate::error::CollectorError;
use crate::queries::{entries, meta};
use crate::store::{generate_filename, CountFilter, RecordStore, LIST_CAP};

/// Database backend: one row per entry with the audio payload inline as
/// base64 text. Each insert is a single independent row write, so write
/// atomicity is the database's per-row guarantee and no application lock
/// is needed.
#[derive(Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Initialize the schema on the given pool and check the stored schema
    /// version, stamping it on first use.
    pub async fn open(pool: SqlitePool) -> Result<Self, CollectorError> {
        crate::db::init_database_schema(&pool).await?;

        let sql = meta::select_by_key("version");
        let existing: Option<String> = sqlx::query_scalar(&sql).fetch_optional(&pool).await?;
        match existing.as_deref() {
            Some(EXPECTED_SCHEMA_VERSION) => {}
            Some(version) => {
                return Err(CollectorError::StorageWrite(format!(
                    "unsupported schema version '{}', expected '{}'",
                    version, EXPECTED_SCHEMA_VERSION
                )));
            }
            None => {
                let sql = meta::insert("version", EXPECTED_SCHEMA_VERSION);
                sqlx::query(&sql).execute(&pool).await?;
            }
        }

        Ok(SqliteStore { pool })
    }
}

fn entry_from_row(row: &SqliteRow, with_audio: bool) -> Result<Entry, sqlx::Error> {
    Ok(Entry {
        filename: row.try_get("filename")?,
        speaker_id: row.try_get("speaker_id")?,
        text: row.try_get("text")?,
        language: row.try_get("language")?,
        environment: row.try_get("environment")?,
        intent: row.try_get("intent")?,
        object_color: row.try_get("object_color")?,
        target_color: row.try_get("target_color")?,
        direction: row.try_get("direction")?,
        timestamp: row.try_get("timestamp")?,
        audio_b64: if with_audio {
            row.try_get("audio_b64")?
        } else {
            None
        },
    })
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn insert(
        &self,
        fields: &ValidatedFields,
        audio: &AudioPayload,
    ) -> Result<String, CollectorError> {
        let filename = generate_filename();
        let entry = Entry::from_fields(
            filename.clone(),
            fields,
            now_timestamp(),
            Some(audio.base64.clone()),
        );

        let sql = entries::insert(&entry);
        sqlx::query(&sql).execute(&self.pool).await?;

        Ok(filename)
    }

    async fn count(&self, filter: &CountFilter) -> Result<u64, CollectorError> {
        let sql = entries::count(filter);
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count as u64)
    }

    async fn list(&self, exclude_audio: bool) -> Result<Vec<Entry>, CollectorError> {
        let sql = entries::select_all(exclude_audio, LIST_CAP as u64);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        let mut result = Vec::with_capacity(rows.len());
        for row in &rows {
            result.push(entry_from_row(row, !exclude_audio)?);
        }
        Ok(result)
    }

    async fn get_by_filename(&self, filename: &str) -> Result<Entry, CollectorError> {
        let sql = entries::select_by_filename(filename);
        match sqlx::query(&sql).fetch_optional(&self.pool).await? {
            Some(row) => Ok(entry_from_row(&row, true)?),
            None => Err(CollectorError::NotFound(format!(
                "entry '{}' not found",
                filename
            ))),
        }
    }
}
