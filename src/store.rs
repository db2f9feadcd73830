use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::audio::AudioPayload;
use crate::config::{StorageBackend, StorageConfig};
use crate::entry::{Entry, ValidatedFields};
use crate::error::CollectorError;
use crate::store_csv::CsvStore;
use crate::store_db::SqliteStore;

/// Upper bound on entries returned by a single list call
pub const LIST_CAP: usize = 10_000;

/// Fixed container extension for stored recordings (browser MediaRecorder output)
pub const AUDIO_EXT: &str = "webm";

/// Optional equality filter for count()
#[derive(Debug, Default, Clone)]
pub struct CountFilter {
    pub language: Option<String>,
    pub environment: Option<String>,
    pub intent: Option<String>,
}

impl CountFilter {
    pub fn language(value: &str) -> Self {
        CountFilter {
            language: Some(value.to_string()),
            ..CountFilter::default()
        }
    }

    pub fn environment(value: &str) -> Self {
        CountFilter {
            environment: Some(value.to_string()),
            ..CountFilter::default()
        }
    }

    pub fn intent(value: &str) -> Self {
        CountFilter {
            intent: Some(value.to_string()),
            ..CountFilter::default()
        }
    }

    /// In-memory match, used by the ledger backend
    pub fn matches(&self, entry: &Entry) -> bool {
        self.language.as_deref().is_none_or(|v| v == entry.language)
            && self
                .environment
                .as_deref()
                .is_none_or(|v| v == entry.environment)
            && self.intent.as_deref().is_none_or(|v| v == entry.intent)
    }
}

/// Generate a unique filename for a new entry
pub fn generate_filename() -> String {
    format!("{}.{}", Uuid::new_v4(), AUDIO_EXT)
}

/// Storage contract shared by the filesystem and database backends.
///
/// Constructed once at startup and injected into the request handlers. An
/// insert either persists metadata and audio together or nothing; readers
/// never observe a partial entry.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a validated entry, returning the generated filename
    async fn insert(
        &self,
        fields: &ValidatedFields,
        audio: &AudioPayload,
    ) -> Result<String, CollectorError>;

    /// Count entries matching the filter
    async fn count(&self, filter: &CountFilter) -> Result<u64, CollectorError>;

    /// List all entries up to LIST_CAP, optionally omitting audio payloads
    async fn list(&self, exclude_audio: bool) -> Result<Vec<Entry>, CollectorError>;

    /// Fetch a single entry by filename
    async fn get_by_filename(&self, filename: &str) -> Result<Entry, CollectorError>;
}

/// Construct the configured backend
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn RecordStore>, CollectorError> {
    match config.backend {
        StorageBackend::Filesystem => Ok(Arc::new(CsvStore::open(&config.dataset_dir).await?)),
        StorageBackend::Database => {
            let db_path = config.database_path();
            let pool = crate::db::open_database_connection(&db_path).await?;
            Ok(Arc::new(SqliteStore::open(pool).await?))
        }
    }
}
