use async_trait::async_trait;
use log::warn;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::audio::{encode_base64, AudioPayload};
use crate::csv;
use crate::entry::{now_timestamp, Entry, ValidatedFields, CSV_COLUMNS};
use crate::error::CollectorError;
use crate::store::{generate_filename, CountFilter, RecordStore, LIST_CAP};

/// Filesystem backend: an append-only CSV ledger plus one audio file per
/// entry under `<dataset-root>/audio/`.
///
/// The ledger row is the commit point. Audio files are written first to
/// unique paths and removed again if the ledger append fails, so a reader
/// going by the ledger never sees a partial entry.
pub struct CsvStore {
    csv_path: PathBuf,
    audio_dir: PathBuf,
    /// Serializes ledger appends; audio writes need no lock since every
    /// entry gets its own path
    ledger: Mutex<()>,
}

fn storage_err(context: &str, e: std::io::Error) -> CollectorError {
    CollectorError::StorageWrite(format!("{}: {}", context, e))
}

impl CsvStore {
    /// Open the dataset layout under `dataset_dir`, creating it as needed.
    /// The header row is written once if the ledger does not exist yet.
    pub async fn open(dataset_dir: &Path) -> Result<Self, CollectorError> {
        let audio_dir = dataset_dir.join("audio");
        tokio::fs::create_dir_all(&audio_dir)
            .await
            .map_err(|e| storage_err("failed to create audio directory", e))?;

        let csv_path = dataset_dir.join("metadata.csv");
        let exists = tokio::fs::try_exists(&csv_path)
            .await
            .map_err(|e| storage_err("failed to stat metadata ledger", e))?;
        if !exists {
            tokio::fs::write(&csv_path, csv::format_row(&CSV_COLUMNS))
                .await
                .map_err(|e| storage_err("failed to write ledger header", e))?;
        }

        Ok(CsvStore {
            csv_path,
            audio_dir,
            ledger: Mutex::new(()),
        })
    }

    /// Parse the whole ledger into entries, newest rows last (file order)
    async fn read_entries(&self, exclude_audio: bool) -> Result<Vec<Entry>, CollectorError> {
        let content = tokio::fs::read_to_string(&self.csv_path)
            .await
            .map_err(|e| storage_err("failed to read metadata ledger", e))?;

        let mut entries = Vec::new();
        for record in csv::parse(&content).into_iter().skip(1) {
            if entries.len() >= LIST_CAP {
                break;
            }
            let fields: [String; 10] = match record.try_into() {
                Ok(fields) => fields,
                Err(record) => {
                    warn!("skipping ledger row with {} fields", record.len());
                    continue;
                }
            };
            let [filename, speaker_id, text, language, environment, intent, object_color, target_color, direction, timestamp] =
                fields;
            entries.push(Entry {
                filename,
                speaker_id,
                text,
                language,
                environment,
                intent,
                object_color,
                target_color,
                direction,
                timestamp,
                audio_b64: None,
            });
        }

        if !exclude_audio {
            for entry in &mut entries {
                entry.audio_b64 = self.load_audio(&entry.filename).await;
            }
        }
        Ok(entries)
    }

    async fn load_audio(&self, filename: &str) -> Option<String> {
        match tokio::fs::read(self.audio_dir.join(filename)).await {
            Ok(bytes) => Some(encode_base64(&bytes)),
            Err(e) => {
                warn!("audio file for {} is unreadable: {}", filename, e);
                None
            }
        }
    }

    async fn append_row(&self, row: &str) -> std::io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .await?;
        file.write_all(row.as_bytes()).await?;
        file.flush().await
    }
}

#[async_trait]
impl RecordStore for CsvStore {
    async fn insert(
        &self,
        fields: &ValidatedFields,
        audio: &AudioPayload,
    ) -> Result<String, CollectorError> {
        let filename = generate_filename();
        let audio_path = self.audio_dir.join(&filename);

        tokio::fs::write(&audio_path, &audio.bytes)
            .await
            .map_err(|e| storage_err("failed to save audio file", e))?;

        let entry = Entry::from_fields(filename.clone(), fields, now_timestamp(), None);
        let row = csv::format_row(&entry.csv_row());

        // Lock held only across the append itself
        let appended = {
            let _guard = self.ledger.lock().await;
            self.append_row(&row).await
        };

        if let Err(e) = appended {
            // No orphaned audio without a ledger row
            if let Err(remove_err) = tokio::fs::remove_file(&audio_path).await {
                warn!(
                    "failed to remove audio file {} after ledger error: {}",
                    filename, remove_err
                );
            }
            return Err(storage_err("failed to append metadata row", e));
        }

        Ok(filename)
    }

    async fn count(&self, filter: &CountFilter) -> Result<u64, CollectorError> {
        let entries = self.read_entries(true).await?;
        Ok(entries.iter().filter(|e| filter.matches(e)).count() as u64)
    }

    async fn list(&self, exclude_audio: bool) -> Result<Vec<Entry>, CollectorError> {
        self.read_entries(exclude_audio).await
    }

    async fn get_by_filename(&self, filename: &str) -> Result<Entry, CollectorError> {
        let entries = self.read_entries(true).await?;
        let mut entry = entries
            .into_iter()
            .find(|e| e.filename == filename)
            .ok_or_else(|| CollectorError::NotFound(format!("entry '{}' not found", filename)))?;
        entry.audio_b64 = self.load_audio(&entry.filename).await;
        Ok(entry)
    }
}
