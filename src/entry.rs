use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Canonical column order for the metadata ledger and the CSV export.
/// The ledger header row and every exported document use exactly this list.
pub const CSV_COLUMNS: [&str; 10] = [
    "filename",
    "speaker_id",
    "text",
    "language",
    "environment",
    "intent",
    "object_color",
    "target_color",
    "direction",
    "timestamp",
];

/// Normalized annotation fields produced by the validator.
/// Raw client casing never reaches a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFields {
    pub speaker_id: String,
    pub text: String,
    pub language: String,
    pub environment: String,
    pub intent: String,
    pub object_color: String,
    pub target_color: String,
    pub direction: String,
}

/// A persisted recording entry.
///
/// One schema covers both backends; the optional annotation fields hold the
/// empty string when unset so every row renders to the same column list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub filename: String,
    pub speaker_id: String,
    pub text: String,
    pub language: String,
    pub environment: String,
    pub intent: String,
    pub object_color: String,
    pub target_color: String,
    pub direction: String,
    /// Server-assigned UTC creation time, ISO-8601
    pub timestamp: String,
    /// Base64 audio payload; None when listed with audio excluded or when
    /// the stored payload is unreadable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_b64: Option<String>,
}

impl Entry {
    pub fn from_fields(
        filename: String,
        fields: &ValidatedFields,
        timestamp: String,
        audio_b64: Option<String>,
    ) -> Self {
        Entry {
            filename,
            speaker_id: fields.speaker_id.clone(),
            text: fields.text.clone(),
            language: fields.language.clone(),
            environment: fields.environment.clone(),
            intent: fields.intent.clone(),
            object_color: fields.object_color.clone(),
            target_color: fields.target_color.clone(),
            direction: fields.direction.clone(),
            timestamp,
            audio_b64,
        }
    }

    /// Field values in `CSV_COLUMNS` order (audio is never a CSV column)
    pub fn csv_row(&self) -> [&str; 10] {
        [
            self.filename.as_str(),
            self.speaker_id.as_str(),
            self.text.as_str(),
            self.language.as_str(),
            self.environment.as_str(),
            self.intent.as_str(),
            self.object_color.as_str(),
            self.target_color.as_str(),
            self.direction.as_str(),
            self.timestamp.as_str(),
        ]
    }
}

/// Creation timestamp for a new entry (UTC, ISO-8601)
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
