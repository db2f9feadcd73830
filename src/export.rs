use log::warn;
use std::io::{Cursor, Write};
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::audio::decode_stored_base64;
use crate::csv;
use crate::entry::{Entry, CSV_COLUMNS};
use crate::error::CollectorError;
use crate::store::RecordStore;

/// Name of the metadata member inside the bundle
pub const METADATA_FILE: &str = "metadata.csv";

fn zip_err(e: zip::result::ZipError) -> CollectorError {
    CollectorError::StorageWrite(format!("zip write failed: {}", e))
}

fn zip_io_err(e: std::io::Error) -> CollectorError {
    CollectorError::StorageWrite(format!("zip write failed: {}", e))
}

/// Render the metadata CSV document: header plus one row per entry, in the
/// order the store returned them (order is backend-defined, not a contract)
pub fn render_metadata_csv(entries: &[Entry]) -> String {
    let mut out = csv::format_row(&CSV_COLUMNS);
    for entry in entries {
        out.push_str(&csv::format_row(&entry.csv_row()));
    }
    out
}

/// Export all metadata as a single CSV document; NotFound when empty
pub async fn export_csv(store: &dyn RecordStore) -> Result<String, CollectorError> {
    let entries = store.list(true).await?;
    if entries.is_empty() {
        return Err(CollectorError::NotFound("no entries recorded yet".to_string()));
    }
    Ok(render_metadata_csv(&entries))
}

/// Export one entry's audio as raw bytes; NotFound when the entry is
/// unknown or its audio payload is missing
pub async fn export_audio(
    store: &dyn RecordStore,
    filename: &str,
) -> Result<Vec<u8>, CollectorError> {
    let entry = store.get_by_filename(filename).await?;
    let encoded = entry
        .audio_b64
        .ok_or_else(|| CollectorError::NotFound(format!("audio for '{}' not found", filename)))?;
    decode_stored_base64(&encoded)
}

/// Bundle the whole dataset into an in-memory ZIP archive; NotFound when empty
pub async fn export_bundle(store: &dyn RecordStore) -> Result<Vec<u8>, CollectorError> {
    let entries = store.list(false).await?;
    if entries.is_empty() {
        return Err(CollectorError::NotFound("no entries recorded yet".to_string()));
    }
    build_zip_bundle(&entries)
}

/// Build the archive incrementally into a buffer: metadata.csv plus
/// audio/<filename> for every entry that has an audio payload. Entries
/// without audio keep their metadata row and skip the audio member.
pub fn build_zip_bundle(entries: &[Entry]) -> Result<Vec<u8>, CollectorError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    writer.start_file(METADATA_FILE, options).map_err(zip_err)?;
    writer
        .write_all(render_metadata_csv(entries).as_bytes())
        .map_err(zip_io_err)?;

    for entry in entries {
        let Some(encoded) = &entry.audio_b64 else {
            warn!("entry {} has no audio payload, metadata row only", entry.filename);
            continue;
        };
        let bytes = decode_stored_base64(encoded)?;
        writer
            .start_file(format!("audio/{}", entry.filename), options)
            .map_err(zip_err)?;
        writer.write_all(&bytes).map_err(zip_io_err)?;
    }

    let cursor = writer.finish().map_err(zip_err)?;
    Ok(cursor.into_inner())
}
