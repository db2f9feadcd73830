use voice_dataset_collector::audio::{encode_base64, AudioPayload};
use voice_dataset_collector::entry::ValidatedFields;
use voice_dataset_collector::error::CollectorError;
use voice_dataset_collector::queries::meta;
use voice_dataset_collector::store::{CountFilter, RecordStore};
use voice_dataset_collector::store_csv::CsvStore;
use voice_dataset_collector::store_db::SqliteStore;

/// Helper to build normalized fields the way the validator would
fn sample_fields(language: &str) -> ValidatedFields {
    ValidatedFields {
        speaker_id: "SPK01".to_string(),
        text: "ekhane esho".to_string(),
        language: language.to_string(),
        environment: "quiet".to_string(),
        intent: "pick".to_string(),
        object_color: "red".to_string(),
        target_color: String::new(),
        direction: "left".to_string(),
    }
}

fn sample_audio() -> AudioPayload {
    let bytes = b"\x1a\x45\xdf\xa3fake-webm-audio".to_vec();
    AudioPayload {
        base64: encode_base64(&bytes),
        bytes,
    }
}

async fn open_csv_store() -> (CsvStore, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvStore::open(dir.path()).await.unwrap();
    (store, dir)
}

async fn open_db_store() -> SqliteStore {
    let pool = voice_dataset_collector::db::create_test_connection_in_memory().await;
    SqliteStore::open(pool).await.unwrap()
}

async fn assert_roundtrip(store: &dyn RecordStore) {
    let fields = sample_fields("bengali");
    let audio = sample_audio();

    let filename = store.insert(&fields, &audio).await.unwrap();
    assert!(filename.ends_with(".webm"));

    let entry = store.get_by_filename(&filename).await.unwrap();
    assert_eq!(entry.filename, filename);
    assert_eq!(entry.speaker_id, fields.speaker_id);
    assert_eq!(entry.text, fields.text);
    assert_eq!(entry.language, fields.language);
    assert_eq!(entry.environment, fields.environment);
    assert_eq!(entry.intent, fields.intent);
    assert_eq!(entry.object_color, fields.object_color);
    assert_eq!(entry.target_color, fields.target_color);
    assert_eq!(entry.direction, fields.direction);
    assert!(!entry.timestamp.is_empty());
    assert_eq!(entry.audio_b64.as_deref(), Some(audio.base64.as_str()));
}

#[tokio::test]
async fn test_insert_then_get_roundtrip_csv() {
    let (store, _dir) = open_csv_store().await;
    assert_roundtrip(&store).await;
}

#[tokio::test]
async fn test_insert_then_get_roundtrip_db() {
    let store = open_db_store().await;
    assert_roundtrip(&store).await;
}

async fn assert_counts(store: &dyn RecordStore) {
    for _ in 0..3 {
        store
            .insert(&sample_fields("bengali"), &sample_audio())
            .await
            .unwrap();
    }
    for _ in 0..2 {
        store
            .insert(&sample_fields("english"), &sample_audio())
            .await
            .unwrap();
    }

    assert_eq!(store.count(&CountFilter::default()).await.unwrap(), 5);
    assert_eq!(store.count(&CountFilter::language("bengali")).await.unwrap(), 3);
    assert_eq!(store.count(&CountFilter::language("english")).await.unwrap(), 2);
    assert_eq!(store.count(&CountFilter::language("mixed")).await.unwrap(), 0);
    assert_eq!(store.count(&CountFilter::environment("quiet")).await.unwrap(), 5);
    assert_eq!(store.count(&CountFilter::environment("noisy")).await.unwrap(), 0);
    assert_eq!(store.count(&CountFilter::intent("pick")).await.unwrap(), 5);
}

#[tokio::test]
async fn test_counts_per_bucket_csv() {
    let (store, _dir) = open_csv_store().await;
    assert_counts(&store).await;
}

#[tokio::test]
async fn test_counts_per_bucket_db() {
    let store = open_db_store().await;
    assert_counts(&store).await;
}

async fn assert_list_excludes_audio(store: &dyn RecordStore) {
    store
        .insert(&sample_fields("mixed"), &sample_audio())
        .await
        .unwrap();

    let without_audio = store.list(true).await.unwrap();
    assert_eq!(without_audio.len(), 1);
    assert!(without_audio[0].audio_b64.is_none());

    let with_audio = store.list(false).await.unwrap();
    assert_eq!(with_audio.len(), 1);
    assert_eq!(
        with_audio[0].audio_b64.as_deref(),
        Some(sample_audio().base64.as_str())
    );
}

#[tokio::test]
async fn test_list_exclude_audio_csv() {
    let (store, _dir) = open_csv_store().await;
    assert_list_excludes_audio(&store).await;
}

#[tokio::test]
async fn test_list_exclude_audio_db() {
    let store = open_db_store().await;
    assert_list_excludes_audio(&store).await;
}

#[tokio::test]
async fn test_get_unknown_filename_is_not_found() {
    let (csv_store, _dir) = open_csv_store().await;
    let err = csv_store.get_by_filename("missing.webm").await.unwrap_err();
    assert!(matches!(err, CollectorError::NotFound(_)));

    let db_store = open_db_store().await;
    let err = db_store.get_by_filename("missing.webm").await.unwrap_err();
    assert!(matches!(err, CollectorError::NotFound(_)));
}

#[tokio::test]
async fn test_ledger_header_written_once() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = CsvStore::open(dir.path()).await.unwrap();
        store
            .insert(&sample_fields("english"), &sample_audio())
            .await
            .unwrap();
    }
    // Reopening must not rewrite the header or clobber existing rows
    let store = CsvStore::open(dir.path()).await.unwrap();
    assert_eq!(store.count(&CountFilter::default()).await.unwrap(), 1);

    let content = std::fs::read_to_string(dir.path().join("metadata.csv")).unwrap();
    let header_lines = content
        .lines()
        .filter(|line| line.starts_with("filename,"))
        .count();
    assert_eq!(header_lines, 1);
}

#[tokio::test]
async fn test_failed_ledger_append_removes_audio_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvStore::open(dir.path()).await.unwrap();

    // Turn the ledger path into a directory so the append fails
    std::fs::remove_file(dir.path().join("metadata.csv")).unwrap();
    std::fs::create_dir(dir.path().join("metadata.csv")).unwrap();

    let err = store
        .insert(&sample_fields("english"), &sample_audio())
        .await
        .unwrap_err();
    assert!(matches!(err, CollectorError::StorageWrite(_)));

    // Compensating cleanup: no orphaned audio without a metadata row
    let leftover: Vec<_> = std::fs::read_dir(dir.path().join("audio"))
        .unwrap()
        .collect();
    assert!(leftover.is_empty());
}

#[tokio::test]
async fn test_text_with_commas_and_quotes_survives_the_ledger() {
    let (store, _dir) = open_csv_store().await;
    let mut fields = sample_fields("english");
    fields.text = "put it down, then say \"done\"\nand wait".to_string();

    let filename = store.insert(&fields, &sample_audio()).await.unwrap();
    let entry = store.get_by_filename(&filename).await.unwrap();
    assert_eq!(entry.text, fields.text);
}

#[tokio::test]
async fn test_schema_version_mismatch_rejected() {
    let pool = voice_dataset_collector::db::create_test_connection_in_memory().await;
    voice_dataset_collector::db::init_database_schema(&pool)
        .await
        .unwrap();
    let sql = meta::insert("version", "999");
    sqlx::query(&sql).execute(&pool).await.unwrap();

    let err = SqliteStore::open(pool).await.unwrap_err();
    assert!(matches!(err, CollectorError::StorageWrite(_)));
}
