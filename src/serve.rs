use axum::{
    extract::{Form, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::audio::decode_audio_data_url;
use crate::config::CollectorConfig;
use crate::error::CollectorError;
use crate::export;
use crate::store::{open_store, CountFilter, RecordStore};
use crate::validate::{
    self, RawFields, VALID_ENVIRONMENTS, VALID_INTENTS, VALID_LANGUAGES,
};

/// State shared by the collection and export handlers
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub max_audio_bytes: usize,
}

/// Build the collector router
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/upload", post(upload_handler))
        .route("/stats", get(stats_handler))
        .route("/download-csv", get(download_csv_handler))
        .route("/download-audio/{filename}", get(download_audio_handler))
        .route("/download-all", get(download_all_handler))
        .route("/debug", get(debug_handler))
        .layer(cors)
        .with_state(state)
}

/// Run the collector HTTP server (blocks until shutdown)
pub fn serve_collector(config: CollectorConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("Storage backend: {:?}", config.storage.backend);
    println!("Dataset directory: {}", config.storage.dataset_dir.display());
    println!("Listening on: http://[::]:{} (IPv4 + IPv6)", config.port);
    println!("Endpoints:");
    println!("  POST /upload  - Submit a recording with annotations");
    println!("  GET /stats  - Dataset statistics");
    println!("  GET /download-csv  - Metadata CSV export");
    println!("  GET /download-audio/:filename  - Single audio attachment");
    println!("  GET /download-all  - ZIP bundle of CSV + all audio");
    println!("  GET /debug  - Storage snapshot");
    println!("  GET /health  - Health check");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let store = open_store(&config.storage).await?;
        let state = Arc::new(AppState {
            store,
            max_audio_bytes: config.max_audio_bytes(),
        });

        let listener = tokio::net::TcpListener::bind(format!("[::]:{}", config.port))
            .await
            .map_err(|e| format!("Failed to bind to port {}: {}", config.port, e))?;
        axum::serve(listener, app(state))
            .await
            .map_err(|e| format!("Server error: {}", e))?;

        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

// Health check endpoint - returns 200 OK if server is running
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

#[derive(Debug, Deserialize)]
pub struct UploadForm {
    pub audio_data: String,
    pub text: String,
    pub speaker_id: String,
    pub language: String,
    pub environment: String,
    #[serde(default)]
    pub intent: String,
    #[serde(default)]
    pub object_color: String,
    #[serde(default)]
    pub target_color: String,
    #[serde(default)]
    pub direction: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub filename: String,
}

pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<UploadForm>,
) -> Result<Json<UploadResponse>, CollectorError> {
    let fields = validate::validate(&RawFields {
        text: &form.text,
        speaker_id: &form.speaker_id,
        language: &form.language,
        environment: &form.environment,
        intent: &form.intent,
        object_color: &form.object_color,
        target_color: &form.target_color,
        direction: &form.direction,
    })?;

    let audio = decode_audio_data_url(&form.audio_data, state.max_audio_bytes)?;

    let filename = state.store.insert(&fields, &audio).await?;

    info!(
        "saved {} | lang={} | env={} | text={:.40}",
        filename, fields.language, fields.environment, fields.text
    );

    Ok(Json(UploadResponse {
        message: "Saved successfully!".to_string(),
        filename,
    }))
}

pub async fn stats_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, CollectorError> {
    let store = state.store.as_ref();

    let mut stats = serde_json::Map::new();
    let total = store.count(&CountFilter::default()).await?;
    stats.insert("total".to_string(), total.into());

    for language in VALID_LANGUAGES {
        let count = store.count(&CountFilter::language(language)).await?;
        stats.insert(language.to_string(), count.into());
    }
    for environment in VALID_ENVIRONMENTS {
        let count = store.count(&CountFilter::environment(environment)).await?;
        stats.insert(environment.to_string(), count.into());
    }

    let mut intents = serde_json::Map::new();
    for intent in VALID_INTENTS {
        let count = store.count(&CountFilter::intent(intent)).await?;
        intents.insert(intent.to_string(), count.into());
    }
    stats.insert("intents".to_string(), serde_json::Value::Object(intents));

    Ok(Json(serde_json::Value::Object(stats)))
}

pub async fn download_csv_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Response, CollectorError> {
    let body = export::export_csv(state.store.as_ref()).await?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export::METADATA_FILE),
            ),
        ],
        body,
    )
        .into_response())
}

pub async fn download_audio_handler(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, CollectorError> {
    let bytes = export::export_audio(state.store.as_ref(), &filename).await?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "audio/webm".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}

pub async fn download_all_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Response, CollectorError> {
    let bytes = export::export_bundle(state.store.as_ref()).await?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"dataset.zip\"".to_string(),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Storage snapshot: total count plus one sample record with the audio
/// payload and speaker id stripped
pub async fn debug_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, CollectorError> {
    let total = state.store.count(&CountFilter::default()).await?;
    let entries = state.store.list(true).await?;

    let sample = entries
        .into_iter()
        .next()
        .map(|mut entry| {
            entry.speaker_id = String::new();
            entry.audio_b64 = None;
            serde_json::to_value(entry).unwrap_or(serde_json::Value::Null)
        })
        .unwrap_or(serde_json::Value::Null);

    Ok(Json(serde_json::json!({ "total": total, "sample": sample })))
}
