use serde::Deserialize;
use std::path::{Path, PathBuf};

fn default_port() -> u16 {
    3000
}

fn default_max_audio_mb() -> usize {
    10
}

fn default_dataset_dir() -> PathBuf {
    PathBuf::from("dataset")
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Flat files: CSV ledger plus one audio file per entry
    Filesystem,
    /// SQLite database holding audio inline as base64 text
    Database,
}

/// Storage section of the configuration file ([storage] in TOML)
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Which backend to construct at startup
    pub backend: StorageBackend,
    /// Dataset root for the filesystem backend (default: dataset)
    #[serde(default = "default_dataset_dir")]
    pub dataset_dir: PathBuf,
    /// Database file for the database backend
    /// (default: <dataset_dir>/entries.sqlite)
    pub database_file: Option<PathBuf>,
}

impl StorageConfig {
    pub fn database_path(&self) -> PathBuf {
        self.database_file
            .clone()
            .unwrap_or_else(|| self.dataset_dir.join("entries.sqlite"))
    }
}

/// Collector configuration file structure
#[derive(Debug, Deserialize)]
pub struct CollectorConfig {
    pub storage: StorageConfig,
    /// API server port (default: 3000)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum decoded audio size in megabytes (default: 10)
    #[serde(default = "default_max_audio_mb")]
    pub max_audio_mb: usize,
}

impl CollectorConfig {
    /// Load the config file, apply the DATASET_DIR environment override
    /// (persistent-disk deployments point it at the mounted volume), and
    /// validate consistency.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;
        let mut config: CollectorConfig = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        if let Ok(dir) = std::env::var("DATASET_DIR") {
            config.storage.dataset_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations mixing backend settings
    pub fn validate(&self) -> Result<(), String> {
        if self.storage.backend == StorageBackend::Filesystem
            && self.storage.database_file.is_some()
        {
            return Err(
                "database_file is set but storage backend is 'filesystem'".to_string(),
            );
        }
        Ok(())
    }

    pub fn max_audio_bytes(&self) -> usize {
        self.max_audio_mb * 1024 * 1024
    }
}
