//! Configuration module
//!
//! Pipeline configuration is read from the environment (optionally seeded
//! from a `.env` file). Every value has a default so a bare environment
//! yields a working local setup.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::storage_types::StorageBackend;

const MAX_UPLOAD_MB: usize = 25;
const THUMBNAIL_WIDTH: u32 = 320;
const THUMBNAIL_HEIGHT: u32 = 320;
const RASTERIZER_TIMEOUT_SECS: u64 = 30;
const CACHE_CAPACITY: usize = 512;
const CACHE_TTL_SECS: u64 = 3600;

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

/// Media pipeline configuration
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub environment: String,
    pub log_format: LogFormat,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub storage_path: PathBuf,
    // Upload validation
    pub max_upload_bytes: usize,
    pub allowed_content_types: Vec<String>,
    // Thumbnail rendering
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,
    pub pdf_rasterizer: String,
    pub rasterizer_timeout: Duration,
    // Artifact cache
    pub cache_capacity: usize,
    pub cache_ttl: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            log_format: LogFormat::Text,
            storage_backend: StorageBackend::Local,
            storage_path: PathBuf::from("./data"),
            max_upload_bytes: MAX_UPLOAD_MB * 1024 * 1024,
            allowed_content_types: default_content_types(),
            thumbnail_width: THUMBNAIL_WIDTH,
            thumbnail_height: THUMBNAIL_HEIGHT,
            pdf_rasterizer: "pdftoppm".to_string(),
            rasterizer_timeout: Duration::from_secs(RASTERIZER_TIMEOUT_SECS),
            cache_capacity: CACHE_CAPACITY,
            cache_ttl: Duration::from_secs(CACHE_TTL_SECS),
        }
    }
}

fn default_content_types() -> Vec<String> {
    ["image/jpeg", "image/png", "application/pdf"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment =
            env::var("FOLIO_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let log_format = env::var("FOLIO_LOG_FORMAT")
            .ok()
            .map(|v| v.parse::<LogFormat>())
            .transpose()?;

        let storage_backend = match env::var("FOLIO_STORAGE_BACKEND") {
            Ok(v) => v.parse::<StorageBackend>()?,
            Err(_) => StorageBackend::Local,
        };

        let storage_path = env::var("FOLIO_STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let max_upload_mb = env_or("FOLIO_MAX_UPLOAD_MB", MAX_UPLOAD_MB);

        let allowed_content_types = env::var("FOLIO_ALLOWED_CONTENT_TYPES")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| default_content_types());

        let mut config = PipelineConfig {
            environment,
            log_format: LogFormat::Text,
            storage_backend,
            storage_path,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            allowed_content_types,
            thumbnail_width: env_or("FOLIO_THUMBNAIL_WIDTH", THUMBNAIL_WIDTH),
            thumbnail_height: env_or("FOLIO_THUMBNAIL_HEIGHT", THUMBNAIL_HEIGHT),
            pdf_rasterizer: env::var("FOLIO_PDF_RASTERIZER")
                .unwrap_or_else(|_| "pdftoppm".to_string()),
            rasterizer_timeout: Duration::from_secs(env_or(
                "FOLIO_RASTERIZER_TIMEOUT_SECS",
                RASTERIZER_TIMEOUT_SECS,
            )),
            cache_capacity: env_or("FOLIO_CACHE_CAPACITY", CACHE_CAPACITY),
            cache_ttl: Duration::from_secs(env_or("FOLIO_CACHE_TTL_SECS", CACHE_TTL_SECS)),
        };
        let default_format = config.default_log_format();
        config.log_format = log_format.unwrap_or(default_format);

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_upload_bytes == 0 {
            return Err(anyhow::anyhow!("FOLIO_MAX_UPLOAD_MB must be greater than 0"));
        }

        if self.thumbnail_width == 0 || self.thumbnail_height == 0 {
            return Err(anyhow::anyhow!(
                "Thumbnail dimensions must be greater than 0 (got {}x{})",
                self.thumbnail_width,
                self.thumbnail_height
            ));
        }

        if self.rasterizer_timeout.is_zero() {
            return Err(anyhow::anyhow!(
                "FOLIO_RASTERIZER_TIMEOUT_SECS must be greater than 0"
            ));
        }

        if self.cache_capacity == 0 {
            return Err(anyhow::anyhow!("FOLIO_CACHE_CAPACITY must be greater than 0"));
        }

        if self.cache_ttl.is_zero() {
            return Err(anyhow::anyhow!("FOLIO_CACHE_TTL_SECS must be greater than 0"));
        }

        if self.pdf_rasterizer.trim().is_empty() {
            return Err(anyhow::anyhow!("FOLIO_PDF_RASTERIZER cannot be empty"));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Log format used when `FOLIO_LOG_FORMAT` is unset: JSON in production.
    pub fn default_log_format(&self) -> LogFormat {
        if self.is_production() {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}
