//! Shared helpers for the folio command-line binary.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use folio_core::{LogFormat, PipelineConfig};
use folio_processing::{
    guess_content_type, ArtifactCache, ArtifactCacheConfig, IngestionOrchestrator,
};
use folio_storage::create_storage;

/// Content type used when a file's extension is not recognised.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Initialize tracing for the CLI.
///
/// Honours `RUST_LOG` (default `info`); `LogFormat::Json` switches to
/// one JSON object per line.
pub fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

/// Declared content type for a local file, from its extension.
pub fn content_type_for_path(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(guess_content_type)
        .unwrap_or(FALLBACK_CONTENT_TYPE)
        .to_string()
}

/// Build an orchestrator over the configured store with a fresh cache.
pub async fn build_orchestrator(config: &PipelineConfig) -> anyhow::Result<IngestionOrchestrator> {
    let store = create_storage(config)
        .await
        .with_context(|| format!("Failed to open {} storage", config.storage_backend))?;
    let cache = Arc::new(ArtifactCache::new(ArtifactCacheConfig::from(config)));

    Ok(IngestionOrchestrator::from_config(config, store, cache))
}
