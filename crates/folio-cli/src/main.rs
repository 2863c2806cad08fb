//! Folio CLI - ingest media and read derived artifacts from the local store.
//!
//! Configuration comes from the environment (and `.env`); see `FOLIO_*`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use folio_cli::{build_orchestrator, content_type_for_path, init_tracing};
use folio_core::{MediaKind, MediaMetadata, PipelineConfig, RawMedia};
use folio_processing::{extract_metadata, DocumentProcessor, THUMBNAIL_CONTENT_TYPE};
use serde::Serialize;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "folio", about = "Media ingestion and thumbnail pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a file: extract metadata, render a thumbnail and store both
    Ingest {
        /// Path to the photo or PDF
        file: PathBuf,
        /// Override the content type guessed from the extension
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Print the metadata of a file without storing it
    Metadata {
        /// Path to the photo or PDF
        file: PathBuf,
    },
    /// Write the thumbnail of a stored record to a PNG file
    Thumbnail {
        /// Record UUID
        id: Uuid,
        /// Kind of the stored record
        #[arg(long, value_enum)]
        kind: KindArg,
        /// Output path
        #[arg(long)]
        out: PathBuf,
    },
    /// Delete a stored record
    Delete {
        /// Record UUID
        id: Uuid,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Photo,
    Document,
}

impl From<KindArg> for MediaKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Photo => MediaKind::Photo,
            KindArg::Document => MediaKind::Document,
        }
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

async fn read_upload(file: &Path, content_type: Option<String>) -> anyhow::Result<RawMedia> {
    let data = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let content_type = content_type.unwrap_or_else(|| content_type_for_path(file));
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(RawMedia::new(data, content_type, file_name))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = PipelineConfig::from_env().context("Invalid configuration")?;
    init_tracing(config.log_format);

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest { file, content_type } => {
            let media = read_upload(&file, content_type).await?;
            let orchestrator = build_orchestrator(&config).await?;
            let record = orchestrator
                .ingest(media)
                .await
                .with_context(|| format!("Failed to ingest {}", file.display()))?;
            print_json(&record)?;
        }
        Commands::Metadata { file } => {
            let media = read_upload(&file, None).await?;
            let kind = MediaKind::detect(&media.content_type, &media.data)
                .with_context(|| format!("Unsupported media: {}", file.display()))?;
            let data = media.data;
            let metadata = tokio::task::spawn_blocking(move || match kind {
                MediaKind::Photo => MediaMetadata::Photo(extract_metadata(&data)),
                MediaKind::Document => {
                    MediaMetadata::Document(DocumentProcessor::extract_metadata(&data))
                }
            })
            .await?;
            print_json(&metadata)?;
        }
        Commands::Thumbnail { id, kind, out } => {
            let orchestrator = build_orchestrator(&config).await?;
            let thumbnail = orchestrator
                .read_thumbnail(kind.into(), id)
                .await
                .with_context(|| format!("Failed to read thumbnail of {}", id))?;
            tokio::fs::write(&out, &thumbnail)
                .await
                .with_context(|| format!("Failed to write {}", out.display()))?;
            tracing::info!(
                media_id = %id,
                path = %out.display(),
                size_bytes = thumbnail.len(),
                content_type = THUMBNAIL_CONTENT_TYPE,
                "Thumbnail written"
            );
        }
        Commands::Delete { id } => {
            let orchestrator = build_orchestrator(&config).await?;
            orchestrator
                .delete(id)
                .await
                .with_context(|| format!("Failed to delete {}", id))?;
            println!("Deleted {}", id);
        }
    }

    Ok(())
}
