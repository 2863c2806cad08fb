//! First-page PDF rasterization behind a narrow trait
//!
//! The production implementation shells out to `pdftoppm`. Every call works
//! in its own temporary directory, which is removed when the call returns
//! whether or not the render succeeded.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::process::Command;

/// Resolution used for document thumbnails.
pub const DEFAULT_DPI: u32 = 150;

#[derive(Error, Debug)]
pub enum RasterizeError {
    #[error("Failed to spawn rasterizer '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Rasterizer exited with status {code:?}: {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("Rasterizer produced no output at {0}")]
    MissingOutput(PathBuf),

    #[error("Rasterizer timed out after {0:?}")]
    TimedOut(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders page 1 of a PDF to PNG bytes.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize_first_page(&self, pdf: &[u8], dpi: u32) -> Result<Bytes, RasterizeError>;
}

/// `pdftoppm`-compatible command-line rasterizer.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    program: String,
    timeout: Duration,
}

impl PdftoppmRasterizer {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Arguments selecting a single PNG of page 1 at `dpi`, written to
    /// `<output_prefix>.png`.
    pub fn build_args(input: &Path, output_prefix: &Path, dpi: u32) -> Vec<String> {
        vec![
            "-singlefile".to_string(),
            "-f".to_string(),
            "1".to_string(),
            "-l".to_string(),
            "1".to_string(),
            "-png".to_string(),
            "-r".to_string(),
            dpi.to_string(),
            input.to_string_lossy().to_string(),
            output_prefix.to_string_lossy().to_string(),
        ]
    }

    async fn render_in(
        &self,
        workdir: &Path,
        pdf: &[u8],
        dpi: u32,
    ) -> Result<Bytes, RasterizeError> {
        let input = workdir.join("input.pdf");
        let output_prefix = workdir.join("page");
        let output = output_prefix.with_extension("png");

        tokio::fs::write(&input, pdf).await?;
        self.run(&Self::build_args(&input, &output_prefix, dpi)).await?;

        match tokio::fs::read(&output).await {
            Ok(png) => Ok(Bytes::from(png)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RasterizeError::MissingOutput(output))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn run(&self, args: &[String]) -> Result<(), RasterizeError> {
        let child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            // Dropping the output future on timeout must not leave the process behind
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| RasterizeError::TimedOut(self.timeout))?
            .map_err(|source| RasterizeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(RasterizeError::NonZeroExit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self::new("pdftoppm", Duration::from_secs(30))
    }
}

#[async_trait]
impl Rasterizer for PdftoppmRasterizer {
    #[tracing::instrument(skip(self, pdf), fields(program = %self.program, size_bytes = pdf.len()))]
    async fn rasterize_first_page(&self, pdf: &[u8], dpi: u32) -> Result<Bytes, RasterizeError> {
        let start = Instant::now();

        // Directory creation and removal are blocking filesystem calls
        let workdir = tokio::task::spawn_blocking(|| {
            tempfile::Builder::new().prefix("folio-raster-").tempdir()
        })
        .await
        .map_err(std::io::Error::other)??;

        let result = self.render_in(workdir.path(), pdf, dpi).await;

        let path = workdir.path().to_path_buf();
        match tokio::task::spawn_blocking(move || workdir.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(
                error = %e,
                path = %path.display(),
                "Failed to remove rasterizer work dir"
            ),
            Err(e) => tracing::warn!(
                error = %e,
                path = %path.display(),
                "Rasterizer cleanup task failed"
            ),
        }

        match &result {
            Ok(png) => tracing::info!(
                dpi = dpi,
                output_bytes = png.len(),
                duration_ms = start.elapsed().as_millis(),
                "Rasterized first PDF page"
            ),
            Err(e) => tracing::error!(error = %e, "PDF rasterization failed"),
        }
        result
    }
}
