//! Upload validation ahead of any processing

use std::path::Path;

use folio_core::{PipelineConfig, RawMedia};

/// Validation errors for uploaded media
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("File extension .{extension} does not match content type {content_type}")]
    ExtensionMismatch {
        extension: String,
        content_type: String,
    },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Empty file")]
    EmptyFile,
}

/// Lowercased media type with any parameters (`; charset=...`) removed.
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Content types a file extension may legitimately carry.
pub fn content_types_for_extension(extension: &str) -> &'static [&'static str] {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => &["image/jpeg"],
        "png" => &["image/png"],
        "gif" => &["image/gif"],
        "webp" => &["image/webp"],
        "tif" | "tiff" => &["image/tiff"],
        "pdf" => &["application/pdf"],
        _ => &[],
    }
}

/// Best guess at a content type from a file name's extension.
pub fn guess_content_type(filename: &str) -> Option<&'static str> {
    let extension = Path::new(filename).extension()?.to_str()?;
    content_types_for_extension(extension).first().copied()
}

/// Reduce a client-supplied file name to a safe base name.
pub fn sanitize_filename(filename: &str) -> String {
    const MAX: usize = 255;
    let base = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);
    if base.contains("..") {
        return "invalid_filename".to_string();
    }

    let sanitized: String = base
        .chars()
        .take(MAX)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches('_').is_empty() || sanitized.len() < 3 {
        "file".to_string()
    } else {
        sanitized
    }
}

/// Media file validator
pub struct MediaValidator {
    max_file_size: usize,
    allowed_content_types: Vec<String>,
}

impl MediaValidator {
    pub fn new(max_file_size: usize, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types: allowed_content_types
                .iter()
                .map(|ct| normalize_content_type(ct))
                .collect(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            config.max_upload_bytes,
            config.allowed_content_types.clone(),
        )
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate content type against the allow-list
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = normalize_content_type(content_type);

        if !self.allowed_content_types.contains(&normalized) {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Validate that the declared content type matches the file extension,
    /// so a file cannot be smuggled in under another type's name.
    pub fn validate_extension_content_type_match(
        &self,
        filename: &str,
        content_type: &str,
    ) -> Result<(), ValidationError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .ok_or_else(|| ValidationError::InvalidFilename(filename.to_string()))?;

        let normalized = normalize_content_type(content_type);
        if !content_types_for_extension(&extension).contains(&normalized.as_str()) {
            return Err(ValidationError::ExtensionMismatch {
                extension,
                content_type: normalized,
            });
        }

        Ok(())
    }

    /// Run every check against an upload.
    pub fn validate(&self, media: &RawMedia) -> Result<(), ValidationError> {
        self.validate_file_size(media.len())?;
        self.validate_content_type(&media.content_type)?;
        self.validate_extension_content_type_match(&media.file_name, &media.content_type)
    }
}

impl Default for MediaValidator {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}
