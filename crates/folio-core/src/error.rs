//! Error metadata shared by the pipeline's error types
//!
//! Pipeline errors are typed per seam (validation, rendering, storage,
//! ingestion). The `ErrorMetadata` trait lets each of them describe how it
//! should be surfaced by whatever transport sits in front of the pipeline,
//! without this crate knowing anything about HTTP routing.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like a degraded render
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP-style status code the transport layer should use
    fn status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "THUMBNAIL_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same request may succeed
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}
