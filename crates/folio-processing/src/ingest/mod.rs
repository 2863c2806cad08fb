//! Upload ingestion state machine and orchestrator

mod error;
mod orchestrator;
mod state;

pub use error::{IngestionError, ThumbnailReadError};
pub use orchestrator::IngestionOrchestrator;
pub use state::IngestState;
