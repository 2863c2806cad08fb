use std::fmt::{Display, Formatter, Result as FmtResult};

use uuid::Uuid;

/// Stage an upload has reached in the ingestion state machine.
///
/// `Received -> BytesRead -> MetadataExtracted -> ThumbnailGenerated ->
/// Persisted -> CachePopulated -> Completed`, with `Failed` reachable from
/// every non-terminal stage. Metadata extraction may be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestState {
    Received,
    BytesRead,
    MetadataExtracted,
    ThumbnailGenerated,
    Persisted,
    CachePopulated,
    Completed,
    Failed,
}

impl IngestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestState::Received => "received",
            IngestState::BytesRead => "bytes_read",
            IngestState::MetadataExtracted => "metadata_extracted",
            IngestState::ThumbnailGenerated => "thumbnail_generated",
            IngestState::Persisted => "persisted",
            IngestState::CachePopulated => "cache_populated",
            IngestState::Completed => "completed",
            IngestState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, IngestState::Completed | IngestState::Failed)
    }

    /// Whether `next` is a legal successor of this state.
    pub fn can_transition_to(&self, next: IngestState) -> bool {
        use IngestState::*;

        if self.is_terminal() {
            return false;
        }
        if next == Failed {
            return true;
        }
        matches!(
            (self, next),
            (Received, BytesRead)
                | (BytesRead, MetadataExtracted)
                | (BytesRead, ThumbnailGenerated)
                | (MetadataExtracted, ThumbnailGenerated)
                | (ThumbnailGenerated, Persisted)
                | (Persisted, CachePopulated)
                | (CachePopulated, Completed)
        )
    }
}

impl Display for IngestState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Per-upload state tracker that logs every transition.
#[derive(Debug)]
pub(crate) struct IngestProgress {
    upload_id: Uuid,
    state: IngestState,
    history: Vec<IngestState>,
}

impl IngestProgress {
    pub(crate) fn new(upload_id: Uuid) -> Self {
        tracing::debug!(upload_id = %upload_id, state = %IngestState::Received, "Ingest state");
        Self {
            upload_id,
            state: IngestState::Received,
            history: vec![IngestState::Received],
        }
    }

    pub(crate) fn state(&self) -> IngestState {
        self.state
    }

    #[cfg(test)]
    pub(crate) fn history(&self) -> &[IngestState] {
        &self.history
    }

    pub(crate) fn advance(&mut self, next: IngestState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal ingest transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!(
            upload_id = %self.upload_id,
            from = %self.state,
            to = %next,
            "Ingest state"
        );
        self.state = next;
        self.history.push(next);
    }

    pub(crate) fn fail(&mut self) {
        if !self.state.is_terminal() {
            self.advance(IngestState::Failed);
        }
    }
}
