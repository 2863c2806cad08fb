use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::media::MediaKind;

/// Namespace of a derived artifact. Keeps keys for different artifact kinds
/// of the same entity apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactNamespace {
    PhotoThumbnail,
    PdfThumbnail,
}

impl ArtifactNamespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactNamespace::PhotoThumbnail => "photo-thumbnail",
            ArtifactNamespace::PdfThumbnail => "pdf-thumbnail",
        }
    }

    /// Thumbnail namespace for a media kind.
    pub fn thumbnail_for(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Photo => ArtifactNamespace::PhotoThumbnail,
            MediaKind::Document => ArtifactNamespace::PdfThumbnail,
        }
    }
}

/// Cache key: namespace + entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactKey {
    pub namespace: ArtifactNamespace,
    pub entity_id: Uuid,
}

impl ArtifactKey {
    pub fn new(namespace: ArtifactNamespace, entity_id: Uuid) -> Self {
        Self {
            namespace,
            entity_id,
        }
    }

    pub fn thumbnail(kind: MediaKind, entity_id: Uuid) -> Self {
        Self::new(ArtifactNamespace::thumbnail_for(kind), entity_id)
    }
}

impl Display for ArtifactKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}:{}", self.namespace.as_str(), self.entity_id)
    }
}
