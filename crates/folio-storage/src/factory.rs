#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-memory")]
use crate::MemoryStorage;
use crate::{MediaStore, StorageBackend, StorageResult};
use folio_core::PipelineConfig;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &PipelineConfig) -> StorageResult<Arc<dyn MediaStore>> {
    match config.storage_backend {
        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let storage = LocalStorage::new(config.storage_path.clone()).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(crate::StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-memory")]
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; records are lost on exit");
            Ok(Arc::new(MemoryStorage::new()))
        }

        #[cfg(not(feature = "storage-memory"))]
        StorageBackend::Memory => Err(crate::StorageError::ConfigError(
            "Memory storage backend not available (storage-memory feature not enabled)"
                .to_string(),
        )),
    }
}
