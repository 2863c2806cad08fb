//! Test helpers: fixtures, counting fakes and orchestrator setup.
//!
//! Run from workspace root: `cargo test -p folio-processing`.

#![allow(dead_code)]

pub mod fakes;
pub mod fixtures;

use std::sync::Arc;
use std::time::Duration;

use folio_processing::{
    ArtifactCache, ArtifactCacheConfig, Clock, IngestionOrchestrator, MediaValidator,
    ThumbnailGenerator,
};
use folio_storage::MediaStore;

use fakes::{CountingRasterizer, CountingStore};

/// One-hour TTL, matching the production default.
pub const TEST_TTL: Duration = Duration::from_secs(3600);

/// An orchestrator wired to counting fakes, with handles to inspect them.
pub struct TestPipeline {
    pub orchestrator: Arc<IngestionOrchestrator>,
    pub store: Arc<CountingStore>,
    pub rasterizer: Arc<CountingRasterizer>,
    pub cache: Arc<ArtifactCache>,
}

impl TestPipeline {
    pub fn new() -> Self {
        Self::with_store_and_clock(CountingStore::in_memory(), None)
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::with_store_and_clock(CountingStore::in_memory(), Some(clock))
    }

    pub fn with_store(inner: Arc<dyn MediaStore>) -> Self {
        Self::with_store_and_clock(CountingStore::new(inner), None)
    }

    fn with_store_and_clock(store: CountingStore, clock: Option<Arc<dyn Clock>>) -> Self {
        let store = Arc::new(store);
        let rasterizer = Arc::new(CountingRasterizer::new());

        let config = ArtifactCacheConfig::new(64, TEST_TTL);
        let cache = Arc::new(match clock {
            Some(clock) => ArtifactCache::with_clock(config, clock),
            None => ArtifactCache::new(config),
        });

        let orchestrator = IngestionOrchestrator::new(
            store.clone(),
            cache.clone(),
            ThumbnailGenerator::new(rasterizer.clone()),
            MediaValidator::default(),
        )
        .with_thumbnail_size(200, 200);

        Self {
            orchestrator: Arc::new(orchestrator),
            store,
            rasterizer,
            cache,
        }
    }
}

impl Default for TestPipeline {
    fn default() -> Self {
        Self::new()
    }
}
