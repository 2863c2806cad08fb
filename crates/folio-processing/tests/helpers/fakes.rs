use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use folio_processing::{RasterizeError, Rasterizer};
use folio_storage::{
    MediaManifest, MediaStore, MemoryStorage, NewMedia, StorageBackend, StorageResult,
    StoredMedia,
};
use uuid::Uuid;

use super::fixtures;

/// Wraps a store and counts calls per operation.
pub struct CountingStore {
    inner: Arc<dyn MediaStore>,
    pub memory: Option<MemoryStorage>,
    puts: AtomicUsize,
    gets: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: Arc<dyn MediaStore>) -> Self {
        Self {
            inner,
            memory: None,
            puts: AtomicUsize::new(0),
            gets: AtomicUsize::new(0),
        }
    }

    pub fn in_memory() -> Self {
        let memory = MemoryStorage::new();
        let mut store = Self::new(Arc::new(memory.clone()));
        store.memory = Some(memory);
        store
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// Seed a record directly, bypassing `put` and its counter.
    pub fn seed(&self, media: StoredMedia) {
        self.memory
            .as_ref()
            .expect("seeding requires the in-memory store")
            .insert(media);
    }
}

#[async_trait]
impl MediaStore for CountingStore {
    async fn put(&self, media: NewMedia) -> StorageResult<MediaManifest> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(media).await
    }

    async fn get(&self, id: Uuid) -> StorageResult<StoredMedia> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(id).await
    }

    async fn manifest(&self, id: Uuid) -> StorageResult<MediaManifest> {
        self.inner.manifest(id).await
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        self.inner.delete(id).await
    }

    async fn exists(&self, id: Uuid) -> StorageResult<bool> {
        self.inner.exists(id).await
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}

/// Stand-in for the command-line rasterizer.
///
/// Renders well-formed fixture PDFs to a fixed PNG and fails on anything
/// else, recording the DPI of every call.
pub struct CountingRasterizer {
    calls: AtomicUsize,
    dpis: Mutex<Vec<u32>>,
}

impl CountingRasterizer {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            dpis: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn dpis(&self) -> Vec<u32> {
        self.dpis.lock().unwrap().clone()
    }
}

#[async_trait]
impl Rasterizer for CountingRasterizer {
    async fn rasterize_first_page(&self, pdf: &[u8], dpi: u32) -> Result<Bytes, RasterizeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.dpis.lock().unwrap().push(dpi);

        if !fixtures::is_well_formed_pdf(pdf) {
            return Err(RasterizeError::NonZeroExit {
                code: Some(1),
                stderr: "Syntax Error: Couldn't read xref table".to_string(),
            });
        }
        Ok(Bytes::from(fixtures::page_render_png()))
    }
}
