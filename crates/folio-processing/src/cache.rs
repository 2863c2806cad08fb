//! Bounded, time-expiring artifact cache
//!
//! Entries expire a fixed TTL after they were written; expiry is checked
//! lazily on read. When the cache is full the least recently *written*
//! entry is evicted: reads never refresh an entry's position.
//!
//! Every operation is infallible. A miss only ever means "recompute".

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use bytes::Bytes;
use folio_core::{ArtifactKey, PipelineConfig};
use lru::LruCache;

/// Source of the current instant, injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Configuration for the artifact cache
#[derive(Debug, Clone, Copy)]
pub struct ArtifactCacheConfig {
    /// Maximum number of entries
    pub capacity: NonZeroUsize,
    /// Age after which an entry is no longer served
    pub ttl: Duration,
}

impl Default for ArtifactCacheConfig {
    fn default() -> Self {
        Self {
            capacity: NonZeroUsize::new(512).unwrap_or(NonZeroUsize::MIN),
            ttl: Duration::from_secs(3600), // 1 hour
        }
    }
}

impl ArtifactCacheConfig {
    /// Build from raw configuration values; a zero capacity is clamped to 1.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity: NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            ttl,
        }
    }
}

impl From<&PipelineConfig> for ArtifactCacheConfig {
    fn from(config: &PipelineConfig) -> Self {
        Self::new(config.cache_capacity, config.cache_ttl)
    }
}

#[derive(Debug, Clone)]
struct CachedArtifact {
    value: Bytes,
    written_at: Instant,
}

/// Thread-safe artifact cache shared by ingest and read paths.
pub struct ArtifactCache {
    entries: Mutex<LruCache<ArtifactKey, CachedArtifact>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ArtifactCache {
    pub fn new(config: ArtifactCacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: ArtifactCacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(config.capacity)),
            ttl: config.ttl,
            clock,
        }
    }

    // A panic while holding the lock cannot leave the map half-updated in a
    // way that matters to readers, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, LruCache<ArtifactKey, CachedArtifact>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_expired(&self, entry: &CachedArtifact, now: Instant) -> bool {
        now.saturating_duration_since(entry.written_at) >= self.ttl
    }

    /// Return the value for `key` if present and younger than the TTL.
    pub fn get(&self, key: &ArtifactKey) -> Option<Bytes> {
        let now = self.clock.now();
        let mut entries = self.lock();

        let expired = match entries.peek(key) {
            Some(entry) if !self.is_expired(entry, now) => {
                tracing::debug!(key = %key, "Artifact cache hit");
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.pop(key);
            tracing::debug!(key = %key, "Artifact cache entry expired");
        } else {
            tracing::debug!(key = %key, "Artifact cache miss");
        }
        None
    }

    /// Insert or overwrite `key`. Overwriting resets the entry's age.
    pub fn put(&self, key: ArtifactKey, value: Bytes) {
        let entry = CachedArtifact {
            value,
            written_at: self.clock.now(),
        };

        if let Some((evicted, _)) = self.lock().push(key, entry) {
            if evicted != key {
                tracing::debug!(key = %evicted, "Artifact cache evicted oldest entry");
            }
        }
    }

    /// Evict `key` unconditionally.
    pub fn remove(&self, key: &ArtifactKey) {
        self.lock().pop(key);
    }

    /// Drop every expired entry and return how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.lock();

        let expired: Vec<ArtifactKey> = entries
            .iter()
            .filter(|(_, entry)| self.is_expired(entry, now))
            .map(|(key, _)| *key)
            .collect();

        for key in &expired {
            entries.pop(key);
        }
        expired.len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
