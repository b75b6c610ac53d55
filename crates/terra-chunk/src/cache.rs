//! Shared vertex sample cache
//!
//! Adjacent chunks and successive LOD regenerations evaluate the zone
//! blend at the same grid coordinates. The cache keys composited samples
//! by their position on the finest vertex grid so that work is shared.
//! Entries idle for longer than the terrain's refresh time are evicted
//! between frames.

use std::collections::HashMap;

use terra_field::VertexSample;

/// Position on the finest vertex grid
pub type CacheKey = (i64, i64);

#[derive(Clone, Copy, Debug)]
struct CacheEntry {
    sample: VertexSample,
    last_used: u64,
}

/// Grid-keyed cache of composited vertex samples.
///
/// Reads are shared (`&self`) so generation workers can consult the cache
/// concurrently; the samples they touch are absorbed back on the main
/// thread once the parallel pass has joined.
#[derive(Debug)]
pub struct SampleCache {
    /// Vertex spacing of the deepest subdivision level. Vertices of every
    /// level land on multiples of it.
    spacing: f32,
    entries: HashMap<CacheKey, CacheEntry>,
}

impl SampleCache {
    pub fn new(spacing: f32) -> Self {
        Self {
            spacing: spacing.max(1e-6),
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Grid key of a world coordinate
    pub fn key(&self, x: f32, y: f32) -> CacheKey {
        (
            (x / self.spacing).round() as i64,
            (y / self.spacing).round() as i64,
        )
    }

    pub fn lookup(&self, key: CacheKey) -> Option<VertexSample> {
        self.entries.get(&key).map(|e| e.sample)
    }

    /// Upsert every sample touched by this frame's generation pass,
    /// stamping it with the frame number.
    pub fn absorb(&mut self, touched: impl IntoIterator<Item = (CacheKey, VertexSample)>, frame: u64) {
        for (key, sample) in touched {
            self.entries.insert(
                key,
                CacheEntry {
                    sample,
                    last_used: frame,
                },
            );
        }
    }

    /// Drop entries not touched for more than `max_idle` frames
    pub fn evict_idle(&mut self, frame: u64, max_idle: u64) {
        self.entries
            .retain(|_, e| frame.saturating_sub(e.last_used) <= max_idle);
    }

    /// Drop everything, e.g. after a zone list mutation
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
