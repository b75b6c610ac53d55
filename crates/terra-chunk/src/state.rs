//! Chunk lifecycle state machine

use crate::mesh::ChunkMesh;

/// Lifecycle of one leaf chunk's mesh.
///
/// `Unloaded -> Generating -> Ready -> Stale -> Generating -> Ready`.
/// Generation failure drops back to `Unloaded`; the chunk is retried on
/// the next frame while it stays in the active set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkState {
    /// No mesh, not queued
    Unloaded,
    /// Queued or running in the current generation pass
    Generating,
    /// Mesh built and current
    Ready,
    /// Mesh exists but the configuration changed under it
    Stale,
}

/// A leaf chunk: its state plus the lazily generated mesh
#[derive(Debug, Default)]
pub struct Chunk {
    state: ChunkState,
    mesh: Option<ChunkMesh>,
}

impl Default for ChunkState {
    fn default() -> Self {
        ChunkState::Unloaded
    }
}

impl Chunk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ChunkState {
        self.state
    }

    pub fn mesh(&self) -> Option<&ChunkMesh> {
        self.mesh.as_ref()
    }

    /// True when this chunk needs a generation pass
    pub fn needs_generation(&self) -> bool {
        matches!(self.state, ChunkState::Unloaded | ChunkState::Stale)
    }

    /// Move into `Generating` if a pass is needed. Returns false when the
    /// chunk is already Ready or in flight.
    pub fn begin_generation(&mut self) -> bool {
        if self.needs_generation() {
            self.state = ChunkState::Generating;
            true
        } else {
            false
        }
    }

    /// Install a freshly generated mesh
    pub fn complete_generation(&mut self, mesh: ChunkMesh) {
        debug_assert_eq!(self.state, ChunkState::Generating);
        self.mesh = Some(mesh);
        self.state = ChunkState::Ready;
    }

    /// Generation failed: drop any partial result and retry next frame
    pub fn fail_generation(&mut self) {
        self.mesh = None;
        self.state = ChunkState::Unloaded;
    }

    /// Configuration changed: a Ready mesh must be rebuilt. Chunks without
    /// a mesh stay where they are; they regenerate anyway.
    pub fn mark_stale(&mut self) {
        if self.state == ChunkState::Ready {
            self.state = ChunkState::Stale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_mesh() -> ChunkMesh {
        ChunkMesh::empty()
    }

    #[test]
    fn full_lifecycle() {
        let mut chunk = Chunk::new();
        assert_eq!(chunk.state(), ChunkState::Unloaded);

        assert!(chunk.begin_generation());
        assert_eq!(chunk.state(), ChunkState::Generating);

        chunk.complete_generation(dummy_mesh());
        assert_eq!(chunk.state(), ChunkState::Ready);
        assert!(chunk.mesh().is_some());

        chunk.mark_stale();
        assert_eq!(chunk.state(), ChunkState::Stale);
        assert!(chunk.mesh().is_some(), "stale chunk keeps its old mesh");

        assert!(chunk.begin_generation());
        chunk.complete_generation(dummy_mesh());
        assert_eq!(chunk.state(), ChunkState::Ready);
    }

    #[test]
    fn ready_chunk_is_not_regenerated() {
        let mut chunk = Chunk::new();
        chunk.begin_generation();
        chunk.complete_generation(dummy_mesh());
        assert!(!chunk.begin_generation());
        assert_eq!(chunk.state(), ChunkState::Ready);
    }

    #[test]
    fn failure_unloads_and_allows_retry() {
        let mut chunk = Chunk::new();
        chunk.begin_generation();
        chunk.fail_generation();
        assert_eq!(chunk.state(), ChunkState::Unloaded);
        assert!(chunk.mesh().is_none());
        assert!(chunk.begin_generation());
    }

    #[test]
    fn stale_on_unloaded_is_a_noop() {
        let mut chunk = Chunk::new();
        chunk.mark_stale();
        assert_eq!(chunk.state(), ChunkState::Unloaded);
    }
}
