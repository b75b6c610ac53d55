//! Terra Chunk - Quadtree chunks, LOD selection, and mesh generation
//!
//! The terrain is a quadtree of chunks. Internal nodes only carry bounds;
//! leaf nodes own the generated mesh for their tile. The LOD selector
//! decides, per node and per frame, whether it should split, merge, or
//! keep its shape based on camera and physics-object distances.
//!
//! Coordinates are Z-up: chunks tile the XY plane and heights extend
//! along Z.

pub mod cache;
pub mod debug;
pub mod lod;
pub mod mesh;
pub mod node;
pub mod state;

pub use cache::{CacheKey, SampleCache};
pub use debug::{DebugFlags, DiagnosticsLog, FrameDiagnostics};
pub use lod::{LodDecision, LodSelector};
pub use mesh::{generate_mesh, generate_mesh_cached, ChunkMesh};
pub use node::ChunkNode;
pub use state::{Chunk, ChunkState};
