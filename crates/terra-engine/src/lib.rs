//! Terra Engine - Terrain orchestration
//!
//! Owns the terrain instance and drives it one update per simulation
//! frame: queued commands apply at the frame boundary, the LOD pass
//! reshapes the quadtree, and leaf meshes regenerate in parallel while
//! the zone configuration stays immutable. Mesh and trimesh buffers are
//! the hand-off points to the (external) renderer and physics collider.

pub mod clock;
pub mod command;
pub mod config;
pub mod runtime;
pub mod terrain;

pub use clock::FrameClock;
pub use command::{apply_command, CommandQueue, TerrainCommand};
pub use config::TerrainConfig;
pub use runtime::TerrainRuntime;
pub use terrain::{Terrain, TerrainSettings, TerrainStats};
