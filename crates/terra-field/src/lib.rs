//! Terra Field - Zone data model and height field sampling
//!
//! Provides the zone list (the user-facing configuration of the terrain
//! surface), the deterministic noise and image height sources, and the
//! zone blender that composites every active zone into a single
//! height/color/uv sample per world coordinate. Sampling is pure: it never
//! fails, never touches disk, and never mutates zone state, so the chunk
//! generator can run it from worker threads.

pub mod image;
pub mod mesh;
pub mod noise;
pub mod resources;
pub mod sampler;
pub mod zone;

pub use crate::image::{ColorTexture, HeightImage};
pub use mesh::ZoneMesh;
pub use noise::NoiseField;
pub use resources::ResourceSet;
pub use sampler::{FieldSampler, VertexSample};
pub use zone::{MoveDirection, Zone, ZoneList};
