//! Terra Core - Foundational types for the terra terrain engine
//!
//! This crate provides the types every other terra crate depends on:
//! - `Vec3`, `Color`, `Rect` - Spatial primitives
//! - `NodeKey` - Stable quadtree node coordinates
//! - `SceneObject` - The engine's view of camera/physics objects
//! - Error types and Result alias

mod error;
mod key;
mod scene;
mod types;

pub use error::{Result, TerraError};
pub use key::NodeKey;
pub use scene::SceneObject;
pub use types::{Color, Rect, Vec3};
