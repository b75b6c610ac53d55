//! The engine's view of host scene objects

use crate::types::Vec3;
use serde::{Deserialize, Serialize};

/// A host object the terrain reacts to: the camera, or a physics-enabled
/// object that forces collision resolution around itself.
///
/// The engine never owns or mutates these; the host hands a slice of them
/// into each frame update.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    pub position: Vec3,
    /// True when the object carries an active physics controller. Only
    /// physics objects pull chunks up to the physics subdivision level.
    pub physics: bool,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            physics: false,
        }
    }

    pub fn with_physics(mut self) -> Self {
        self.physics = true;
        self
    }
}
