//! Named resources referenced by zones
//!
//! Zones refer to images, textures, meshes, and scene objects by name; the
//! resource set resolves those names. A dangling reference is not an error:
//! the sampler treats it as a zone with zero contribution.

use std::collections::HashMap;

use terra_core::SceneObject;

use crate::image::{ColorTexture, HeightImage};
use crate::mesh::ZoneMesh;

/// Resolved, pre-decoded resources shared by all zones of one terrain
#[derive(Default)]
pub struct ResourceSet {
    images: HashMap<String, HeightImage>,
    textures: HashMap<String, ColorTexture>,
    meshes: HashMap<String, ZoneMesh>,
    objects: HashMap<String, SceneObject>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_image(&mut self, name: impl Into<String>, image: HeightImage) {
        self.images.insert(name.into(), image);
    }

    pub fn insert_texture(&mut self, name: impl Into<String>, texture: ColorTexture) {
        self.textures.insert(name.into(), texture);
    }

    pub fn insert_mesh(&mut self, name: impl Into<String>, mesh: ZoneMesh) {
        self.meshes.insert(name.into(), mesh);
    }

    pub fn image(&self, name: &str) -> Option<&HeightImage> {
        self.images.get(name)
    }

    pub fn texture(&self, name: &str) -> Option<&ColorTexture> {
        self.textures.get(name)
    }

    pub fn mesh(&self, name: &str) -> Option<&ZoneMesh> {
        self.meshes.get(name)
    }

    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.get(name)
    }

    /// Replace the scene object snapshot. Called once per frame before
    /// sampling so object-driven influence uses current positions.
    pub fn update_objects<'a>(&mut self, objects: impl IntoIterator<Item = &'a SceneObject>) {
        self.objects.clear();
        for obj in objects {
            self.objects.insert(obj.name.clone(), obj.clone());
        }
    }
}
