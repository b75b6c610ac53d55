//! Level-of-detail selection
//!
//! Target levels come from camera distance bands: anything inside
//! `camera_distance` runs at `max_level`, anything beyond
//! `camera_distance * margin_factor` at level 0, with a stepwise ramp in
//! between. Physics-enabled objects force at least `min_physics_level`
//! on chunks within `object_distance`, regardless of the camera.

use terra_core::{SceneObject, Vec3};

use crate::node::ChunkNode;

/// What a node should do this frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LodDecision {
    Split,
    Merge,
    Keep,
}

/// Per-terrain LOD parameters, captured once per frame
#[derive(Clone, Copy, Debug)]
pub struct LodSelector {
    pub max_level: u8,
    pub min_physics_level: u8,
    pub camera_distance: f32,
    pub object_distance: f32,
    pub margin_factor: f32,
}

/// Merge band: a node only merges when the target level stays below its
/// own even with distances shrunk by this factor. Keeps a node whose
/// distance sits exactly on a band edge from splitting and merging on
/// alternate frames.
const MERGE_HYSTERESIS: f32 = 0.25;

impl LodSelector {
    /// Target level for a node from camera distance alone
    fn camera_level(&self, distance: f32) -> u8 {
        let near = self.camera_distance.max(1e-6);
        let far = near * self.margin_factor.max(1.0);

        if distance <= near {
            return self.max_level;
        }
        if distance >= far || far <= near {
            return 0;
        }
        let frac = (distance - near) / (far - near);
        let level = (self.max_level as f32 * (1.0 - frac)).floor();
        level as u8
    }

    /// True when a physics object sits within `object_distance` of the node
    fn physics_relevant(&self, center: Vec3, radius: f32, objects: &[SceneObject]) -> bool {
        let reach = self.object_distance + radius;
        let reach2 = reach * reach;
        objects
            .iter()
            .filter(|o| o.physics)
            .any(|o| o.position.distance_squared(center) <= reach2)
    }

    /// The level a node should be generated at.
    ///
    /// Never below `min_physics_level` for physics-relevant nodes.
    pub fn target_level(
        &self,
        center: Vec3,
        radius: f32,
        camera: Vec3,
        objects: &[SceneObject],
    ) -> u8 {
        let distance = (camera.distance(center) - radius).max(0.0);
        let mut level = self.camera_level(distance);

        if self.physics_relevant(center, radius, objects) {
            level = level.max(self.min_physics_level);
        }

        level.min(self.max_level)
    }

    /// Split/merge decision for one node, with hysteresis.
    pub fn decide(&self, node: &ChunkNode, camera: Vec3, objects: &[SceneObject]) -> LodDecision {
        let (cx, cy, cz) = node.box_center();
        let center = Vec3::new(cx, cy, cz);
        let radius = node.bounds().radius();
        let level = node.level();

        let target = self.target_level(center, radius, camera, objects);
        if target > level && level < self.max_level {
            return LodDecision::Split;
        }

        // evaluate the merge side as if the camera were closer; only merge
        // when even that inflated target stays below the node's level
        let pulled = Vec3::new(
            center.x + (camera.x - center.x) / (1.0 + MERGE_HYSTERESIS),
            center.y + (camera.y - center.y) / (1.0 + MERGE_HYSTERESIS),
            center.z + (camera.z - center.z) / (1.0 + MERGE_HYSTERESIS),
        );
        let merge_target = self.target_level(center, radius, pulled, objects);
        if merge_target < level {
            return LodDecision::Merge;
        }

        LodDecision::Keep
    }
}
