//! Terrain settings and the terrain instance

use serde::{Deserialize, Serialize};
use tracing::warn;

use terra_chunk::{ChunkNode, ChunkState, DebugFlags, LodSelector};
use terra_core::{NodeKey, Rect, SceneObject};
use terra_field::{FieldSampler, ResourceSet, VertexSample, ZoneList};

/// Top-level terrain settings.
///
/// These are the documented defaults a "new terrain" starts from; hosts
/// load and persist them through [`crate::TerrainConfig`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TerrainSettings {
    /// Quadtree depth cap; leaves at this level are `chunk_size` wide
    #[serde(default = "default_max_level")]
    pub max_level: u8,
    /// Minimum subdivision level for physics-relevant chunks
    #[serde(default)]
    pub min_physics_level: u8,
    /// World extent along both axes
    #[serde(default = "default_width")]
    pub width: f32,
    /// World width of a fully subdivided leaf chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: f32,
    /// Quads per chunk edge; vertices per edge is this plus one
    #[serde(default = "default_subdivision")]
    pub vertex_subdivision: u32,
    /// Chunks closer than this to the camera use `max_level`
    #[serde(default = "default_camera_distance")]
    pub camera_distance: f32,
    /// Physics objects force `min_physics_level` within this distance
    #[serde(default = "default_object_distance")]
    pub object_distance: f32,
    /// LOD falls to level 0 beyond `camera_distance * margin_factor`
    #[serde(default = "default_margin_factor")]
    pub margin_factor: f32,
    /// Render material, an opaque reference the engine never resolves
    #[serde(default)]
    pub material: Option<String>,
    /// Seed for every noise-driven zone of this terrain
    #[serde(default)]
    pub seed: u32,
    /// Frames a cached vertex sample survives without being touched
    #[serde(default = "default_cache_refresh")]
    pub cache_refresh_time: u32,
    /// Overlay counters toggles
    #[serde(default)]
    pub debug: DebugFlags,
    /// Frames between emitted timing lines; 0 disables them
    #[serde(default = "default_time_frame")]
    pub debug_time_frame: u32,
}

fn default_max_level() -> u8 {
    4
}

fn default_width() -> f32 {
    320.0
}

fn default_chunk_size() -> f32 {
    10.0
}

fn default_subdivision() -> u32 {
    8
}

fn default_camera_distance() -> f32 {
    100.0
}

fn default_object_distance() -> f32 {
    50.0
}

fn default_margin_factor() -> f32 {
    4.0
}

fn default_cache_refresh() -> u32 {
    32
}

fn default_time_frame() -> u32 {
    60
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            max_level: default_max_level(),
            min_physics_level: 0,
            width: default_width(),
            chunk_size: default_chunk_size(),
            vertex_subdivision: default_subdivision(),
            camera_distance: default_camera_distance(),
            object_distance: default_object_distance(),
            margin_factor: default_margin_factor(),
            material: None,
            seed: 0,
            cache_refresh_time: default_cache_refresh(),
            debug: DebugFlags::default(),
            debug_time_frame: default_time_frame(),
        }
    }
}

impl TerrainSettings {
    /// Clamp inconsistent values into a usable range. A physics level
    /// above `max_level` is clamped, not rejected: loading a config must
    /// not fail over a recoverable inconsistency.
    pub fn validated(mut self) -> Self {
        if self.min_physics_level > self.max_level {
            warn!(
                min_physics_level = self.min_physics_level,
                max_level = self.max_level,
                "min_physics_level exceeds max_level, clamping"
            );
            self.min_physics_level = self.max_level;
        }
        if !(self.width > 0.0) {
            self.width = default_width();
        }
        if !(self.chunk_size > 0.0) {
            self.chunk_size = default_chunk_size();
        }
        self.vertex_subdivision = self.vertex_subdivision.max(1);
        self.margin_factor = self.margin_factor.max(1.0);
        if !(self.camera_distance >= 0.0) {
            self.camera_distance = 0.0;
        }
        if !(self.object_distance >= 0.0) {
            self.object_distance = 0.0;
        }
        self
    }

    /// World width covered by one root node
    pub fn root_extent(&self) -> f32 {
        self.chunk_size * (1u32 << self.max_level) as f32
    }

    /// Vertex spacing of a fully subdivided leaf; every coarser level's
    /// vertices land on multiples of it
    pub fn leaf_spacing(&self) -> f32 {
        self.chunk_size / self.vertex_subdivision as f32
    }
}

/// Aggregate counters for host inspection
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TerrainStats {
    pub roots: usize,
    pub leaves: usize,
    pub internal_nodes: usize,
    pub ready_chunks: usize,
}

/// One terrain instance: settings, zone configuration, resolved
/// resources, and the quadtree of chunks.
///
/// Explicitly owned by whichever host object creates it; the engine
/// update borrows it rather than reaching for any global.
pub struct Terrain {
    settings: TerrainSettings,
    zones: ZoneList,
    resources: ResourceSet,
    roots: Vec<ChunkNode>,
}

impl Terrain {
    /// Create a terrain with the given settings and an empty zone list.
    /// Root nodes are laid out on a grid covering `[0, width)²`; the
    /// grid rounds up to whole roots, so the tree may extend slightly
    /// past `width` when it does not divide evenly.
    pub fn new(settings: TerrainSettings) -> Self {
        let settings = settings.validated();
        let extent = settings.root_extent();
        let per_axis = (settings.width / extent).ceil().max(1.0) as u32;

        let mut roots = Vec::with_capacity((per_axis * per_axis) as usize);
        for gy in 0..per_axis {
            for gx in 0..per_axis {
                let min_x = gx as f32 * extent;
                let min_y = gy as f32 * extent;
                roots.push(ChunkNode::new(
                    NodeKey::new(0, gx, gy),
                    Rect::new(min_x, min_y, min_x + extent, min_y + extent),
                ));
            }
        }

        Self {
            settings,
            zones: ZoneList::new(),
            resources: ResourceSet::new(),
            roots,
        }
    }

    /// A terrain with the documented defaults ("new terrain" command)
    pub fn with_defaults() -> Self {
        Self::new(TerrainSettings::default())
    }

    pub fn settings(&self) -> &TerrainSettings {
        &self.settings
    }

    pub fn zones(&self) -> &ZoneList {
        &self.zones
    }

    /// Direct zone access. Mutating through this between frames is the
    /// caller's responsibility; during a frame, use the command queue.
    pub fn zones_mut(&mut self) -> &mut ZoneList {
        &mut self.zones
    }

    pub fn resources(&self) -> &ResourceSet {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut ResourceSet {
        &mut self.resources
    }

    pub fn roots(&self) -> &[ChunkNode] {
        &self.roots
    }

    pub fn roots_mut(&mut self) -> &mut [ChunkNode] {
        &mut self.roots
    }

    /// Refresh the per-frame snapshot of host scene objects
    pub fn update_objects(&mut self, objects: &[SceneObject]) {
        self.resources.update_objects(objects);
    }

    /// A sampler over the current zone configuration
    pub fn sampler(&self) -> FieldSampler<'_> {
        FieldSampler::new(
            &self.zones,
            &self.resources,
            self.settings.width,
            self.settings.seed,
        )
    }

    /// Composite surface sample at a world coordinate
    pub fn sample(&self, x: f32, y: f32) -> VertexSample {
        self.sampler().sample(x, y)
    }

    /// The LOD parameters for this frame
    pub fn lod_selector(&self) -> LodSelector {
        LodSelector {
            max_level: self.settings.max_level,
            min_physics_level: self.settings.min_physics_level,
            camera_distance: self.settings.camera_distance,
            object_distance: self.settings.object_distance,
            margin_factor: self.settings.margin_factor,
        }
    }

    /// Mark every generated chunk stale after a configuration edit
    pub fn mark_all_stale(&mut self) {
        for root in &mut self.roots {
            root.mark_stale();
        }
    }

    /// The deepest node containing the point
    pub fn node_at(&self, x: f32, y: f32) -> Option<&ChunkNode> {
        self.roots.iter().find_map(|r| r.node_at(x, y))
    }

    /// Borrows for the parallel generation pass: an immutable sampler
    /// over the zone configuration alongside mutable access to the tree.
    pub fn generation_parts(&mut self) -> (FieldSampler<'_>, u32, &mut [ChunkNode]) {
        let sampler = FieldSampler::new(
            &self.zones,
            &self.resources,
            self.settings.width,
            self.settings.seed,
        );
        (sampler, self.settings.vertex_subdivision, &mut self.roots)
    }

    pub fn stats(&self) -> TerrainStats {
        TerrainStats {
            roots: self.roots.len(),
            leaves: self.roots.iter().map(|r| r.leaf_count()).sum(),
            internal_nodes: self.roots.iter().map(|r| r.internal_count()).sum(),
            ready_chunks: self.roots.iter().map(|r| r.ready_count()).sum(),
        }
    }

    /// Concatenate every Ready leaf mesh into one trimesh for an external
    /// physics collider. Returns (vertices, triangle indices).
    pub fn trimesh_data(&self) -> (Vec<[f32; 3]>, Vec<[u32; 3]>) {
        let mut vertices = Vec::new();
        let mut triangles = Vec::new();
        let mut base_index: u32 = 0;

        for root in &self.roots {
            root.for_each_leaf(&mut |leaf| {
                if leaf.chunk().state() != ChunkState::Ready {
                    return;
                }
                let Some(mesh) = leaf.chunk().mesh() else {
                    return;
                };

                vertices.extend_from_slice(&mesh.positions);
                for tri in mesh.indices.chunks(3) {
                    triangles.push([
                        tri[0] + base_index,
                        tri[1] + base_index,
                        tri[2] + base_index,
                    ]);
                }
                base_index += mesh.positions.len() as u32;
            });
        }

        (vertices, triangles)
    }

    /// Height at a point, shorthand used by hosts for object placement
    pub fn height_at(&self, x: f32, y: f32) -> f32 {
        self.sample(x, y).height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terra_field::Zone;

    #[test]
    fn default_settings_are_consistent() {
        let s = TerrainSettings::default().validated();
        assert!(s.min_physics_level <= s.max_level);
        assert!(s.width > 0.0);
        assert!(s.margin_factor >= 1.0);
    }

    #[test]
    fn excessive_physics_level_is_clamped() {
        let s = TerrainSettings {
            max_level: 3,
            min_physics_level: 9,
            ..TerrainSettings::default()
        }
        .validated();
        assert_eq!(s.min_physics_level, 3);
    }

    #[test]
    fn negative_lod_distances_are_clamped_to_zero() {
        let s = TerrainSettings {
            camera_distance: -25.0,
            object_distance: -10.0,
            ..TerrainSettings::default()
        }
        .validated();
        assert_eq!(s.camera_distance, 0.0);
        assert_eq!(s.object_distance, 0.0);
    }

    #[test]
    fn root_grid_covers_the_width() {
        let terrain = Terrain::new(TerrainSettings {
            max_level: 2,
            chunk_size: 10.0,
            width: 40.0,
            ..TerrainSettings::default()
        });
        // root extent = 10 * 4 = 40, one root covers everything
        assert_eq!(terrain.roots().len(), 1);
        assert_eq!(terrain.roots()[0].bounds().width(), 40.0);

        let wide = Terrain::new(TerrainSettings {
            max_level: 2,
            chunk_size: 10.0,
            width: 100.0,
            ..TerrainSettings::default()
        });
        // 100 / 40 rounds up to a 3x3 root grid
        assert_eq!(wide.roots().len(), 9);
    }

    #[test]
    fn sampling_respects_zone_amplitude() {
        let mut terrain = Terrain::new(TerrainSettings {
            max_level: 2,
            chunk_size: 10.0,
            width: 40.0,
            seed: 7,
            ..TerrainSettings::default()
        });
        terrain.zones_mut().add(Zone::noise("base", 1.0, 5.0));

        for &(x, y) in &[(5.0, 5.0), (15.0, 5.0), (5.0, 15.0), (15.0, 15.0)] {
            let h = terrain.height_at(x, y);
            assert!(h.is_finite());
            assert!((-5.0..=5.0).contains(&h));
        }
    }

    #[test]
    fn node_at_finds_the_root_initially() {
        let terrain = Terrain::new(TerrainSettings {
            max_level: 2,
            chunk_size: 10.0,
            width: 40.0,
            ..TerrainSettings::default()
        });
        let node = terrain.node_at(20.0, 20.0).unwrap();
        assert_eq!(node.level(), 0);
        assert!(terrain.node_at(45.0, 5.0).is_none());
    }

    #[test]
    fn empty_terrain_exports_an_empty_trimesh() {
        let terrain = Terrain::with_defaults();
        let (verts, tris) = terrain.trimesh_data();
        assert!(verts.is_empty());
        assert!(tris.is_empty());
    }
}
