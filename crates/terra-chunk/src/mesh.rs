//! Leaf chunk mesh generation

use terra_core::{Rect, Result, TerraError};
use terra_field::{FieldSampler, VertexSample};

use crate::cache::{CacheKey, SampleCache};

/// Generated geometry for one leaf chunk.
///
/// Plain vertex buffers: the renderer and the physics exporter consume
/// these without this crate depending on either.
#[derive(Clone, Debug, Default)]
pub struct ChunkMesh {
    /// Vertex positions in world space, Z-up
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals
    pub normals: Vec<[f32; 3]>,
    /// Per-vertex RGBA colors from the zone blend
    pub colors: Vec<[f32; 4]>,
    /// UV coordinates, normalized over the entire terrain
    pub uvs: Vec<[f32; 2]>,
    /// Triangle indices (CCW winding seen from +Z)
    pub indices: Vec<u32>,
    /// AABB minimum corner
    pub aabb_min: [f32; 3],
    /// AABB maximum corner
    pub aabb_max: [f32; 3],
}

impl ChunkMesh {
    /// An empty mesh (for tests)
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// The height range covered by this mesh
    pub fn height_range(&self) -> (f32, f32) {
        (self.aabb_min[2], self.aabb_max[2])
    }
}

/// Generate the mesh for a leaf chunk by evaluating the zone blend on a
/// `(subdivision + 1)^2` grid across the chunk's bounds.
///
/// `subdivision` is the number of quads per chunk edge. Normals come from
/// central differences of the composite height field at half-cell offsets.
pub fn generate_mesh(
    sampler: &FieldSampler<'_>,
    bounds: Rect,
    subdivision: u32,
) -> Result<ChunkMesh> {
    let mut touched = Vec::new();
    generate_mesh_inner(sampler, bounds, subdivision, None, &mut touched)
}

/// Like [`generate_mesh`], but consults a shared [`SampleCache`] for grid
/// vertices and reports every touched sample into `touched` so the caller
/// can absorb them back into the cache after the parallel pass joins.
pub fn generate_mesh_cached(
    sampler: &FieldSampler<'_>,
    bounds: Rect,
    subdivision: u32,
    cache: &SampleCache,
    touched: &mut Vec<(CacheKey, VertexSample)>,
) -> Result<ChunkMesh> {
    generate_mesh_inner(sampler, bounds, subdivision, Some(cache), touched)
}

fn generate_mesh_inner(
    sampler: &FieldSampler<'_>,
    bounds: Rect,
    subdivision: u32,
    cache: Option<&SampleCache>,
    touched: &mut Vec<(CacheKey, VertexSample)>,
) -> Result<ChunkMesh> {
    let subdivision = subdivision.max(1);
    if !(bounds.width() > 0.0 && bounds.height() > 0.0) {
        return Err(TerraError::GenerationError(format!(
            "degenerate chunk bounds {:?}",
            bounds
        )));
    }

    let verts_per_edge = subdivision + 1;
    let vert_count = (verts_per_edge * verts_per_edge) as usize;

    let mut positions = Vec::with_capacity(vert_count);
    let mut normals = Vec::with_capacity(vert_count);
    let mut colors = Vec::with_capacity(vert_count);
    let mut uvs = Vec::with_capacity(vert_count);

    let mut aabb_min = [f32::MAX; 3];
    let mut aabb_max = [f32::MIN; 3];

    let step_x = bounds.width() / subdivision as f32;
    let step_y = bounds.height() / subdivision as f32;

    for vy in 0..verts_per_edge {
        for vx in 0..verts_per_edge {
            let x = bounds.min_x + vx as f32 * step_x;
            let y = bounds.min_y + vy as f32 * step_y;

            let sample = match cache {
                Some(cache) => {
                    let key = cache.key(x, y);
                    let sample = cache
                        .lookup(key)
                        .unwrap_or_else(|| sampler.sample(x, y));
                    touched.push((key, sample));
                    sample
                }
                None => sampler.sample(x, y),
            };
            let pos = [x, y, sample.height];

            for i in 0..3 {
                aabb_min[i] = aabb_min[i].min(pos[i]);
                aabb_max[i] = aabb_max[i].max(pos[i]);
            }

            positions.push(pos);
            normals.push(surface_normal(sampler, x, y, step_x, step_y));
            colors.push([
                sample.color.r,
                sample.color.g,
                sample.color.b,
                sample.color.a,
            ]);
            uvs.push(sample.uv);
        }
    }

    if !(aabb_min.iter().all(|v| v.is_finite()) && aabb_max.iter().all(|v| v.is_finite())) {
        return Err(TerraError::GenerationError(format!(
            "non-finite geometry in chunk {:?}",
            bounds
        )));
    }

    // two CCW triangles per quad
    let mut indices = Vec::with_capacity((subdivision * subdivision * 6) as usize);
    for qy in 0..subdivision {
        for qx in 0..subdivision {
            let bl = qy * verts_per_edge + qx;
            let br = bl + 1;
            let tl = bl + verts_per_edge;
            let tr = tl + 1;

            indices.push(bl);
            indices.push(br);
            indices.push(tr);

            indices.push(bl);
            indices.push(tr);
            indices.push(tl);
        }
    }

    Ok(ChunkMesh {
        positions,
        normals,
        colors,
        uvs,
        indices,
        aabb_min,
        aabb_max,
    })
}

/// Normal of the composite surface from central height differences
fn surface_normal(sampler: &FieldSampler<'_>, x: f32, y: f32, step_x: f32, step_y: f32) -> [f32; 3] {
    let ex = step_x * 0.5;
    let ey = step_y * 0.5;

    let h_left = sampler.sample_height(x - ex, y);
    let h_right = sampler.sample_height(x + ex, y);
    let h_down = sampler.sample_height(x, y - ey);
    let h_up = sampler.sample_height(x, y + ey);

    let dx = (h_right - h_left) / (2.0 * ex);
    let dy = (h_up - h_down) / (2.0 * ey);

    let nx = -dx;
    let ny = -dy;
    let nz = 1.0;
    let len = (nx * nx + ny * ny + nz * nz).sqrt();

    [nx / len, ny / len, nz / len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use terra_field::{ResourceSet, Zone, ZoneList};

    #[test]
    fn flat_terrain_generates_expected_counts() {
        let zones = ZoneList::new();
        let resources = ResourceSet::new();
        let sampler = FieldSampler::new(&zones, &resources, 10.0, 0);

        let mesh = generate_mesh(&sampler, Rect::new(0.0, 0.0, 10.0, 10.0), 3).unwrap();
        // subdivision 3 means 4 verts per edge
        assert_eq!(mesh.vertex_count(), 16);
        assert_eq!(mesh.triangle_count(), 3 * 3 * 2);
        assert_eq!(mesh.aabb_min[2], 0.0);
        assert_eq!(mesh.aabb_max[2], 0.0);
    }

    #[test]
    fn flat_terrain_normals_point_up() {
        let zones = ZoneList::new();
        let resources = ResourceSet::new();
        let sampler = FieldSampler::new(&zones, &resources, 10.0, 0);

        let mesh = generate_mesh(&sampler, Rect::new(0.0, 0.0, 10.0, 10.0), 2).unwrap();
        for n in &mesh.normals {
            assert!(n[0].abs() < 0.01);
            assert!(n[1].abs() < 0.01);
            assert!((n[2] - 1.0).abs() < 0.01);
        }
    }

    #[test]
    fn indices_stay_in_range() {
        let mut zones = ZoneList::new();
        zones.add(Zone::noise("base", 2.0, 3.0));
        let resources = ResourceSet::new();
        let sampler = FieldSampler::new(&zones, &resources, 20.0, 3);

        let mesh = generate_mesh(&sampler, Rect::new(0.0, 0.0, 20.0, 20.0), 4).unwrap();
        for &i in &mesh.indices {
            assert!((i as usize) < mesh.vertex_count());
        }
    }

    #[test]
    fn aabb_tracks_noise_amplitude() {
        let mut zones = ZoneList::new();
        zones.add(Zone::noise("base", 1.0, 5.0));
        let resources = ResourceSet::new();
        let sampler = FieldSampler::new(&zones, &resources, 40.0, 1);

        let mesh = generate_mesh(&sampler, Rect::new(0.0, 0.0, 10.0, 10.0), 8).unwrap();
        let (lo, hi) = mesh.height_range();
        assert!(lo >= -5.0);
        assert!(hi <= 5.0);
        assert!(lo <= hi);
    }

    #[test]
    fn cached_generation_matches_uncached() {
        let mut zones = ZoneList::new();
        zones.add(Zone::noise("base", 1.5, 4.0));
        let resources = ResourceSet::new();
        let sampler = FieldSampler::new(&zones, &resources, 40.0, 2);
        let bounds = Rect::new(10.0, 10.0, 20.0, 20.0);

        let plain = generate_mesh(&sampler, bounds, 4).unwrap();

        let cache = SampleCache::new(10.0 / 4.0);
        let mut touched = Vec::new();
        let cached = generate_mesh_cached(&sampler, bounds, 4, &cache, &mut touched).unwrap();

        assert_eq!(plain.positions, cached.positions);
        assert_eq!(plain.colors, cached.colors);
        assert_eq!(touched.len(), cached.vertex_count());
    }

    #[test]
    fn degenerate_bounds_are_rejected() {
        let zones = ZoneList::new();
        let resources = ResourceSet::new();
        let sampler = FieldSampler::new(&zones, &resources, 10.0, 0);

        assert!(generate_mesh(&sampler, Rect::new(5.0, 5.0, 5.0, 5.0), 2).is_err());
    }
}
