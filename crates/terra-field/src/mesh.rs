//! Mesh-driven zone influence and clamp bounds
//!
//! A zone mesh is a triangle soup projected onto the terrain plane. Where
//! the projection covers a point, the zone has influence there and the
//! interpolated surface height can serve as a derived clamp bound.

use serde::{Deserialize, Serialize};
use terra_core::Rect;

/// Triangle mesh used as a zone influence mask and clamp source
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ZoneMesh {
    vertices: Vec<[f32; 3]>,
    triangles: Vec<[u32; 3]>,
    bounds: Rect,
    min_height: f32,
    max_height: f32,
}

impl ZoneMesh {
    /// Build a zone mesh from raw buffers. Triangle indices out of range
    /// are dropped rather than trusted.
    pub fn from_buffers(vertices: Vec<[f32; 3]>, triangles: Vec<[u32; 3]>) -> Self {
        let triangles: Vec<[u32; 3]> = triangles
            .into_iter()
            .filter(|t| t.iter().all(|&i| (i as usize) < vertices.len()))
            .collect();

        let mut bounds = Rect::new(f32::MAX, f32::MAX, f32::MIN, f32::MIN);
        let mut min_height = f32::MAX;
        let mut max_height = f32::MIN;
        for v in &vertices {
            bounds.min_x = bounds.min_x.min(v[0]);
            bounds.min_y = bounds.min_y.min(v[1]);
            bounds.max_x = bounds.max_x.max(v[0]);
            bounds.max_y = bounds.max_y.max(v[1]);
            min_height = min_height.min(v[2]);
            max_height = max_height.max(v[2]);
        }
        if vertices.is_empty() {
            bounds = Rect::new(0.0, 0.0, 0.0, 0.0);
            min_height = 0.0;
            max_height = 0.0;
        }

        Self {
            vertices,
            triangles,
            bounds,
            min_height,
            max_height,
        }
    }

    /// An axis-aligned quad at the given height, handy for tests and for
    /// simple rectangular masks.
    pub fn quad(rect: Rect, height: f32) -> Self {
        let vertices = vec![
            [rect.min_x, rect.min_y, height],
            [rect.max_x, rect.min_y, height],
            [rect.max_x, rect.max_y, height],
            [rect.min_x, rect.max_y, height],
        ];
        let triangles = vec![[0, 1, 2], [0, 2, 3]];
        Self::from_buffers(vertices, triangles)
    }

    pub fn min_height(&self) -> f32 {
        self.min_height
    }

    pub fn max_height(&self) -> f32 {
        self.max_height
    }

    /// Interpolated surface height where the XY projection covers the
    /// point, `None` outside the projection.
    pub fn height_at(&self, x: f32, y: f32) -> Option<f32> {
        if x < self.bounds.min_x
            || x > self.bounds.max_x
            || y < self.bounds.min_y
            || y > self.bounds.max_y
        {
            return None;
        }

        for tri in &self.triangles {
            let a = self.vertices[tri[0] as usize];
            let b = self.vertices[tri[1] as usize];
            let c = self.vertices[tri[2] as usize];
            if let Some((u, v, w)) = barycentric(x, y, a, b, c) {
                return Some(a[2] * u + b[2] * v + c[2] * w);
            }
        }
        None
    }

    /// 1.0 where the projected mesh covers the point, 0.0 elsewhere
    pub fn influence(&self, x: f32, y: f32) -> f32 {
        if self.height_at(x, y).is_some() {
            1.0
        } else {
            0.0
        }
    }
}

/// Barycentric coordinates of (x, y) in the XY projection of the triangle,
/// or `None` when the point lies outside (or the triangle is degenerate).
fn barycentric(x: f32, y: f32, a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Option<(f32, f32, f32)> {
    let v0 = (b[0] - a[0], b[1] - a[1]);
    let v1 = (c[0] - a[0], c[1] - a[1]);
    let v2 = (x - a[0], y - a[1]);

    let denom = v0.0 * v1.1 - v1.0 * v0.1;
    if denom.abs() < 1e-12 {
        return None;
    }

    let v = (v2.0 * v1.1 - v1.0 * v2.1) / denom;
    let w = (v0.0 * v2.1 - v2.0 * v0.1) / denom;
    let u = 1.0 - v - w;

    let eps = -1e-6;
    if u >= eps && v >= eps && w >= eps {
        Some((u, v, w))
    } else {
        None
    }
}
