//! Deterministic lattice value noise
//!
//! No rand crate: samples must be a pure, seedable function of the input
//! coordinates so regenerating a chunk always reproduces the same surface.

/// 2D integer hash to [0, 1)
fn hash_lattice(i: i32, j: i32, seed: u32) -> f32 {
    let mut x = (i as u64).wrapping_mul(0x27d4_eb2d);
    x ^= (j as u64).wrapping_mul(0x1656_6791_9e37_79f9);
    x ^= (seed as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    let u = x ^ (x >> 31);
    (u as f64 / (u64::MAX as f64)) as f32
}

/// Quintic smoothstep, C2-continuous across lattice cells
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Raw value noise at lattice scale, in [-1, 1]
fn value_noise(x: f32, y: f32, seed: u32) -> f32 {
    let xi = x.floor() as i32;
    let yi = y.floor() as i32;
    let sx = fade(x - xi as f32);
    let sy = fade(y - yi as f32);

    let c00 = hash_lattice(xi, yi, seed);
    let c10 = hash_lattice(xi + 1, yi, seed);
    let c01 = hash_lattice(xi, yi + 1, seed);
    let c11 = hash_lattice(xi + 1, yi + 1, seed);

    let a = c00 * (1.0 - sx) + c10 * sx;
    let b = c01 * (1.0 - sx) + c11 * sx;
    (a * (1.0 - sy) + b * sy) * 2.0 - 1.0
}

/// A seeded noise field over world coordinates.
///
/// `resolution` is the feature size in world units: lattice cells are
/// `resolution` wide, so larger values produce broader hills.
#[derive(Clone, Copy, Debug)]
pub struct NoiseField {
    seed: u32,
    resolution: f32,
}

impl NoiseField {
    pub fn new(seed: u32, resolution: f32) -> Self {
        Self {
            seed,
            // degenerate resolutions collapse to a 1-unit lattice
            resolution: if resolution.is_finite() && resolution > 1e-6 {
                resolution
            } else {
                1.0
            },
        }
    }

    /// Continuous noise in [-1, 1] at a world coordinate
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        value_noise(x / self.resolution, y / self.resolution, self.seed)
    }
}
