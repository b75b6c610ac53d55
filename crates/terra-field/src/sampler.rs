//! The height field sampler and zone blender
//!
//! `FieldSampler::sample` composites every active zone, in list order, into
//! a single height/color/uv result for one world coordinate. It is a pure
//! function of the zone configuration and the pre-decoded resources: no
//! I/O, no mutation, no failure. Chunk generation calls it from worker
//! threads with the zone list borrowed immutably.

use serde::{Deserialize, Serialize};
use terra_core::Color;

use crate::noise::NoiseField;
use crate::resources::ResourceSet;
use crate::zone::{Zone, ZoneList};

/// One composited sample of the terrain surface
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VertexSample {
    pub height: f32,
    pub color: Color,
    pub uv: [f32; 2],
}

impl VertexSample {
    /// The sample of an empty terrain: flat, white, base parametrization
    pub fn flat(uv: [f32; 2]) -> Self {
        Self {
            height: 0.0,
            color: Color::WHITE,
            uv,
        }
    }
}

/// Samples the composite height field of one terrain.
///
/// Coordinates outside `[0, extent]` are clamped to the border before
/// sampling; the surface extends its edge values outward.
pub struct FieldSampler<'a> {
    zones: &'a ZoneList,
    resources: &'a ResourceSet,
    /// World width of the terrain along both axes
    extent: f32,
    /// Terrain-wide noise seed shared by every noise zone
    seed: u32,
}

impl<'a> FieldSampler<'a> {
    pub fn new(zones: &'a ZoneList, resources: &'a ResourceSet, extent: f32, seed: u32) -> Self {
        Self {
            zones,
            resources,
            extent: extent.max(1e-6),
            seed,
        }
    }

    /// Composite all active zones at a world coordinate. Always returns a
    /// finite height; zones with dangling references contribute zero.
    pub fn sample(&self, x: f32, y: f32) -> VertexSample {
        let x = x.clamp(0.0, self.extent);
        let y = y.clamp(0.0, self.extent);
        let uv = [x / self.extent, y / self.extent];

        let mut height = 0.0f32;
        let mut color = Color::WHITE;

        for zone in self.zones.iter() {
            if !zone.active {
                continue;
            }

            let influence = self.zone_influence(zone, x, y);
            if influence <= 0.0 {
                continue;
            }

            let contribution = self.zone_height(zone, x, y, uv);
            height += contribution * influence;
            height = self.apply_clamp(zone, height, x, y);

            let zone_color = self.zone_color(zone, contribution, uv);
            color = color.lerp(zone_color, influence);
        }

        if !height.is_finite() {
            height = 0.0;
        }

        VertexSample { height, color, uv }
    }

    /// Height convenience for callers that ignore color
    pub fn sample_height(&self, x: f32, y: f32) -> f32 {
        self.sample(x, y).height
    }

    /// Influence mask of one zone at a point. Mesh-projected and
    /// object-proximity sources combine by maximum; a zone with neither
    /// source covers the whole terrain. A source whose reference is
    /// missing contributes no influence.
    fn zone_influence(&self, zone: &Zone, x: f32, y: f32) -> f32 {
        if !zone.use_mesh && !zone.use_object {
            return 1.0;
        }

        let mut influence = 0.0f32;

        if zone.use_mesh {
            if let Some(mesh) = zone.mesh.as_deref().and_then(|n| self.resources.mesh(n)) {
                influence = influence.max(mesh.influence(x, y));
            }
        }

        if zone.use_object {
            if let Some(obj) = zone
                .group_object
                .as_deref()
                .and_then(|n| self.resources.object(n))
            {
                let radius = zone.object_influence.max(1e-6);
                let dx = x - obj.position.x;
                let dy = y - obj.position.y;
                let falloff = 1.0 - (dx * dx + dy * dy).sqrt() / radius;
                influence = influence.max(falloff.clamp(0.0, 1.0));
            }
        }

        influence
    }

    /// Raw height contribution of one zone before influence weighting.
    /// Noise zones share the terrain seed, so the surface a zone produces
    /// depends only on its own settings, never on its list position.
    fn zone_height(&self, zone: &Zone, x: f32, y: f32, uv: [f32; 2]) -> f32 {
        let mut h = zone.offset;

        if zone.use_noise {
            let field = NoiseField::new(self.seed, zone.resolution);
            h += field.sample(x, y) * zone.noise_height;
        }

        if zone.use_image {
            if let Some(img) = zone.image.as_deref().and_then(|n| self.resources.image(n)) {
                h += img.sample(uv[0], uv[1]) * zone.image_height;
            }
        }

        h
    }

    /// Clamp the running composite height per zone configuration.
    ///
    /// Precedence: mesh-derived bounds beat object-derived bounds beat the
    /// static `clamp_start`/`clamp_end` pair; when a derived source applies
    /// the static fields are ignored entirely. Mesh bounds are the mesh's
    /// minimum height up to its surface at the sampled point (its maximum
    /// outside the projection). Object bounds are the object's own height,
    /// reaching down by the zone's influence radius.
    fn apply_clamp(&self, zone: &Zone, height: f32, x: f32, y: f32) -> f32 {
        if zone.use_clamp_mesh {
            if let Some(mesh) = zone.mesh.as_deref().and_then(|n| self.resources.mesh(n)) {
                let ceiling = mesh.height_at(x, y).unwrap_or(mesh.max_height());
                return height.clamp(mesh.min_height(), ceiling.max(mesh.min_height()));
            }
            return height;
        }

        if zone.use_clamp_object {
            if let Some(obj) = zone
                .group_object
                .as_deref()
                .and_then(|n| self.resources.object(n))
            {
                let ceiling = obj.position.z;
                let floor = ceiling - zone.object_influence.max(0.0);
                return height.clamp(floor, ceiling);
            }
            return height;
        }

        if zone.use_clamp {
            let (lo, hi) = if zone.clamp_start <= zone.clamp_end {
                (zone.clamp_start, zone.clamp_end)
            } else {
                (zone.clamp_end, zone.clamp_start)
            };
            return height.clamp(lo, hi);
        }

        height
    }

    /// The color a zone emits at a point, before influence blending
    fn zone_color(&self, zone: &Zone, contribution: f32, uv: [f32; 2]) -> Color {
        let mut color = zone.color;

        if zone.use_uv_texture_color {
            if let Some(tex) = zone
                .texture
                .as_deref()
                .and_then(|n| self.resources.texture(n))
            {
                // each successive UV channel tiles the base
                // parametrization one more time
                let tiling = (zone.uv_channel as f32) + 1.0;
                let tu = (uv[0] * tiling).fract();
                let tv = (uv[1] * tiling).fract();
                color = tex.sample(tu, tv);
            }
        }

        if zone.use_height_color {
            let amp = if zone.use_noise {
                zone.noise_height.abs()
            } else if zone.use_image {
                zone.image_height.abs()
            } else {
                1.0
            };
            let t = if amp > 1e-6 {
                (((contribution - zone.offset) / amp) * 0.5 + 0.5).clamp(0.0, 1.0)
            } else {
                1.0
            };
            color = color.scale_rgb(t);
        }

        if zone.use_color_dividor && zone.color_dividor.abs() > 1e-6 {
            color = color.scale_rgb(1.0 / zone.color_dividor);
        }

        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terra_core::{Rect, SceneObject, Vec3};

    use crate::mesh::ZoneMesh;

    fn full_noise_zone(name: &str, noise_height: f32) -> Zone {
        Zone::noise(name, 1.0, noise_height)
    }

    #[test]
    fn empty_zone_list_is_flat_everywhere() {
        let zones = ZoneList::new();
        let resources = ResourceSet::new();
        let sampler = FieldSampler::new(&zones, &resources, 40.0, 0);

        for i in 0..20 {
            let s = sampler.sample(i as f32 * 2.0, i as f32 * 1.7);
            assert_eq!(s.height, 0.0);
        }
    }

    #[test]
    fn noise_zone_heights_stay_within_amplitude() {
        let mut zones = ZoneList::new();
        zones.add(full_noise_zone("base", 5.0));
        let resources = ResourceSet::new();
        let sampler = FieldSampler::new(&zones, &resources, 40.0, 1);

        // the four chunk centers of a max_level=2, chunk_size=10 terrain
        for &(x, y) in &[(5.0, 5.0), (15.0, 5.0), (5.0, 15.0), (15.0, 15.0)] {
            let h = sampler.sample_height(x, y);
            assert!(h.is_finite());
            assert!((-5.0..=5.0).contains(&h), "height {} out of range", h);
        }
    }

    #[test]
    fn inactive_zone_contributes_nothing() {
        let mut zones = ZoneList::new();
        zones.add(full_noise_zone("base", 5.0));
        zones.active_mut().unwrap().active = false;
        let resources = ResourceSet::new();
        let sampler = FieldSampler::new(&zones, &resources, 40.0, 1);

        for i in 0..32 {
            let h = sampler.sample_height(i as f32 * 1.3, 40.0 - i as f32);
            assert_eq!(h, 0.0);
        }
    }

    #[test]
    fn sampling_is_pure_and_deterministic() {
        let mut zones = ZoneList::new();
        zones.add(full_noise_zone("base", 3.0));
        let resources = ResourceSet::new();
        let sampler = FieldSampler::new(&zones, &resources, 100.0, 9);

        let a = sampler.sample(12.5, 33.0);
        let b = sampler.sample(12.5, 33.0);
        assert_eq!(a, b);
    }

    #[test]
    fn out_of_range_coordinates_clamp_to_border() {
        let mut zones = ZoneList::new();
        zones.add(full_noise_zone("base", 2.0));
        let resources = ResourceSet::new();
        let sampler = FieldSampler::new(&zones, &resources, 50.0, 4);

        assert_eq!(
            sampler.sample(-10.0, 25.0).height,
            sampler.sample(0.0, 25.0).height
        );
        assert_eq!(
            sampler.sample(25.0, 99.0).height,
            sampler.sample(25.0, 50.0).height
        );
    }

    #[test]
    fn missing_image_reference_yields_zero_contribution() {
        let mut zones = ZoneList::new();
        let mut zone = Zone::new("img");
        zone.use_image = true;
        zone.image = Some("does-not-exist".into());
        zone.image_height = 100.0;
        zones.add(zone);
        let resources = ResourceSet::new();
        let sampler = FieldSampler::new(&zones, &resources, 10.0, 0);

        assert_eq!(sampler.sample_height(5.0, 5.0), 0.0);
    }

    #[test]
    fn noise_surface_survives_removal_of_a_neighbor_zone() {
        let resources = ResourceSet::new();

        let mut zones = ZoneList::new();
        let mut mask = Zone::new("mask");
        mask.active = false;
        zones.add(mask);
        zones.add(full_noise_zone("hills", 5.0));

        let before = FieldSampler::new(&zones, &resources, 40.0, 7).sample_height(5.0, 5.0);

        zones.set_active(0);
        zones.remove_active();

        let after = FieldSampler::new(&zones, &resources, 40.0, 7).sample_height(5.0, 5.0);
        assert_eq!(before, after);
    }

    #[test]
    fn reordering_noise_zones_keeps_the_composite_height() {
        let resources = ResourceSet::new();

        let mut forward = ZoneList::new();
        forward.add(Zone::noise("coarse", 2.0, 3.0));
        forward.add(Zone::noise("fine", 0.5, 1.0));

        let mut reversed = ZoneList::new();
        reversed.add(Zone::noise("fine", 0.5, 1.0));
        reversed.add(Zone::noise("coarse", 2.0, 3.0));

        let fs = FieldSampler::new(&forward, &resources, 40.0, 11);
        let rs = FieldSampler::new(&reversed, &resources, 40.0, 11);

        for &(x, y) in &[(5.0, 5.0), (17.5, 3.25), (33.0, 38.0)] {
            assert_eq!(fs.sample_height(x, y), rs.sample_height(x, y));
        }
    }

    #[test]
    fn zone_order_changes_color_not_coverage() {
        let mesh = ZoneMesh::quad(Rect::new(0.0, 0.0, 10.0, 10.0), 0.0);

        let make_zone = |name: &str, r: f32| {
            let mut z = Zone::new(name);
            z.use_mesh = true;
            z.mesh = Some("mask".into());
            z.offset = 1.0;
            z.color = Color::new(r, 0.0, 0.0, 1.0);
            z
        };

        let mut resources = ResourceSet::new();
        resources.insert_mesh("mask", mesh);

        let mut forward = ZoneList::new();
        forward.add(make_zone("red", 1.0));
        forward.add(make_zone("dark", 0.25));

        let mut reversed = ZoneList::new();
        reversed.add(make_zone("dark", 0.25));
        reversed.add(make_zone("red", 1.0));

        let fs = FieldSampler::new(&forward, &resources, 20.0, 0);
        let rs = FieldSampler::new(&reversed, &resources, 20.0, 0);

        // inside the mask: same affected height, different winning color
        let f = fs.sample(5.0, 5.0);
        let r = rs.sample(5.0, 5.0);
        assert_eq!(f.height, r.height);
        assert_ne!(f.color, r.color);

        // outside the mask: both untouched
        assert_eq!(fs.sample(15.0, 15.0).height, 0.0);
        assert_eq!(rs.sample(15.0, 15.0).height, 0.0);
    }

    #[test]
    fn static_clamp_bounds_the_composite() {
        let mut zones = ZoneList::new();
        let mut zone = Zone::new("plateau");
        zone.offset = 10.0;
        zone.use_clamp = true;
        zone.clamp_start = 0.0;
        zone.clamp_end = 4.0;
        zones.add(zone);
        let resources = ResourceSet::new();
        let sampler = FieldSampler::new(&zones, &resources, 10.0, 0);

        assert_eq!(sampler.sample_height(5.0, 5.0), 4.0);
    }

    #[test]
    fn mesh_clamp_takes_precedence_over_static() {
        let mut resources = ResourceSet::new();
        resources.insert_mesh("cap", ZoneMesh::quad(Rect::new(0.0, 0.0, 10.0, 10.0), 2.0));

        let mut zones = ZoneList::new();
        let mut zone = Zone::new("plateau");
        zone.offset = 10.0;
        zone.use_mesh = true;
        zone.mesh = Some("cap".into());
        zone.use_clamp = true;
        zone.use_clamp_mesh = true;
        // static bounds would allow 8.0; the mesh surface wins
        zone.clamp_start = 0.0;
        zone.clamp_end = 8.0;
        zones.add(zone);

        let sampler = FieldSampler::new(&zones, &resources, 10.0, 0);
        assert_eq!(sampler.sample_height(5.0, 5.0), 2.0);
    }

    #[test]
    fn object_clamp_applies_when_no_mesh_clamp() {
        let mut resources = ResourceSet::new();
        let obj = SceneObject::new("anchor", Vec3::new(5.0, 5.0, 3.0));
        resources.update_objects([&obj]);

        let mut zones = ZoneList::new();
        let mut zone = Zone::new("plateau");
        zone.offset = 10.0;
        zone.use_clamp = true;
        zone.use_clamp_object = true;
        zone.group_object = Some("anchor".into());
        zone.clamp_end = 8.0;
        zones.add(zone);

        let sampler = FieldSampler::new(&zones, &resources, 10.0, 0);
        assert_eq!(sampler.sample_height(5.0, 5.0), 3.0);
    }

    #[test]
    fn object_influence_falls_off_with_distance() {
        let mut resources = ResourceSet::new();
        let obj = SceneObject::new("peak", Vec3::new(50.0, 50.0, 0.0));
        resources.update_objects([&obj]);

        let mut zones = ZoneList::new();
        let mut zone = Zone::new("bump");
        zone.offset = 10.0;
        zone.use_object = true;
        zone.group_object = Some("peak".into());
        zone.object_influence = 10.0;
        zones.add(zone);

        let sampler = FieldSampler::new(&zones, &resources, 100.0, 0);
        let at_center = sampler.sample_height(50.0, 50.0);
        let halfway = sampler.sample_height(55.0, 50.0);
        let outside = sampler.sample_height(70.0, 50.0);

        assert!((at_center - 10.0).abs() < 1e-4);
        assert!(halfway > 0.0 && halfway < at_center);
        assert_eq!(outside, 0.0);
    }
}
