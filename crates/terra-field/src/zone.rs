//! Zones: named rules contributing height, color, and clamp behavior

use serde::{Deserialize, Serialize};
use terra_core::Color;

/// Direction for moving the active zone within the list
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveDirection {
    /// Towards the front of the list (earlier in blend order)
    Up,
    /// Towards the back of the list (later in blend order)
    Down,
}

/// A single terrain zone.
///
/// Height sources (noise, image) and influence sources (mesh, object) are
/// gated by their `use_*` flag; fields behind a disabled flag are preserved
/// but never consulted during sampling.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    #[serde(default = "default_true")]
    pub active: bool,
    /// Constant height offset applied wherever the zone has influence
    #[serde(default)]
    pub offset: f32,

    // Noise height source
    #[serde(default)]
    pub use_noise: bool,
    /// Noise feature size in world units. Larger values stretch features.
    #[serde(default = "default_one")]
    pub resolution: f32,
    /// Noise amplitude: heights land in [-noise_height, noise_height]
    #[serde(default = "default_one")]
    pub noise_height: f32,

    // Image height source
    #[serde(default)]
    pub use_image: bool,
    /// Name of a height image in the terrain's resource set
    #[serde(default)]
    pub image: Option<String>,
    /// Image sample 1.0 maps to this height
    #[serde(default = "default_one")]
    pub image_height: f32,

    // Influence sources
    #[serde(default)]
    pub use_mesh: bool,
    /// Name of an influence mesh in the resource set
    #[serde(default)]
    pub mesh: Option<String>,
    #[serde(default)]
    pub use_object: bool,
    /// Name of a scene object whose proximity drives influence
    #[serde(default)]
    pub group_object: Option<String>,
    /// Influence falloff radius around `group_object`, in world units
    #[serde(default = "default_influence")]
    pub object_influence: f32,

    // Clamping
    #[serde(default)]
    pub use_clamp: bool,
    #[serde(default)]
    pub use_clamp_mesh: bool,
    #[serde(default)]
    pub use_clamp_object: bool,
    #[serde(default)]
    pub clamp_start: f32,
    #[serde(default = "default_one")]
    pub clamp_end: f32,

    // Color / UV
    #[serde(default)]
    pub use_uv_texture_color: bool,
    /// Name of a color texture in the resource set
    #[serde(default)]
    pub texture: Option<String>,
    /// UV channel index exported with the generated vertices
    #[serde(default)]
    pub uv_channel: u8,
    /// Weight the emitted color by the normalized zone height
    #[serde(default)]
    pub use_height_color: bool,
    #[serde(default)]
    pub use_color_dividor: bool,
    #[serde(default)]
    pub color: Color,
    #[serde(default = "default_one")]
    pub color_dividor: f32,
}

fn default_true() -> bool {
    true
}

fn default_one() -> f32 {
    1.0
}

fn default_influence() -> f32 {
    10.0
}

impl Zone {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            offset: 0.0,
            use_noise: false,
            resolution: 1.0,
            noise_height: 1.0,
            use_image: false,
            image: None,
            image_height: 1.0,
            use_mesh: false,
            mesh: None,
            use_object: false,
            group_object: None,
            object_influence: default_influence(),
            use_clamp: false,
            use_clamp_mesh: false,
            use_clamp_object: false,
            clamp_start: 0.0,
            clamp_end: 1.0,
            use_uv_texture_color: false,
            texture: None,
            uv_channel: 0,
            use_height_color: false,
            use_color_dividor: false,
            color: Color::WHITE,
            color_dividor: 1.0,
        }
    }

    /// A full-coverage noise zone, the most common starting point
    pub fn noise(name: impl Into<String>, resolution: f32, noise_height: f32) -> Self {
        let mut zone = Self::new(name);
        zone.use_noise = true;
        zone.resolution = resolution;
        zone.noise_height = noise_height;
        zone
    }
}

/// Ordered list of zones. Insertion order is blend order: later zones
/// composite over earlier ones, and the three list operations preserve the
/// relative order of every untouched zone.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ZoneList {
    zones: Vec<Zone>,
    /// Index of the zone targeted by remove/move, `None` when empty
    #[serde(default)]
    active_index: Option<usize>,
}

impl ZoneList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Zone> {
        self.zones.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Zone> {
        self.zones.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Zone> {
        self.zones.get_mut(index)
    }

    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut Zone> {
        self.zones.iter_mut().find(|z| z.name == name)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn active(&self) -> Option<&Zone> {
        self.active_index.and_then(|i| self.zones.get(i))
    }

    pub fn active_mut(&mut self) -> Option<&mut Zone> {
        match self.active_index {
            Some(i) => self.zones.get_mut(i),
            None => None,
        }
    }

    pub fn set_active(&mut self, index: usize) {
        if index < self.zones.len() {
            self.active_index = Some(index);
        }
    }

    /// Append a zone and make it active. If the name collides with an
    /// existing zone it gets a numeric suffix (`Zone.001` style).
    pub fn add(&mut self, mut zone: Zone) -> usize {
        zone.name = self.unique_name(&zone.name);
        self.zones.push(zone);
        let index = self.zones.len() - 1;
        self.active_index = Some(index);
        index
    }

    /// Remove the active zone. The active index is clamped into the new
    /// valid range, or cleared when the list becomes empty. Returns the
    /// removed zone, or `None` when there was nothing to remove.
    pub fn remove_active(&mut self) -> Option<Zone> {
        let index = self.active_index?;
        if index >= self.zones.len() {
            self.active_index = None;
            return None;
        }
        let removed = self.zones.remove(index);
        if self.zones.is_empty() {
            self.active_index = None;
        } else {
            self.active_index = Some(index.min(self.zones.len() - 1));
        }
        Some(removed)
    }

    /// Swap the active zone with its neighbor; the active index follows the
    /// moved zone. Returns false for the no-op at a list boundary.
    pub fn move_active(&mut self, direction: MoveDirection) -> bool {
        let Some(index) = self.active_index else {
            return false;
        };
        let target = match direction {
            MoveDirection::Up => {
                if index == 0 {
                    return false;
                }
                index - 1
            }
            MoveDirection::Down => {
                if index + 1 >= self.zones.len() {
                    return false;
                }
                index + 1
            }
        };
        self.zones.swap(index, target);
        self.active_index = Some(target);
        true
    }

    fn unique_name(&self, base: &str) -> String {
        if !self.zones.iter().any(|z| z.name == base) {
            return base.to_string();
        }
        for n in 1u32.. {
            let candidate = format!("{}.{:03}", base, n);
            if !self.zones.iter().any(|z| z.name == candidate) {
                return candidate;
            }
        }
        unreachable!()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &ZoneList) -> Vec<&str> {
        list.iter().map(|z| z.name.as_str()).collect()
    }

    #[test]
    fn add_appends_and_becomes_active() {
        let mut list = ZoneList::new();
        list.add(Zone::new("base"));
        list.add(Zone::new("hills"));
        assert_eq!(names(&list), ["base", "hills"]);
        assert_eq!(list.active().unwrap().name, "hills");
    }

    #[test]
    fn add_deduplicates_names() {
        let mut list = ZoneList::new();
        list.add(Zone::new("zone"));
        list.add(Zone::new("zone"));
        list.add(Zone::new("zone"));
        assert_eq!(names(&list), ["zone", "zone.001", "zone.002"]);
    }

    #[test]
    fn move_up_then_down_restores_order() {
        let mut list = ZoneList::new();
        list.add(Zone::new("a"));
        list.add(Zone::new("b"));
        list.add(Zone::new("c"));
        list.set_active(1);

        assert!(list.move_active(MoveDirection::Up));
        assert_eq!(names(&list), ["b", "a", "c"]);
        assert_eq!(list.active().unwrap().name, "b");

        assert!(list.move_active(MoveDirection::Down));
        assert_eq!(names(&list), ["a", "b", "c"]);
        assert_eq!(list.active().unwrap().name, "b");
    }

    #[test]
    fn move_at_boundary_is_noop() {
        let mut list = ZoneList::new();
        list.add(Zone::new("a"));
        list.add(Zone::new("b"));

        list.set_active(0);
        assert!(!list.move_active(MoveDirection::Up));
        assert_eq!(names(&list), ["a", "b"]);

        list.set_active(1);
        assert!(!list.move_active(MoveDirection::Down));
        assert_eq!(names(&list), ["a", "b"]);
    }

    #[test]
    fn remove_clamps_active_index() {
        let mut list = ZoneList::new();
        list.add(Zone::new("a"));
        list.add(Zone::new("b"));
        list.add(Zone::new("c"));
        // active is "c", the last entry
        assert_eq!(list.remove_active().unwrap().name, "c");
        assert_eq!(list.active().unwrap().name, "b");

        list.set_active(0);
        assert_eq!(list.remove_active().unwrap().name, "a");
        assert_eq!(list.active().unwrap().name, "b");
    }

    #[test]
    fn remove_last_zone_clears_active_index() {
        let mut list = ZoneList::new();
        list.add(Zone::new("only"));
        assert!(list.remove_active().is_some());
        assert!(list.is_empty());
        assert_eq!(list.active_index(), None);
        // and a second remove is a safe no-op
        assert!(list.remove_active().is_none());
    }

    #[test]
    fn move_on_empty_list_is_noop() {
        let mut list = ZoneList::new();
        assert!(!list.move_active(MoveDirection::Up));
        assert!(!list.move_active(MoveDirection::Down));
    }
}
