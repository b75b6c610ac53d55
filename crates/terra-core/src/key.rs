//! Stable quadtree node coordinates

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a quadtree node by its subdivision level and integer grid
/// position at that level.
///
/// Level 0 is the root grid; each level doubles the grid resolution, so a
/// node's children at level `l + 1` sit at `(2x + dx, 2y + dy)` with
/// `dx, dy` in `{0, 1}`. Keys are totally ordered so they can be used as
/// map keys and produce deterministic iteration in tests.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NodeKey {
    pub level: u8,
    pub x: u32,
    pub y: u32,
}

impl NodeKey {
    pub fn new(level: u8, x: u32, y: u32) -> Self {
        Self { level, x, y }
    }

    /// Key of the child in the given quadrant (0..4)
    pub fn child(&self, quadrant: usize) -> NodeKey {
        let dx = (quadrant & 1) as u32;
        let dy = ((quadrant >> 1) & 1) as u32;
        NodeKey {
            level: self.level + 1,
            x: self.x * 2 + dx,
            y: self.y * 2 + dy,
        }
    }

    /// Key of the parent node, or `None` at the root level
    pub fn parent(&self) -> Option<NodeKey> {
        if self.level == 0 {
            return None;
        }
        Some(NodeKey {
            level: self.level - 1,
            x: self.x / 2,
            y: self.y / 2,
        })
    }
}

impl fmt::Debug for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeKey(l{} {},{})", self.level, self.x, self.y)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "l{}:{},{}", self.level, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_keys_round_trip_through_parent() {
        let key = NodeKey::new(2, 3, 1);
        for quadrant in 0..4 {
            let child = key.child(quadrant);
            assert_eq!(child.level, 3);
            assert_eq!(child.parent(), Some(key));
        }
    }

    #[test]
    fn root_has_no_parent() {
        assert_eq!(NodeKey::new(0, 0, 0).parent(), None);
    }

    #[test]
    fn children_are_distinct() {
        let key = NodeKey::new(0, 0, 0);
        let children: Vec<_> = (0..4).map(|q| key.child(q)).collect();
        for i in 0..4 {
            for j in (i + 1)..4 {
                assert_ne!(children[i], children[j]);
            }
        }
    }
}
