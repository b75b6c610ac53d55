//! Quadtree nodes

use terra_core::{NodeKey, Rect};

use crate::state::{Chunk, ChunkState};

/// A quadtree node covering one square tile of the terrain.
///
/// A node either is a leaf carrying a [`Chunk`], or holds exactly four
/// children whose bounds quarter its own. Subdividing discards the leaf
/// chunk; merging discards the whole subtree and leaves a fresh Unloaded
/// chunk behind.
#[derive(Debug)]
pub struct ChunkNode {
    key: NodeKey,
    bounds: Rect,
    children: Option<Box<[ChunkNode; 4]>>,
    chunk: Chunk,
    /// Height extent of generated geometry in this subtree, kept for tight
    /// culling boxes and diagnostics. Zero until something generates.
    min_box_height: f32,
    max_box_height: f32,
}

impl ChunkNode {
    pub fn new(key: NodeKey, bounds: Rect) -> Self {
        Self {
            key,
            bounds,
            children: None,
            chunk: Chunk::new(),
            min_box_height: 0.0,
            max_box_height: 0.0,
        }
    }

    pub fn key(&self) -> NodeKey {
        self.key
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn level(&self) -> u8 {
        self.key.level
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn chunk(&self) -> &Chunk {
        &self.chunk
    }

    pub fn chunk_mut(&mut self) -> &mut Chunk {
        &mut self.chunk
    }

    pub fn children(&self) -> Option<&[ChunkNode; 4]> {
        self.children.as_deref()
    }

    pub fn children_mut(&mut self) -> Option<&mut [ChunkNode; 4]> {
        self.children.as_deref_mut()
    }

    /// Center of the node's culling box in 3D
    pub fn box_center(&self) -> (f32, f32, f32) {
        let (cx, cy) = self.bounds.center();
        (cx, cy, (self.min_box_height + self.max_box_height) * 0.5)
    }

    pub fn height_box(&self) -> (f32, f32) {
        (self.min_box_height, self.max_box_height)
    }

    /// Split this leaf into four children quartering its bounds. Any mesh
    /// held by the leaf chunk is discarded. No-op on internal nodes.
    pub fn subdivide(&mut self) {
        if self.children.is_some() {
            return;
        }
        let children = Box::new([
            ChunkNode::new(self.key.child(0), self.bounds.quarter(0)),
            ChunkNode::new(self.key.child(1), self.bounds.quarter(1)),
            ChunkNode::new(self.key.child(2), self.bounds.quarter(2)),
            ChunkNode::new(self.key.child(3), self.bounds.quarter(3)),
        ]);
        self.children = Some(children);
        self.chunk = Chunk::new();
    }

    /// Collapse the subtree back into a single Unloaded leaf. Children in
    /// any state, including ones still queued for generation, are dropped
    /// without error. No-op on leaves.
    pub fn merge(&mut self) {
        if self.children.take().is_some() {
            self.chunk = Chunk::new();
        }
    }

    /// Mark every generated chunk in the subtree stale
    pub fn mark_stale(&mut self) {
        self.chunk.mark_stale();
        if let Some(children) = self.children.as_deref_mut() {
            for child in children {
                child.mark_stale();
            }
        }
    }

    /// The deepest node whose bounds contain the point
    pub fn node_at(&self, x: f32, y: f32) -> Option<&ChunkNode> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        if let Some(children) = self.children.as_deref() {
            for child in children {
                if let Some(node) = child.node_at(x, y) {
                    return Some(node);
                }
            }
        }
        Some(self)
    }

    /// Visit every leaf immutably
    pub fn for_each_leaf<'a>(&'a self, f: &mut impl FnMut(&'a ChunkNode)) {
        match self.children.as_deref() {
            Some(children) => {
                for child in children {
                    child.for_each_leaf(f);
                }
            }
            None => f(self),
        }
    }

    /// Collect mutable references to every leaf
    pub fn leaves_mut<'a>(&'a mut self, out: &mut Vec<&'a mut ChunkNode>) {
        if self.children.is_none() {
            out.push(self);
            return;
        }
        if let Some(children) = self.children.as_deref_mut() {
            for child in children {
                child.leaves_mut(out);
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self.children.as_deref() {
            Some(children) => children.iter().map(|c| c.leaf_count()).sum(),
            None => 1,
        }
    }

    /// Count of internal (subdivided) nodes in the subtree
    pub fn internal_count(&self) -> usize {
        match self.children.as_deref() {
            Some(children) => 1 + children.iter().map(|c| c.internal_count()).sum::<usize>(),
            None => 0,
        }
    }

    /// Recompute the subtree height boxes bottom-up from generated meshes.
    /// Leaves without a mesh report a zero-height box at their last known
    /// extent.
    pub fn update_height_boxes(&mut self) {
        match self.children.as_deref_mut() {
            Some(children) => {
                let mut min = f32::MAX;
                let mut max = f32::MIN;
                for child in children.iter_mut() {
                    child.update_height_boxes();
                    min = min.min(child.min_box_height);
                    max = max.max(child.max_box_height);
                }
                self.min_box_height = min;
                self.max_box_height = max;
            }
            None => {
                if let Some(mesh) = self.chunk.mesh() {
                    let (lo, hi) = mesh.height_range();
                    self.min_box_height = lo;
                    self.max_box_height = hi;
                }
            }
        }
    }

    /// Count of Ready leaves in the subtree
    pub fn ready_count(&self) -> usize {
        let mut count = 0;
        self.for_each_leaf(&mut |leaf| {
            if leaf.chunk.state() == ChunkState::Ready {
                count += 1;
            }
        });
        count
    }
}
