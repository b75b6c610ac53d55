//! Per-frame terrain update
//!
//! The runtime owns one terrain plus the machinery around it: the frame
//! clock, the host-facing command queue, the shared vertex sample cache,
//! and the diagnostics log. `update` runs the full frame sequence:
//! drain commands, refresh the scene object snapshot, walk the quadtree
//! applying LOD decisions, then regenerate every pending leaf in
//! parallel.

use std::time::Instant;

use rayon::prelude::*;
use tracing::warn;

use terra_chunk::{
    generate_mesh_cached, CacheKey, ChunkNode, DiagnosticsLog, FrameDiagnostics, LodDecision,
    LodSelector, SampleCache,
};
use terra_core::{NodeKey, SceneObject, TerraError, Vec3};
use terra_field::VertexSample;

use crate::clock::FrameClock;
use crate::command::{apply_command, CommandQueue, TerrainCommand};
use crate::terrain::Terrain;

/// Owns a terrain and drives it one frame at a time
pub struct TerrainRuntime {
    terrain: Terrain,
    clock: FrameClock,
    commands: CommandQueue,
    diagnostics: DiagnosticsLog,
    cache: SampleCache,
}

impl TerrainRuntime {
    pub fn new(terrain: Terrain) -> Self {
        let diagnostics = DiagnosticsLog::new(terrain.settings().debug_time_frame);
        let cache = SampleCache::new(terrain.settings().leaf_spacing());
        Self {
            terrain,
            clock: FrameClock::new(),
            commands: CommandQueue::new(),
            diagnostics,
            cache,
        }
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn terrain_mut(&mut self) -> &mut Terrain {
        &mut self.terrain
    }

    pub fn diagnostics(&self) -> &DiagnosticsLog {
        &self.diagnostics
    }

    /// Seconds since the runtime started updating
    pub fn total_time(&self) -> f64 {
        self.clock.total_time
    }

    /// Queue a zone edit for the next update
    pub fn push_command(&mut self, command: TerrainCommand) {
        self.commands.push(command);
    }

    /// Invalidate every generated chunk and the sample cache. Required
    /// after editing zones directly through `terrain_mut`; the command
    /// queue does this automatically.
    pub fn invalidate(&mut self) {
        self.terrain.mark_all_stale();
        self.cache.clear();
    }

    /// Run one frame. Returns the diagnostics of the completed frame.
    pub fn update(&mut self, camera: Vec3, objects: &[SceneObject]) -> FrameDiagnostics {
        self.clock.tick();

        // zone edits invalidate every generated chunk and the cache
        let mut mutated = false;
        for command in self.commands.drain() {
            if apply_command(&mut self.terrain, command) {
                mutated = true;
            } else {
                warn!("zone command had no effect");
                self.diagnostics.warning();
            }
        }
        if mutated {
            self.terrain.mark_all_stale();
            self.cache.clear();
        }

        self.terrain.update_objects(objects);

        let selector = self.terrain.lod_selector();
        for root in self.terrain.roots_mut() {
            apply_lod(root, &selector, camera, objects);
        }

        self.generate_pending();

        for root in self.terrain.roots_mut() {
            root.update_height_boxes();
        }

        let debug = self.terrain.settings().debug;
        self.diagnostics.record_overlay(self.terrain.roots(), debug);
        self.diagnostics.end_frame();
        *self.diagnostics.last_frame()
    }

    /// Regenerate every Unloaded or Stale leaf, in parallel across leaves
    fn generate_pending(&mut self) {
        let frame = self.diagnostics.frame();
        let max_idle = self.terrain.settings().cache_refresh_time as u64;
        let started = Instant::now();

        let results: Vec<GenerationOutcome> = {
            let cache = &self.cache;
            let (sampler, subdivision, roots) = self.terrain.generation_parts();

            let mut pending: Vec<&mut ChunkNode> = Vec::new();
            for root in roots.iter_mut() {
                root.leaves_mut(&mut pending);
            }
            pending.retain(|leaf| leaf.chunk().needs_generation());

            pending
                .into_par_iter()
                .map(|leaf| {
                    let key = leaf.key();
                    if !leaf.chunk_mut().begin_generation() {
                        return (key, None, Vec::new());
                    }

                    let mut touched = Vec::new();
                    match generate_mesh_cached(
                        &sampler,
                        leaf.bounds(),
                        subdivision,
                        cache,
                        &mut touched,
                    ) {
                        Ok(mesh) => {
                            leaf.chunk_mut().complete_generation(mesh);
                            (key, None, touched)
                        }
                        Err(err) => {
                            leaf.chunk_mut().fail_generation();
                            (key, Some(err), Vec::new())
                        }
                    }
                })
                .collect()
        };

        for (key, error, touched) in results {
            match error {
                Some(err) => {
                    warn!(node = %key, error = %err, "chunk generation failed");
                    self.diagnostics.error();
                }
                None => self.diagnostics.chunk_generated(),
            }
            self.cache.absorb(touched, frame);
        }
        self.cache.evict_idle(frame, max_idle);

        self.diagnostics
            .add_generation_time(started.elapsed().as_secs_f64());
    }
}

type GenerationOutcome = (NodeKey, Option<TerraError>, Vec<(CacheKey, VertexSample)>);

/// Recursively apply split/merge decisions, bottom-up. A leaf splits when
/// its target level is finer; a parent collapses once every child has
/// settled as a leaf asking for a coarser level, so a whole out-of-range
/// subtree folds up in a single frame.
fn apply_lod(node: &mut ChunkNode, selector: &LodSelector, camera: Vec3, objects: &[SceneObject]) {
    if node.is_leaf() {
        if selector.decide(node, camera, objects) != LodDecision::Split {
            return;
        }
        node.subdivide();
    }

    if let Some(children) = node.children_mut() {
        for child in children {
            apply_lod(child, selector, camera, objects);
        }
    }

    let collapse = node
        .children()
        .map(|children| {
            children
                .iter()
                .all(|c| c.is_leaf() && selector.decide(c, camera, objects) == LodDecision::Merge)
        })
        .unwrap_or(false);
    if collapse {
        node.merge();
    }
}
