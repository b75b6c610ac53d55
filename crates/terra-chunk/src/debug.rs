//! Per-frame diagnostics
//!
//! Purely observational: counters describe what the last update did and
//! what an overlay would draw, without touching the terrain model.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::node::ChunkNode;

/// Which overlay primitives the host wants counted/drawn
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct DebugFlags {
    #[serde(default)]
    pub draw_boxes: bool,
    #[serde(default)]
    pub draw_lines: bool,
    #[serde(default)]
    pub draw_centers: bool,
}

/// Counters accumulated over one frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameDiagnostics {
    /// Chunk bounding boxes the overlay would draw
    pub boxes: u32,
    /// Quadtree subdivision lines the overlay would draw
    pub lines: u32,
    /// Chunk center markers the overlay would draw
    pub centers: u32,
    pub warnings: u32,
    pub errors: u32,
    /// Chunks (re)generated this frame
    pub generated_chunks: u32,
    /// Wall-clock seconds spent generating this frame
    pub generation_seconds: f64,
}

/// Accumulates diagnostics across frames and emits a timing line every
/// `time_frame` frames.
#[derive(Debug)]
pub struct DiagnosticsLog {
    frame: u64,
    /// Frames between emitted timing lines; 0 disables emission
    time_frame: u32,
    total_generation_seconds: f64,
    current: FrameDiagnostics,
    last: FrameDiagnostics,
}

impl DiagnosticsLog {
    pub fn new(time_frame: u32) -> Self {
        Self {
            frame: 0,
            time_frame,
            total_generation_seconds: 0.0,
            current: FrameDiagnostics::default(),
            last: FrameDiagnostics::default(),
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Diagnostics of the last completed frame
    pub fn last_frame(&self) -> &FrameDiagnostics {
        &self.last
    }

    /// Total generation time since startup, in seconds
    pub fn total_generation_seconds(&self) -> f64 {
        self.total_generation_seconds
    }

    pub fn warning(&mut self) {
        self.current.warnings += 1;
    }

    pub fn error(&mut self) {
        self.current.errors += 1;
    }

    pub fn chunk_generated(&mut self) {
        self.current.generated_chunks += 1;
    }

    pub fn add_generation_time(&mut self, seconds: f64) {
        self.current.generation_seconds += seconds;
    }

    /// Count overlay primitives for the given trees per the debug flags
    pub fn record_overlay<'a>(
        &mut self,
        roots: impl IntoIterator<Item = &'a ChunkNode>,
        flags: DebugFlags,
    ) {
        for root in roots {
            let leaves = root.leaf_count() as u32;
            let internals = root.internal_count() as u32;
            if flags.draw_boxes {
                self.current.boxes += leaves;
            }
            if flags.draw_lines {
                // each subdivided node draws its horizontal and vertical split
                self.current.lines += internals * 2;
            }
            if flags.draw_centers {
                self.current.centers += leaves;
            }
        }
    }

    /// Close the frame: publish the counters and emit the periodic timing
    /// line.
    pub fn end_frame(&mut self) {
        self.total_generation_seconds += self.current.generation_seconds;
        self.last = self.current;
        self.current = FrameDiagnostics::default();
        self.frame += 1;

        if self.time_frame > 0 && self.frame % self.time_frame as u64 == 0 {
            info!(
                frame = self.frame,
                generated = self.last.generated_chunks,
                frame_seconds = self.last.generation_seconds,
                total_seconds = self.total_generation_seconds,
                warnings = self.last.warnings,
                errors = self.last.errors,
                "terrain generation timing"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terra_core::{NodeKey, Rect};

    #[test]
    fn counters_reset_each_frame() {
        let mut log = DiagnosticsLog::new(0);
        log.warning();
        log.chunk_generated();
        log.add_generation_time(0.5);
        log.end_frame();

        assert_eq!(log.last_frame().warnings, 1);
        assert_eq!(log.last_frame().generated_chunks, 1);
        assert_eq!(log.frame(), 1);

        log.end_frame();
        assert_eq!(log.last_frame().warnings, 0);
        assert_eq!(log.total_generation_seconds(), 0.5);
    }

    #[test]
    fn overlay_counts_follow_flags() {
        let mut root = ChunkNode::new(NodeKey::new(0, 0, 0), Rect::new(0.0, 0.0, 10.0, 10.0));
        root.subdivide();

        let mut log = DiagnosticsLog::new(0);
        log.record_overlay(
            [&root],
            DebugFlags {
                draw_boxes: true,
                draw_lines: true,
                draw_centers: false,
            },
        );
        log.end_frame();

        assert_eq!(log.last_frame().boxes, 4);
        assert_eq!(log.last_frame().lines, 2);
        assert_eq!(log.last_frame().centers, 0);
    }

    #[test]
    fn disabled_flags_count_nothing() {
        let root = ChunkNode::new(NodeKey::new(0, 0, 0), Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut log = DiagnosticsLog::new(0);
        log.record_overlay([&root], DebugFlags::default());
        log.end_frame();
        assert_eq!(log.last_frame(), &FrameDiagnostics::default());
    }
}
