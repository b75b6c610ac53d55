//! Headless generation command
//!
//! Builds the terrain from a config, runs a number of update frames with
//! a fixed camera, and reports what the quadtree settled into. With
//! `--obj` the final surface is written as a Wavefront OBJ file, which is
//! also the easiest way to eyeball a terrain in an external viewer.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use terra_core::Vec3;
use terra_engine::{TerrainConfig, TerrainRuntime};

pub struct GenerateArgs {
    pub config: String,
    pub frames: u32,
    pub camera: Option<[f32; 3]>,
    pub obj: Option<String>,
    pub format: String,
}

#[derive(Serialize)]
struct GenerateReport {
    frames: u32,
    camera: [f32; 3],
    roots: usize,
    leaves: usize,
    ready_chunks: usize,
    vertices: usize,
    triangles: usize,
    generation_seconds: f64,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let config = TerrainConfig::load(&args.config)
        .with_context(|| format!("Failed to load config '{}'", args.config))?;
    let base_dir = Path::new(&args.config).parent().unwrap_or(Path::new("."));
    let terrain = config
        .build(base_dir)
        .context("Failed to build terrain from config")?;

    // default camera: hovering over the terrain center
    let camera = match args.camera {
        Some([x, y, z]) => Vec3::new(x, y, z),
        None => {
            let half = terrain.settings().width * 0.5;
            Vec3::new(half, half, terrain.settings().camera_distance * 0.5)
        }
    };

    let mut runtime = TerrainRuntime::new(terrain);
    for _ in 0..args.frames.max(1) {
        runtime.update(camera, &[]);
    }

    let stats = runtime.terrain().stats();
    let (vertices, triangles) = runtime.terrain().trimesh_data();

    if let Some(obj_path) = &args.obj {
        let obj = to_obj(&vertices, &triangles);
        fs::write(obj_path, obj)
            .with_context(|| format!("Failed to write OBJ file '{}'", obj_path))?;
    }

    let report = GenerateReport {
        frames: args.frames,
        camera: [camera.x, camera.y, camera.z],
        roots: stats.roots,
        leaves: stats.leaves,
        ready_chunks: stats.ready_chunks,
        vertices: vertices.len(),
        triangles: triangles.len(),
        generation_seconds: runtime.diagnostics().total_generation_seconds(),
    };

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => {
            println!(
                "Ran {} frames with camera at ({}, {}, {})",
                report.frames, report.camera[0], report.camera[1], report.camera[2]
            );
            println!(
                "  {} roots, {} leaves, {} ready chunks",
                report.roots, report.leaves, report.ready_chunks
            );
            println!(
                "  {} vertices, {} triangles, generated in {:.3}s",
                report.vertices, report.triangles, report.generation_seconds
            );
            if let Some(obj_path) = &args.obj {
                println!("  wrote {}", obj_path);
            }
        }
    }

    Ok(())
}

fn to_obj(vertices: &[[f32; 3]], triangles: &[[u32; 3]]) -> String {
    let mut out = String::with_capacity(vertices.len() * 32 + triangles.len() * 16);
    out.push_str("# terra terrain surface\n");
    for v in vertices {
        let _ = writeln!(out, "v {} {} {}", v[0], v[1], v[2]);
    }
    for t in triangles {
        // OBJ indices are 1-based
        let _ = writeln!(out, "f {} {} {}", t[0] + 1, t[1] + 1, t[2] + 1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obj_output_is_one_based() {
        let obj = to_obj(&[[0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], &[[0, 1, 2]]);
        assert!(obj.contains("v 0 0 1"));
        assert!(obj.contains("f 1 2 3"));
    }
}
