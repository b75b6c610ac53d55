//! Point sampling command

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use terra_engine::TerrainConfig;

#[derive(Serialize)]
struct SampleReport {
    x: f32,
    y: f32,
    height: f32,
    color: [f32; 4],
    uv: [f32; 2],
}

pub fn run(config_path: &str, x: f32, y: f32, format: &str) -> Result<()> {
    let config = TerrainConfig::load(config_path)
        .with_context(|| format!("Failed to load config '{}'", config_path))?;
    let base_dir = Path::new(config_path).parent().unwrap_or(Path::new("."));
    let terrain = config
        .build(base_dir)
        .context("Failed to build terrain from config")?;

    let sample = terrain.sample(x, y);
    let report = SampleReport {
        x,
        y,
        height: sample.height,
        color: [
            sample.color.r,
            sample.color.g,
            sample.color.b,
            sample.color.a,
        ],
        uv: sample.uv,
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => {
            println!("Sample at ({}, {}):", x, y);
            println!("  height  {:.4}", report.height);
            println!(
                "  color   ({:.3}, {:.3}, {:.3}, {:.3})",
                report.color[0], report.color[1], report.color[2], report.color[3]
            );
            println!("  uv      ({:.4}, {:.4})", report.uv[0], report.uv[1]);
        }
    }

    Ok(())
}
