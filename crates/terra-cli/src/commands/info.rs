//! Terrain config summary command

use anyhow::{Context, Result};
use serde::Serialize;
use terra_engine::TerrainConfig;

#[derive(Serialize)]
struct ZoneSummary {
    name: String,
    active: bool,
    sources: Vec<&'static str>,
}

#[derive(Serialize)]
struct InfoReport {
    max_level: u8,
    width: f32,
    chunk_size: f32,
    vertex_subdivision: u32,
    root_extent: f32,
    roots_per_axis: u32,
    seed: u32,
    zones: Vec<ZoneSummary>,
    images: Vec<String>,
    textures: Vec<String>,
}

pub fn run(config_path: &str, format: &str) -> Result<()> {
    let config = TerrainConfig::load(config_path)
        .with_context(|| format!("Failed to load config '{}'", config_path))?;

    let settings = config.settings.clone().validated();
    let roots_per_axis = (settings.width / settings.root_extent()).ceil().max(1.0) as u32;

    let zones = config
        .zones
        .iter()
        .map(|zone| {
            let mut sources = Vec::new();
            if zone.use_noise {
                sources.push("noise");
            }
            if zone.use_image {
                sources.push("image");
            }
            if zone.use_mesh {
                sources.push("mesh");
            }
            if zone.use_object {
                sources.push("object");
            }
            if zone.use_clamp {
                sources.push("clamp");
            }
            if zone.use_uv_texture_color {
                sources.push("texture");
            }
            ZoneSummary {
                name: zone.name.clone(),
                active: zone.active,
                sources,
            }
        })
        .collect();

    let report = InfoReport {
        max_level: settings.max_level,
        width: settings.width,
        chunk_size: settings.chunk_size,
        vertex_subdivision: settings.vertex_subdivision,
        root_extent: settings.root_extent(),
        roots_per_axis,
        seed: settings.seed,
        zones,
        images: config.images.keys().cloned().collect(),
        textures: config.textures.keys().cloned().collect(),
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => {
            println!("Terrain: {}", config_path);
            println!(
                "  {} x {} world units, chunk size {}, max level {}",
                report.width, report.width, report.chunk_size, report.max_level
            );
            println!(
                "  {} x {} root nodes of {} units, {} quads per chunk edge",
                report.roots_per_axis,
                report.roots_per_axis,
                report.root_extent,
                report.vertex_subdivision
            );
            println!("  seed {}", report.seed);
            println!();
            if report.zones.is_empty() {
                println!("No zones defined");
            } else {
                println!("Zones (blend order):");
                for zone in &report.zones {
                    let state = if zone.active { "" } else { " [inactive]" };
                    let sources = if zone.sources.is_empty() {
                        "offset only".to_string()
                    } else {
                        zone.sources.join(", ")
                    };
                    println!("  {} ({}){}", zone.name, sources, state);
                }
            }
            if !report.images.is_empty() {
                println!("Height images: {}", report.images.join(", "));
            }
            if !report.textures.is_empty() {
                println!("Color textures: {}", report.textures.join(", "));
            }
        }
    }

    Ok(())
}
