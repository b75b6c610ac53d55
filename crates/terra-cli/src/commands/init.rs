//! Project initialization command

use anyhow::Result;
use std::fs;
use std::path::Path;

pub fn run(name: &str) -> Result<()> {
    let project_dir = Path::new(name);

    if project_dir.exists() {
        anyhow::bail!("Directory '{}' already exists", name);
    }

    fs::create_dir_all(project_dir.join("assets/heightmaps"))?;
    fs::create_dir_all(project_dir.join("assets/textures"))?;

    // A small starter terrain with one gentle noise zone
    fs::write(
        project_dir.join("terrain.toml"),
        r#"[settings]
max_level = 4
min_physics_level = 0
width = 320.0
chunk_size = 10.0
vertex_subdivision = 8
camera_distance = 100.0
object_distance = 50.0
margin_factor = 4.0
seed = 0
cache_refresh_time = 32
debug_time_frame = 60

[zones]
active_index = 0

[[zones.zones]]
name = "rolling hills"
active = true
offset = 0.0
use_noise = true
resolution = 40.0
noise_height = 6.0
"#,
    )?;

    println!("Created terrain project: {}", name);
    println!();
    println!("Project structure:");
    println!("  {}/", name);
    println!("  ├── terrain.toml");
    println!("  └── assets/");
    println!("      ├── heightmaps/");
    println!("      └── textures/");
    println!();
    println!("Next steps:");
    println!("  cd {}", name);
    println!("  terra info terrain.toml");
    println!("  terra generate terrain.toml --camera 160,160,50 --obj surface.obj");

    Ok(())
}
