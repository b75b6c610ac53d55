//! Zone list editing commands
//!
//! These edit the zone list of a terrain config file in place, the same
//! operations a host UI would queue as terrain commands.

use anyhow::{Context, Result};
use clap::Subcommand;
use terra_engine::TerrainConfig;
use terra_field::{MoveDirection, Zone};

#[derive(Subcommand)]
pub enum ZoneCommands {
    /// Add a zone and make it active
    Add {
        /// Zone name (deduplicated with a numeric suffix on collision)
        name: String,

        /// Path to terrain config file
        #[arg(long, default_value = "terrain.toml")]
        config: String,

        /// Enable the noise height source
        #[arg(long)]
        noise: bool,

        /// Noise feature size in world units
        #[arg(long, default_value = "40.0")]
        resolution: f32,

        /// Noise amplitude
        #[arg(long, default_value = "5.0")]
        noise_height: f32,

        /// Constant height offset
        #[arg(long, default_value = "0.0")]
        offset: f32,
    },

    /// Remove a zone by name
    Remove {
        /// Zone name
        name: String,

        /// Path to terrain config file
        #[arg(long, default_value = "terrain.toml")]
        config: String,
    },

    /// Move a zone up or down the blend order
    Move {
        /// Zone name
        name: String,

        /// Direction: up (earlier in blend order) or down
        #[arg(long, value_parser = parse_direction)]
        direction: MoveDirection,

        /// Path to terrain config file
        #[arg(long, default_value = "terrain.toml")]
        config: String,
    },

    /// List zones in blend order
    List {
        /// Path to terrain config file
        #[arg(long, default_value = "terrain.toml")]
        config: String,
    },
}

fn parse_direction(s: &str) -> Result<MoveDirection, String> {
    match s {
        "up" => Ok(MoveDirection::Up),
        "down" => Ok(MoveDirection::Down),
        _ => Err(format!("unknown direction '{}'; valid values: up, down", s)),
    }
}

pub fn run(cmd: ZoneCommands) -> Result<()> {
    match cmd {
        ZoneCommands::Add {
            name,
            config,
            noise,
            resolution,
            noise_height,
            offset,
        } => {
            let mut cfg = load(&config)?;
            let mut zone = if noise {
                Zone::noise(name, resolution, noise_height)
            } else {
                Zone::new(name)
            };
            zone.offset = offset;
            let index = cfg.zones.add(zone);
            let added = cfg.zones.get(index).map(|z| z.name.clone()).unwrap_or_default();
            cfg.save(&config)?;
            println!("Added zone '{}'", added);
            Ok(())
        }
        ZoneCommands::Remove { name, config } => {
            let mut cfg = load(&config)?;
            activate(&mut cfg, &name)?;
            cfg.zones.remove_active();
            cfg.save(&config)?;
            println!("Removed zone '{}'", name);
            Ok(())
        }
        ZoneCommands::Move {
            name,
            direction,
            config,
        } => {
            let mut cfg = load(&config)?;
            activate(&mut cfg, &name)?;
            if cfg.zones.move_active(direction) {
                cfg.save(&config)?;
                println!("Moved zone '{}'", name);
            } else {
                println!("Zone '{}' is already at the list boundary", name);
            }
            Ok(())
        }
        ZoneCommands::List { config } => {
            let cfg = load(&config)?;
            if cfg.zones.is_empty() {
                println!("No zones defined");
                return Ok(());
            }
            let active = cfg.zones.active_index();
            for (index, zone) in cfg.zones.iter().enumerate() {
                let marker = if Some(index) == active { "*" } else { " " };
                let state = if zone.active { "" } else { " [inactive]" };
                println!("{} {} {}{}", marker, index, zone.name, state);
            }
            Ok(())
        }
    }
}

fn load(config: &str) -> Result<TerrainConfig> {
    TerrainConfig::load(config).with_context(|| format!("Failed to load config '{}'", config))
}

fn activate(cfg: &mut TerrainConfig, name: &str) -> Result<()> {
    let index = cfg
        .zones
        .iter()
        .position(|z| z.name == name)
        .with_context(|| format!("No zone named '{}'", name))?;
    cfg.zones.set_active(index);
    Ok(())
}
