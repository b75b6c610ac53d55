//! Terra CLI - Command-line interface for the Terra terrain engine

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{generate, info, init, sample, zone};

#[derive(Parser)]
#[command(name = "terra")]
#[command(about = "Chunked procedural terrain engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new terrain project
    Init {
        /// Project name/directory
        name: String,
    },

    /// Show a terrain config summary
    Info {
        /// Path to terrain config file
        config: String,

        /// Output format (json or text)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Sample the composited surface at a point
    Sample {
        /// Path to terrain config file
        config: String,

        /// World X coordinate
        #[arg(short, long)]
        x: f32,

        /// World Y coordinate
        #[arg(short, long)]
        y: f32,

        /// Output format (json or text)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Run terrain updates headless and report what was generated
    Generate {
        /// Path to terrain config file
        config: String,

        /// Number of update frames to run
        #[arg(long, default_value = "8")]
        frames: u32,

        /// Camera position (comma-separated x,y,z)
        #[arg(long, value_parser = parse_vec3)]
        camera: Option<[f32; 3]>,

        /// Export the generated surface as a Wavefront OBJ file
        #[arg(long)]
        obj: Option<String>,

        /// Output format (json or text)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Zone list operations
    #[command(subcommand)]
    Zone(zone::ZoneCommands),
}

fn parse_vec3(s: &str) -> Result<[f32; 3], String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected 3 comma-separated values, got {}", parts.len()));
    }
    let x: f32 = parts[0].trim().parse().map_err(|e| format!("invalid x: {}", e))?;
    let y: f32 = parts[1].trim().parse().map_err(|e| format!("invalid y: {}", e))?;
    let z: f32 = parts[2].trim().parse().map_err(|e| format!("invalid z: {}", e))?;
    Ok([x, y, z])
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { name } => init::run(&name),
        Commands::Info { config, format } => info::run(&config, &format),
        Commands::Sample { config, x, y, format } => sample::run(&config, x, y, &format),
        Commands::Generate {
            config,
            frames,
            camera,
            obj,
            format,
        } => generate::run(generate::GenerateArgs {
            config,
            frames,
            camera,
            obj,
            format,
        }),
        Commands::Zone(cmd) => zone::run(cmd),
    }
}
