mod camera;
mod world;

use bevy::{prelude::*, window::PresentMode};
use clap::Parser;
use shared::constants::{CONFIG_READ_ERROR, DEFAULT_CONFIG_PATH};
use shared::{load_sea_config, SeaSimPlugin, DEFAULT_TICKS_PER_SECOND};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[arg(short, long, help = "Overrides the seed from the configuration file")]
    seed: Option<u64>,

    #[arg(long, help = "Render the plain sea without depth coloring")]
    no_depth: bool,

    #[arg(long, default_value_t = DEFAULT_TICKS_PER_SECOND)]
    tick_rate: f64,
}

fn main() {
    let args = Args::parse();

    if !(args.tick_rate.is_finite() && args.tick_rate > 0.0) {
        eprintln!("Error: tick_rate must be a positive number.");
        eprintln!("Got: {}", args.tick_rate);
        std::process::exit(1);
    }

    let mut config = match load_sea_config(&args.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}: {err}", CONFIG_READ_ERROR);
            std::process::exit(1);
        }
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.no_depth {
        config.depth.enabled = false;
    }

    println!(
        "Starting sea with a {}x{} grid, depth {}",
        config.grid.x,
        config.grid.z,
        if config.depth.enabled { "on" } else { "off" }
    );

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Low Poly Sea".to_string(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }));

    app.insert_resource(Time::<Fixed>::from_hz(args.tick_rate))
        .insert_resource(ClearColor(Color::srgb(0.6, 0.75, 0.9)))
        .add_plugins(SeaSimPlugin::new(config))
        .add_plugins(world::sea_world_plugin)
        .add_systems(Startup, camera::spawn_camera)
        .add_systems(Update, camera::orbit_camera_system)
        .run();
}
