use clap::Parser;
use shared::constants::{CONFIG_READ_ERROR, CONFIG_WRITE_ERROR, DEFAULT_CONFIG_PATH};
use shared::{load_sea_config, save_sea_config, DEFAULT_TICKS_PER_SECOND};
use sim::RunSettings;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Stop after this many fixed ticks
    #[arg(short, long)]
    ticks: Option<u64>,

    #[arg(long, default_value_t = DEFAULT_TICKS_PER_SECOND)]
    tick_rate: f64,

    /// Overrides the seed from the configuration file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Don't wait for the wall clock between ticks
    #[arg(long)]
    fast: bool,

    /// Build the water mesh without depth probing
    #[arg(long)]
    no_depth: bool,

    /// Write the effective configuration to this file and exit
    #[arg(long)]
    write_config: Option<PathBuf>,
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

    if let Some(path) = args.write_config {
        if let Err(err) = save_sea_config(&config, &path) {
            eprintln!("{}: {err}", CONFIG_WRITE_ERROR);
            std::process::exit(1);
        }
        return;
    }

    sim::init(
        config,
        RunSettings {
            ticks: args.ticks,
            tick_rate: args.tick_rate,
            fast: args.fast,
        },
    );
}
