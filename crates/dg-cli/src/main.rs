//! Dungeon generator command line
//!
//! Builds a configuration from flags or a JSON file, runs one generation
//! pass into an in-memory scene and prints the result.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use strum::IntoEnumIterator;

use dg_core::dungeon::CellType;
use dg_core::geom::Size;
use dg_core::validate::connected_rooms;
use dg_core::{GeneratorConfig, SceneLedger, generate};

/// Generate a seeded dungeon layout
#[derive(Parser, Debug)]
#[command(name = "dungeon-gen")]
#[command(author, version, about = "Generate a dungeon: rooms, hallways, walls and spawns", long_about = None)]
struct Args {
    /// JSON configuration file; flags below override its values
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Random seed
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Grid width in cells
    #[arg(short = 'W', long = "width")]
    width: Option<i32>,

    /// Grid height in cells
    #[arg(short = 'H', long = "height")]
    height: Option<i32>,

    /// Number of room placement attempts
    #[arg(short = 'r', long = "rooms")]
    rooms: Option<u32>,

    /// Minimum room extent (square)
    #[arg(long = "min-size")]
    min_size: Option<i32>,

    /// Maximum room extent (square)
    #[arg(long = "max-size")]
    max_size: Option<i32>,

    /// Probability that a non-tree edge becomes a hallway
    #[arg(long = "loop-chance")]
    loop_chance: Option<f64>,

    /// Spawn a boss as the first enemy
    #[arg(short = 'b', long = "boss")]
    boss: bool,

    /// Print the generation result as JSON instead of the map
    #[arg(long = "json")]
    json: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long = "dump-config")]
    dump_config: bool,

    /// Fail unless every room is reachable from the first
    #[arg(long = "check")]
    check: bool,

    /// Print the map legend
    #[arg(long = "legend")]
    legend: bool,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

impl Args {
    fn build_config(&self) -> Result<GeneratorConfig, String> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::load_from_file(path).map_err(|e| e.to_string())?,
            None => GeneratorConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(rooms) = self.rooms {
            config.room_count = rooms;
        }
        if let Some(min) = self.min_size {
            config.room_min_size = Size::new(min, min);
        }
        if let Some(max) = self.max_size {
            config.room_max_size = Size::new(max, max);
        }
        if let Some(chance) = self.loop_chance {
            config.loop_edge_chance = chance;
        }
        if self.boss {
            config.boss_floor = true;
        }

        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn print_legend() {
    for cell in CellType::iter() {
        println!("'{}'  {}", cell.symbol(), cell);
    }
    println!("'@'  Player");
    println!("'e'  Enemy");
    println!("'B'  Boss");
    println!("'*'  Floor prop");
    println!("'+'  Exit door (below the top wall)");
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match args.build_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("dungeon-gen: {}", err);
            return ExitCode::from(2);
        }
    };
    log::debug!("effective config: {:?}", config);

    if args.dump_config {
        return match config.to_json() {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("dungeon-gen: {}", err);
                ExitCode::FAILURE
            }
        };
    }

    let mut scene = SceneLedger::new();
    let result = match generate(&config, &mut scene) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("dungeon-gen: {}", err);
            return ExitCode::from(2);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                eprintln!("dungeon-gen: could not serialize result: {}", err);
                return ExitCode::FAILURE;
            }
        }
    } else {
        if args.legend {
            print_legend();
            println!();
        }
        print!("{}", result.render_ascii());
        let stats = &result.stats;
        println!(
            "seed {}  rooms {}/{}  hallways {} (+{} loops, {} skipped)  enemies {}  props {}  door {}",
            result.seed,
            stats.rooms_placed,
            stats.rooms_requested,
            stats.tree_edges,
            stats.loop_edges,
            stats.hallways_skipped,
            result.enemies.len(),
            stats.props_placed,
            if stats.exit_door_placed { "yes" } else { "no" }
        );
        if args.verbose {
            println!("scene occupants: {}", scene.len());
        }
    }

    if args.check {
        let connectivity = connected_rooms(&result.grid, &result.rooms);
        if !connectivity.all_connected() {
            eprintln!(
                "dungeon-gen: rooms {:?} are not reachable from room 0",
                connectivity.unreachable()
            );
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
