mod app;
mod colors;
mod config;
mod game;
mod growth;
mod help;
mod input;
mod logging;
mod particles;
mod render;
mod settings;
mod store;
mod terminal;
mod tree;
mod weather;

use clap::{Parser, Subcommand};
use config::{AppConfig, GameConfig, ShapeMode, DEFAULT_FPS, DEFAULT_MS_PER_DAY};
use settings::Settings;
use std::io;
use std::path::PathBuf;
use store::{JsonFileStore, MemoryStore, SaveStore};

#[derive(Parser)]
#[command(name = "treecare")]
#[command(author = "Terminal Art Generator")]
#[command(version = "0.1.0")]
#[command(about = "Grow a cherry tree in your terminal: water it, shield it, watch the seasons", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Random seed for tree shapes and weather
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// Length of a virtual day in milliseconds
    #[arg(short, long, global = true, value_parser = clap::value_parser!(i64).range(1..))]
    day_ms: Option<i64>,

    /// Keep the tree's shape until it ages instead of swaying every frame
    #[arg(long, global = true)]
    stable: bool,

    /// Play without reading or writing the save file
    #[arg(long, global = true)]
    no_save: bool,

    /// Save file location
    #[arg(long, global = true, value_name = "PATH")]
    save_file: Option<PathBuf>,

    /// Frames per second (1-120)
    #[arg(long, global = true)]
    fps: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Tend the garden interactively (default)
    Play,
    /// Print the garden once to stdout
    Print,
    /// Show water and age of the saved tree
    Status,
    /// Delete the saved tree
    Reset,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    logging::init(&logging::default_log_path());

    let settings = Settings::load();
    let config = app_config(&cli, &settings);

    let mut store: Box<dyn SaveStore> = if cli.no_save {
        Box::new(MemoryStore::new())
    } else {
        let path = cli
            .save_file
            .clone()
            .or_else(|| settings.storage.save_file.clone())
            .unwrap_or_else(JsonFileStore::default_path);
        let file_store = JsonFileStore::new(path);
        tracing::debug!(path = %file_store.path().display(), "using save file");
        Box::new(file_store)
    };

    tracing::info!(
        seed = config.game.seed,
        ms_per_day = config.game.ms_per_day,
        "starting treecare"
    );

    match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => app::run(config, store)?,
        Commands::Print => app::print(config, store)?,
        Commands::Status => app::status(config, store)?,
        Commands::Reset => {
            store
                .clear()
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            println!("Garden cleared. A new seed waits for you.");
        }
    }

    Ok(())
}

/// Command line flags win over `config.toml`
fn app_config(cli: &Cli, settings: &Settings) -> AppConfig {
    let garden = &settings.garden;
    let seed = cli.seed.or(garden.seed).unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    });
    let stable = cli.stable || garden.stable_tree.unwrap_or(false);

    AppConfig {
        game: GameConfig {
            ms_per_day: cli.day_ms.or(garden.day_ms).unwrap_or(DEFAULT_MS_PER_DAY),
            shape: if stable {
                ShapeMode::Stable
            } else {
                ShapeMode::Living
            },
            seed,
        },
        fps: cli.fps.or(garden.fps).unwrap_or(DEFAULT_FPS),
    }
}
