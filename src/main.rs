use anyhow::Result;
use clap::{Parser, ValueEnum};
use grid_snake::game::GameConfig;
use grid_snake::modes::HumanMode;
use grid_snake::store::FileScoreStore;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Classic snake on a square grid, in the terminal")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// JSON file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cells per side of the board
    #[arg(long)]
    tile_count: Option<usize>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Hide the grid dots
    #[arg(long)]
    no_grid: bool,

    /// High-score store file [default: ~/.grid_snake/store.json]
    #[arg(long)]
    store: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard and mouse controls
    Human,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(tile_count) = self.tile_count {
            config.tile_count = tile_count;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.no_grid {
            config.show_grid = false;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    grid_snake::logging::init(cli.log_file.as_deref())?;

    let config = cli.game_config()?;
    log::info!("Starting with {:?}", config);

    let store_path = cli.store.clone().unwrap_or_else(FileScoreStore::default_path);
    let store = FileScoreStore::new(store_path);

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(config, store);
            human_mode.run().await?;
        }
    }

    Ok(())
}
