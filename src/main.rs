use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use path_snake::game::{GameConfig, GameEngine};
use path_snake::modes::HumanMode;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "path_snake")]
#[command(version, about = "Snake that must stay inside a live A* corridor to the food")]
struct Cli {
    /// JSON file with game tunables (tick rate, corridor width, delays, ...)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Answer the obstacle question up front instead of showing the menu
    #[arg(long, default_value = "ask")]
    obstacles: ObstacleChoice,

    /// Seed for obstacle and food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Log file; the terminal itself is taken by the game
    #[arg(long, default_value = "path_snake.log")]
    log_file: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum ObstacleChoice {
    /// Show the Y/N menu
    Ask,
    Yes,
    No,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_file)?;

    let config = match &cli.config {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::default(),
    };
    config.validate().context("Invalid game configuration")?;
    tracing::info!(?config, "starting path_snake");

    let mut engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed),
        None => GameEngine::new(config),
    };
    match cli.obstacles {
        ObstacleChoice::Ask => {}
        ObstacleChoice::Yes => engine.preselect_obstacles(true),
        ObstacleChoice::No => engine.preselect_obstacles(false),
    }

    let mut human_mode = HumanMode::new(engine);
    human_mode.run().await?;

    Ok(())
}
