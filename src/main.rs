mod bubble;
mod codec;
mod config;
mod driver;
mod geometry;
mod overlay;
mod pointer;
mod protocol;
mod store;
mod window;

use crate::codec::parse_script;
use crate::config::OverlayConfig;
use crate::driver::Driver;
use crate::geometry::BubbleGeometry;
use crate::overlay::OverlayService;
use crate::store::{DEFAULT_POSITION, MemoryStore, PositionStore, PrefsFile};
use crate::window::EventWindow;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "floatmate")]
#[command(about = "Floating bubble overlay with edge snapping and a delete zone")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Overlay config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Preferences file holding the bubble position
    #[arg(long, global = true)]
    prefs: Option<PathBuf>,

    /// Keep the bubble position in memory only
    #[arg(long, global = true)]
    memory: bool,

    /// Screen width in pixels
    #[arg(long, global = true)]
    width: Option<i32>,

    /// Screen height in pixels
    #[arg(long, global = true)]
    height: Option<i32>,

    /// Screen density (pixels per dp)
    #[arg(long, global = true)]
    density: Option<f32>,

    /// Enable verbose debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay an NDJSON pointer script and print overlay events
    Replay {
        /// Script file, one input record per line
        script: PathBuf,
    },

    /// Read pointer records from stdin and print overlay events as they happen
    Live,

    /// Show the persisted bubble position
    Position {
        /// Reset the position to its default first
        #[arg(long)]
        reset: bool,
    },
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // stdout carries NDJSON, logs go to stderr
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<OverlayConfig> {
    let mut config = OverlayConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load overlay config")?;

    if let Some(width) = cli.width {
        config.screen_width = width;
    }
    if let Some(height) = cli.height {
        config.screen_height = height;
    }
    if let Some(density) = cli.density {
        config.density = density;
    }
    config.validate()?;
    Ok(config)
}

fn prefs_file(path: Option<&Path>) -> Result<PrefsFile> {
    match path {
        Some(path) => Ok(PrefsFile::new(path)),
        None => PrefsFile::default_location().context("Failed to locate preferences"),
    }
}

fn open_store(cli: &Cli) -> Result<Box<dyn PositionStore>> {
    if cli.memory {
        return Ok(Box::new(MemoryStore::default()));
    }
    let prefs = prefs_file(cli.prefs.as_deref())?;
    info!("Bubble position stored in {}", prefs.path().display());
    Ok(Box::new(prefs))
}

fn build_driver(
    geometry: BubbleGeometry,
    store: Box<dyn PositionStore>,
) -> Driver<EventWindow, Box<dyn PositionStore>, std::io::Stdout> {
    let (tx, rx) = mpsc::channel();
    let service = OverlayService::start(geometry, EventWindow::new(tx.clone()), store, tx);
    Driver::new(service, rx, std::io::stdout())
}

fn show_position(geometry: &BubbleGeometry, prefs: Option<&Path>, reset: bool) -> Result<()> {
    let mut store = prefs_file(prefs)?;

    if reset {
        store
            .save(DEFAULT_POSITION)
            .context("Failed to reset bubble position")?;
    }

    let saved = store.load().context("Failed to read bubble position")?;
    let placed = geometry.clamp(saved);

    let json = serde_json::json!({
        "path": store.path().display().to_string(),
        "saved": saved,
        "placed": placed,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let config = load_config(&cli)?;
    let geometry = BubbleGeometry::from_config(&config);
    info!(
        "Screen {}x{} @ {}x, bubble {}px, margin {}px",
        config.screen_width,
        config.screen_height,
        config.density,
        geometry.bubble_width,
        geometry.edge_margin
    );

    match &cli.command {
        Commands::Replay { script } => {
            let text = std::fs::read_to_string(script)
                .with_context(|| format!("Failed to read script {}", script.display()))?;
            let records = parse_script(&text)?;

            let mut driver = build_driver(geometry, open_store(&cli)?);
            driver.replay(&records)?;
        }

        Commands::Live => {
            let mut driver = build_driver(geometry, open_store(&cli)?);
            driver.live(BufReader::new(tokio::io::stdin())).await?;
        }

        Commands::Position { reset } => {
            show_position(&geometry, cli.prefs.as_deref(), *reset)?;
        }
    }

    Ok(())
}
