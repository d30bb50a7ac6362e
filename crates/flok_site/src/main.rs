//! Flok - headless runner for the studio landing page
//!
//! - `flok run`: lay the page out, scroll through it, and print a report
//! - `flok init`: write a default `flok.toml`

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use flok_site::{SiteConfig, CONFIG_FILE};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "flok")]
#[command(about = "Scroll-driven motion for the Flok studio landing page")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mount the page, simulate scrolling, and report controller states
    Run(RunArgs),
    /// Write a default flok.toml
    Init(InitArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Config file, or a directory containing flok.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frames to simulate
    #[arg(long)]
    frames: Option<usize>,

    /// Scroll speed in pixels per second
    #[arg(long)]
    scroll_speed: Option<f32>,

    /// Viewport width
    #[arg(long)]
    width: Option<f32>,

    /// Viewport height
    #[arg(long)]
    height: Option<f32>,

    /// Skip all motion
    #[arg(long)]
    reduced_motion: bool,

    #[arg(long, value_enum, default_value = "text")]
    format: Format,
}

#[derive(Parser, Debug)]
struct InitArgs {
    /// Directory to write flok.toml into
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => cmd_run(args),
        Command::Init(args) => cmd_init(args),
    }
}

fn cmd_run(args: RunArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => SiteConfig::load_from_dir(path)?,
        None => SiteConfig::default(),
    };
    if let Some(frames) = args.frames {
        config.run.frames = frames;
    }
    if let Some(speed) = args.scroll_speed {
        config.run.scroll_speed = speed;
    }
    if let Some(width) = args.width {
        config.viewport.width = width;
    }
    if let Some(height) = args.height {
        config.viewport.height = height;
    }
    if args.reduced_motion {
        config.motion.reduced_motion = true;
    }

    let report = flok_site::run(&config)?;
    match args.format {
        Format::Text => print!("{report}"),
        Format::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}

fn cmd_init(args: InitArgs) -> Result<()> {
    let path = args.path.join(CONFIG_FILE);
    if path.exists() && !args.force {
        anyhow::bail!("{} already exists. Use --force to overwrite.", path.display());
    }

    fs::create_dir_all(&args.path)
        .with_context(|| format!("Failed to create {}", args.path.display()))?;
    let content = SiteConfig::default().to_toml()?;
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!("Wrote {}", path.display());
    Ok(())
}
