use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use danmaku_core::{DanmakuConfig, Direction};

mod commands;
mod player;

#[derive(Parser)]
#[command(name = "danmaku")]
#[command(author, version, about = "Play scrolling danmaku comments on a headless stage")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use this configuration file instead of the default location
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a file of comments, one per line
    Run(RunArgs),
    /// Print the effective configuration
    Config,
    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// Comment file
    pub input: PathBuf,
    /// Playback speed multiplier
    #[arg(short, long)]
    pub rate: Option<f64>,
    /// Traversal direction (left, right, none)
    #[arg(short, long)]
    pub direction: Option<Direction>,
    /// Stage width in pixels
    #[arg(long)]
    pub width: Option<f64>,
    /// Stage height in pixels
    #[arg(long)]
    pub height: Option<f64>,
    /// Pause every moving item this many milliseconds after the first start
    #[arg(long, requires = "pause_for")]
    pub pause_at: Option<u64>,
    /// How long the pause lasts, in milliseconds
    #[arg(long, requires = "pause_at")]
    pub pause_for: Option<u64>,
    /// Start with every item hidden
    #[arg(long)]
    pub hidden: bool,
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.unwrap_or_else(DanmakuConfig::config_path);
    let config = DanmakuConfig::load_from(&config_path)?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Run(args) => commands::run::run(config, args).await,
        Commands::Config => commands::config::show(&config_path, &config),
        Commands::InitConfig { force } => commands::config::init(&config_path, force),
    }
}
