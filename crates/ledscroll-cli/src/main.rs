use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledscroll_core::{AppConfig, ChannelMode};

mod commands;

use commands::{run::RunOptions, DataOptions};

#[derive(Parser)]
#[command(name = "ledscroll")]
#[command(author, version, about = "Smooth horizontal scoreboard ticker for LED matrix displays")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (defaults to ~/.config/ledscroll/config.toml)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Game records JSON file, overriding [data] path
    #[arg(short = 'd', long, global = true)]
    data: Option<PathBuf>,

    /// Play only this channel: live, recent, upcoming or mixed
    #[arg(short = 'm', long, global = true)]
    mode: Option<ChannelMode>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the configured channels (terminal preview by default)
    Run {
        /// Play without the terminal preview
        #[arg(long)]
        headless: bool,
        /// Stop after this many completed scroll cycles
        #[arg(long)]
        cycles: Option<u64>,
        /// Write frames as PNG files into this directory (implies --headless)
        #[arg(long)]
        snapshots: Option<PathBuf>,
        /// With --snapshots, keep every n-th frame
        #[arg(long, default_value_t = 10)]
        every: u64,
    },
    /// Prepare every channel once and show strip sizes and planned durations
    Plan {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Save one channel's composed strip as a PNG
    Compose {
        /// Output file
        #[arg(short = 'o', long)]
        out: PathBuf,
    },
    /// Show the effective configuration
    Config {
        /// Write it to the configuration file instead of printing
        #[arg(long)]
        write: bool,
        /// Overwrite an existing file with --write
        #[arg(long)]
        force: bool,
    },
}

/// Log to stderr, or to `log_file` while the terminal preview owns the screen
fn init_logging(level: &str, log_file: Option<&Path>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string()),
    );

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Arc::new(file)),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration; validation waits until logging is up
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let mut config = AppConfig::read_from(&config_path)?;

    let command = cli.command.unwrap_or(Commands::Run {
        headless: false,
        cycles: None,
        snapshots: None,
        every: 10,
    });

    let data = DataOptions {
        mode: cli.mode,
        data: cli.data,
    };

    let run_options = match &command {
        Commands::Run {
            headless,
            cycles,
            snapshots,
            every,
        } => Some(RunOptions {
            data: data.clone(),
            headless: *headless,
            cycles: *cycles,
            snapshots: snapshots.clone(),
            snapshot_every: *every,
        }),
        _ => None,
    };

    // Initialize logging
    let log_file = run_options
        .as_ref()
        .filter(|o| o.uses_terminal())
        .map(|_| config.log_path());
    init_logging(&config.general.log_level, log_file.as_deref())?;
    config.validate();
    let config = Arc::new(config);

    match command {
        Commands::Run { .. } => {
            let options = run_options.unwrap_or_default();
            commands::run::run(config, options).await
        }
        Commands::Plan { json } => commands::plan::run(config, data, json).await,
        Commands::Compose { out } => commands::compose::run(config, data, &out).await,
        Commands::Config { write, force } => {
            commands::config::run(&config, &config_path, write, force)
        }
    }
}
