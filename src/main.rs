use anyhow::{Context, Result};
use clap::Parser;
use mcmod_updater::config::Paths;
use mcmod_updater::modrinth::{Catalog, ModrinthClient};
use mcmod_updater::tui::Tui;
use mcmod_updater::{App, Config};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mcmod-updater")]
#[command(
    author,
    version,
    about = "Inspect installed Minecraft mods and check Modrinth for newer or older releases"
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Mods directory to scan for this run
    #[arg(long)]
    mods_dir: Option<String>,

    /// Minecraft version used to filter releases for this run
    #[arg(long)]
    game_version: Option<String>,
}

fn setup_logging(verbosity: u8, paths: &Paths) -> Result<()> {
    let filter = match verbosity {
        0 => "mcmod_updater=info",
        1 => "mcmod_updater=debug",
        2 => "mcmod_updater=trace",
        _ => "trace",
    };

    // Write logs to a file to avoid corrupting TUI
    let log_file = paths.diagnostics_log_file();
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent).context("Failed to create log directory")?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::sync::Arc::new(file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load().await?;
    setup_logging(cli.verbose, &config.paths)?;

    let client = ModrinthClient::from_config(&config)?;
    if !client.is_reachable().await {
        anyhow::bail!(
            "Cannot reach {}. Check your internet connection and try again.",
            client.base_url()
        );
    }

    let mut app = App::new(config, Arc::new(client))?;

    // Command-line overrides apply to this session only
    if let Some(mods_dir) = cli.mods_dir.as_deref() {
        let trimmed = mods_dir.trim();
        if trimmed.is_empty() {
            anyhow::bail!("--mods-dir cannot be empty");
        }
        app.state.mods_dir = PathBuf::from(trimmed);
    }
    if let Some(version) = cli.game_version.as_deref() {
        app.state.game_version = version.trim().to_string();
    }

    let mut tui = Tui::new()?;
    let result = tui.run(&mut app).await;
    drop(tui);

    app.shutdown().await?;
    result
}
