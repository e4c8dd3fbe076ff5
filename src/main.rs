use anyhow::{Context, Result};
use clap::Parser;
use jira_dashboard::{config, tui};
use std::sync::Mutex;

#[derive(Parser, Debug)]
#[command(name = "jira-dashboard")]
#[command(about = "Terminal dashboard for Jira issues, sprint workload and issue links")]
#[command(version)]
struct Args {
    /// Initialize configuration
    #[arg(long)]
    init: bool,

    /// Path to config file
    #[arg(long, short)]
    config: Option<std::path::PathBuf>,

    /// Override the dashboard backend URL from the config
    #[arg(long)]
    api_url: Option<String>,
}

/// Log to a file in the cache dir; stderr would tear the alternate screen.
fn init_logging() -> Result<()> {
    let dir = config::cache_dir()?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("jira-dashboard.log"))
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("jira_dashboard=info".parse()?),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.init {
        config::init_wizard().await?;
        return Ok(());
    }

    init_logging()?;

    let mut config = config::load(args.config.as_deref())?;
    if let Some(url) = args.api_url {
        config.server.base_url = url;
    }
    tracing::info!("Starting dashboard against {}", config.server.base_url);

    tui::run(config).await
}
