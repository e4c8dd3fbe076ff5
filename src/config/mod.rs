use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub sprint: SprintConfig,
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Dashboard backend serving the `/api/*` endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Issue tracker used for outbound `<browse_url>/browse/<key>` links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_browse_url")]
    pub browse_url: String,
}

fn default_browse_url() -> String {
    "https://jira.ddos-guard.net".to_string()
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            browse_url: default_browse_url(),
        }
    }
}

/// Sprint capacity and the workload thresholds used for bands and recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SprintConfig {
    #[serde(default = "default_capacity_hours")]
    pub capacity_hours: f64,
    #[serde(default = "default_light_below")]
    pub light_below: f64,
    #[serde(default = "default_full_above")]
    pub full_above: f64,
    #[serde(default = "default_overloaded_above")]
    pub overloaded_above: f64,
    #[serde(default = "default_risk_progress_below")]
    pub risk_progress_below: f64,
    #[serde(default = "default_pace_threshold")]
    pub pace_progress_above: f64,
    #[serde(default = "default_pace_threshold")]
    pub pace_time_used_below: f64,
    #[serde(default = "default_queue_ratio")]
    pub queue_ratio: f64,
}

fn default_capacity_hours() -> f64 {
    80.0
}

fn default_light_below() -> f64 {
    70.0
}

fn default_full_above() -> f64 {
    90.0
}

fn default_overloaded_above() -> f64 {
    100.0
}

fn default_risk_progress_below() -> f64 {
    80.0
}

fn default_pace_threshold() -> f64 {
    70.0
}

fn default_queue_ratio() -> f64 {
    2.0
}

impl Default for SprintConfig {
    fn default() -> Self {
        Self {
            capacity_hours: default_capacity_hours(),
            light_below: default_light_below(),
            full_above: default_full_above(),
            overloaded_above: default_overloaded_above(),
            risk_progress_below: default_risk_progress_below(),
            pace_progress_above: default_pace_threshold(),
            pace_time_used_below: default_pace_threshold(),
            queue_ratio: default_queue_ratio(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Where the rendered link graph page is written (defaults to the cache dir)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub physics: bool,
}

fn default_true() -> bool {
    true
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            physics: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

fn default_tick_ms() -> u64 {
    250
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "jira-dashboard")
        .context("Could not determine config directory")
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

pub fn cache_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.cache_dir().to_path_buf())
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

impl Config {
    /// Directory for the rendered graph page.
    pub fn graph_output_dir(&self) -> Result<PathBuf> {
        match &self.graph.output_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(cache_dir()?.join("graph")),
        }
    }
}

pub fn load(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        anyhow::bail!(
            "Config file not found at {}. Run `jira-dashboard --init` to create one.",
            path.display()
        );
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;

    parse(&content).with_context(|| format!("Failed to parse config from {}", path.display()))
}

pub fn parse(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    Ok(config)
}

pub async fn init_wizard() -> Result<()> {
    use std::io::{self, Write};

    println!("Jira Dashboard Configuration Wizard");
    println!("===================================\n");

    let config_path = default_config_path()?;
    if config_path.exists() {
        print!("Config already exists at {}. Overwrite? [y/N] ", config_path.display());
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    let mut config = Config::default();

    print!("Dashboard backend URL [{}]: ", config.server.base_url);
    io::stdout().flush()?;
    let mut base_url = String::new();
    io::stdin().read_line(&mut base_url)?;
    if !base_url.trim().is_empty() {
        config.server.base_url = base_url.trim().to_string();
    }

    print!("Jira URL for issue links [{}]: ", config.tracker.browse_url);
    io::stdout().flush()?;
    let mut browse_url = String::new();
    io::stdin().read_line(&mut browse_url)?;
    if !browse_url.trim().is_empty() {
        config.tracker.browse_url = browse_url.trim().to_string();
    }

    print!("Sprint capacity in hours [{}]: ", config.sprint.capacity_hours);
    io::stdout().flush()?;
    let mut capacity = String::new();
    io::stdin().read_line(&mut capacity)?;
    if let Ok(hours) = capacity.trim().parse::<f64>() {
        config.sprint.capacity_hours = hours;
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(&config)?;
    std::fs::write(&config_path, content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("\nConfig saved to {}", config_path.display());
    println!("Run `jira-dashboard` to start the dashboard.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.server.base_url, "http://localhost:5000");
        assert_eq!(config.sprint.capacity_hours, 80.0);
        assert_eq!(config.sprint.light_below, 70.0);
        assert_eq!(config.sprint.full_above, 90.0);
        assert_eq!(config.sprint.overloaded_above, 100.0);
        assert!(config.graph.physics);
        assert_eq!(config.ui.tick_ms, 250);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = parse(
            r#"
            [server]
            base_url = "http://dash.local:8080"

            [sprint]
            capacity_hours = 120
            light_below = 60
            "#,
        )
        .unwrap();
        assert_eq!(config.server.base_url, "http://dash.local:8080");
        assert_eq!(config.sprint.capacity_hours, 120.0);
        assert_eq!(config.sprint.light_below, 60.0);
        assert_eq!(config.sprint.full_above, 90.0);
        assert_eq!(config.sprint.queue_ratio, 2.0);
    }

    #[test]
    fn test_load_missing_file_fails_with_hint() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("--init"));
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tracker]\nbrowse_url = \"https://jira.example.com\"\n").unwrap();
        let config = load(Some(&path)).unwrap();
        assert_eq!(config.tracker.browse_url, "https://jira.example.com");
    }

    #[test]
    fn test_graph_output_dir_override() {
        let mut config = Config::default();
        config.graph.output_dir = Some(PathBuf::from("/tmp/graphs"));
        assert_eq!(config.graph_output_dir().unwrap(), PathBuf::from("/tmp/graphs"));
    }
}
