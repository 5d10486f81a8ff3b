use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// File name of the optional per-project configuration.
pub const CONFIG_FILE: &str = "parapet.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub tui: TuiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Simulated network latency applied to fetch and mutate, in milliseconds.
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            latency_ms: default_latency_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Default path for `par export` when `--output` is not given.
    #[serde(default = "default_export_path")]
    pub path: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            path: default_export_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiConfig {
    /// Event-poll cadence of the TUI loop, in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}

fn default_latency_ms() -> u64 {
    800
}

fn default_export_path() -> String {
    crate::export::DEFAULT_EXPORT_FILE.to_string()
}

fn default_tick_ms() -> u64 {
    100
}

/// Load `parapet.toml` from `root`, falling back to defaults when absent.
pub fn load_project_config(root: &Path) -> Result<ProjectConfig> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(ProjectConfig::default());
    }
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: ProjectConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    debug!(latency_ms = config.service.latency_ms, "loaded project config");
    Ok(config)
}
