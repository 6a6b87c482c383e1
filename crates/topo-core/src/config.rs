//! Configuration for topology rendering.
//!
//! Load order: `.topograph/config.toml` → environment variables → defaults.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level topograph configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TopoConfig {
    pub render: RenderConfig,
}

/// Chart and diagram rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Title of the generated HTML page.
    pub page_title: String,
    /// Chart width in pixels.
    pub width: u32,
    /// Chart height in pixels.
    pub height: u32,
    /// Node symbol diameter in pixels.
    pub symbol_size: u32,
    /// Force-layout repulsion between nodes.
    pub repulsion: f64,
    /// Force-layout pull towards the center.
    pub gravity: f64,
    /// Colors handed out to containers in first-seen order. Wraps around
    /// when a graph has more containers than colors.
    pub palette: Vec<String>,
}

const DEFAULT_PALETTE: [&str; 10] = [
    "#ff595e", "#ff924c", "#ffca3a", "#c5ca30", "#8ac926", "#52a675", "#1982c4", "#4267ac",
    "#6a4c93", "#b5a6c9",
];

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            page_title: "Network diagrams".to_string(),
            width: 1000,
            height: 800,
            symbol_size: 40,
            repulsion: 4000.0,
            gravity: 0.5,
            palette: DEFAULT_PALETTE.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s.chars().skip(1).all(|c| c.is_ascii_hexdigit())
}

impl TopoConfig {
    /// Load config from `.topograph/config.toml` in the project root, with env
    /// var overrides. Falls back to defaults if no config file exists.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(".topograph").join("config.toml");

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        env_override("TOPO_CHART_WIDTH", &mut config.render.width);
        env_override("TOPO_CHART_HEIGHT", &mut config.render.height);
        env_override("TOPO_SYMBOL_SIZE", &mut config.render.symbol_size);
        env_override("TOPO_REPULSION", &mut config.render.repulsion);
        env_override("TOPO_GRAVITY", &mut config.render.gravity);

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.render.palette.is_empty() {
            anyhow::bail!("render.palette must contain at least one color");
        }
        if let Some(bad) = self.render.palette.iter().find(|c| !is_hex_color(c)) {
            anyhow::bail!("render.palette entry '{}' is not a #rrggbb color", bad);
        }
        Ok(())
    }
}
