use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub fn config_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("quadgrid")
        .join("config.toml")
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Ratio restored to a gallery's placeholder box when stacked mode is
    /// turned off, as a percentage of the box width. Hosts reserve a 16:9
    /// slot by default.
    #[serde(default = "default_placeholder_ratio")]
    pub placeholder_ratio_percent: f64,
    /// Opacity applied to a tile while it is the active drag source.
    #[serde(default = "default_drag_opacity")]
    pub drag_opacity: f64,
}

fn default_placeholder_ratio() -> f64 { 56.25 }
fn default_drag_opacity() -> f64 { 0.5 }

impl Default for Settings {
    fn default() -> Self {
        Self {
            placeholder_ratio_percent: default_placeholder_ratio(),
            drag_opacity: default_drag_opacity(),
        }
    }
}

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Validates configuration values and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.settings.placeholder_ratio_percent <= 0.0 {
            issues.push(format!(
                "settings.placeholder_ratio_percent must be positive, got {}",
                self.settings.placeholder_ratio_percent
            ));
        }
        if !(0.0..=1.0).contains(&self.settings.drag_opacity) {
            issues.push(format!(
                "settings.drag_opacity must be between 0 and 1, got {}",
                self.settings.drag_opacity
            ));
        }
        issues
    }
}
