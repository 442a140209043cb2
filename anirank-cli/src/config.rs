/// Config file loading and creation for the anirank CLI.
///
/// Config lives at ~/.config/anirank/config.toml.
/// All fields are optional — CLI args override config values.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bail;

#[derive(Deserialize, Default)]
pub struct AnirankConfig {
    pub k_factor: Option<f64>,
    pub seed: Option<i64>,
    pub target: Option<u32>,
    pub allow_repeats: Option<bool>,
    pub assume_dropped_lower: Option<bool>,
    pub target_mean: Option<f64>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# anirank configuration
# All values here can be overridden by CLI flags.

# Elo k-factor (typically 1-200)
# k_factor = 32.0

# RNG seed for reproducible sessions
# seed = 42

# Total comparison target (overrides the planner's \"optimal\" suggestion)
# target = 200

# Allow a pair to be compared more than once
# allow_repeats = false

# Keep dropped items below everything else and never compare across the boundary
# assume_dropped_lower = true

# Solve for the percentile shift that hits this mean final score
# target_mean = 7.0
";

/// Returns the default config path: ~/.config/anirank/config.toml
pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| bail("HOME environment variable not set"));
    PathBuf::from(home).join(".config").join("anirank").join("config.toml")
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> AnirankConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            toml::from_str(&content)
                .unwrap_or_else(|e| bail(format!("Failed to parse config at {}: {e}", path.display())))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => AnirankConfig::default(),
        Err(e) => bail(format!("Failed to read config at {}: {e}", path.display())),
    }
}

/// Create the default config file. Errors if it already exists.
pub fn create_default_config() -> PathBuf {
    let path = config_path();

    if path.exists() {
        bail(format!("Config file already exists at {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
    }

    std::fs::write(&path, DEFAULT_CONFIG_TEMPLATE)
        .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));

    path
}
