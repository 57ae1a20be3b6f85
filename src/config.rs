use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReconstructError, Result};

/// Runtime configuration for build-reconstructor.
///
/// Covers the external tool command lines and behavior defaults; everything
/// has a working default so no file is required.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

/// External tool command lines. Values are full command strings so a tool
/// can be invoked through a wrapper (e.g. `tar = "bsdtar"`).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ToolsConfig {
    #[serde(default = "default_tar")]
    pub tar: String,

    #[serde(default = "default_sloccount")]
    pub sloccount: String,
}

fn default_tar() -> String {
    "tar".to_string()
}

fn default_sloccount() -> String {
    "sloccount".to_string()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        ToolsConfig {
            tar: default_tar(),
            sloccount: default_sloccount(),
        }
    }
}

impl ToolsConfig {
    /// The tar command line, split into argv parts.
    pub fn tar_command(&self) -> Result<Vec<String>> {
        split_command(&self.tar)
    }

    /// The sloccount command line, split into argv parts.
    pub fn sloccount_command(&self) -> Result<Vec<String>> {
        split_command(&self.sloccount)
    }
}

fn split_command(raw: &str) -> Result<Vec<String>> {
    let parts = shell_words::split(raw)
        .map_err(|e| ReconstructError::config(format!("bad tool command '{}': {}", raw, e)))?;
    if parts.is_empty() {
        return Err(ReconstructError::config(format!(
            "tool command '{}' is empty",
            raw
        )));
    }
    Ok(parts)
}

/// Behavior defaults that CLI flags can override.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct BehaviorConfig {
    #[serde(default)]
    pub keep_files: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tools: ToolsConfig::default(),
            behavior: BehaviorConfig::default(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Lookup order:
/// 1. Custom path provided as parameter
/// 2. `reconstructor.toml` in current directory
/// 3. `reconstructor.toml` in the user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./reconstructor.toml").exists() {
        fs::read_to_string("./reconstructor.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("reconstructor.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    toml::from_str(&config_str).map_err(|e| ReconstructError::config(e.to_string()))
}
