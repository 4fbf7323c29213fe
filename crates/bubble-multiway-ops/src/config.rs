//! Configuration for the operations layer.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{OpsError, OpsResult};

/// Environment variable that relocates the config directory.
pub const CONFIG_DIR_ENV: &str = "BMW_CONFIG_DIR";

/// Configuration for bubble-multiway operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory where default-named artifacts are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// State count above which a build logs a size warning.
    #[serde(default = "default_max_states")]
    pub max_states: u64,

    /// Node radius in pixels for rendered images.
    #[serde(default = "default_node_size")]
    pub node_size: f32,

    /// Label font size in pixels.
    #[serde(default = "default_font_size")]
    pub font_size: f32,

    /// Fill colour for multiway state nodes.
    #[serde(default = "default_node_color")]
    pub node_color: String,

    /// Fill colour for causal event nodes.
    #[serde(default = "default_causal_node_color")]
    pub causal_node_color: String,

    /// Fill colour for the super-source.
    #[serde(default = "default_super_source_color")]
    pub super_source_color: String,

    /// Overall image scale factor.
    #[serde(default = "default_scale")]
    pub scale: f32,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_max_states() -> u64 {
    40_320 // 8!
}

fn default_node_size() -> f32 {
    14.0
}

fn default_font_size() -> f32 {
    8.0
}

fn default_node_color() -> String {
    "#9ecae1".to_string()
}

fn default_causal_node_color() -> String {
    "#fdd0a2".to_string()
}

fn default_super_source_color() -> String {
    "#fc9272".to_string()
}

fn default_scale() -> f32 {
    1.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            max_states: default_max_states(),
            node_size: default_node_size(),
            font_size: default_font_size(),
            node_color: default_node_color(),
            causal_node_color: default_causal_node_color(),
            super_source_color: default_super_source_color(),
            scale: default_scale(),
        }
    }
}

impl Config {
    /// Keys accepted by [`get`](Self::get) and [`set`](Self::set).
    pub const KEYS: [&'static str; 8] = [
        "output_dir",
        "max_states",
        "node_size",
        "font_size",
        "node_color",
        "causal_node_color",
        "super_source_color",
        "scale",
    ];

    /// Load configuration from disk with environment overrides.
    pub fn load() -> OpsResult<Self> {
        let config = match Self::config_file_path() {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path)?;
                serde_json::from_str(&contents)?
            }
            _ => Self::default(),
        };
        config.with_env_overrides()
    }

    /// Apply `BMW_*` environment variables on top of this configuration.
    pub fn with_env_overrides(mut self) -> OpsResult<Self> {
        for (var, key) in [
            ("BMW_OUTPUT_DIR", "output_dir"),
            ("BMW_MAX_STATES", "max_states"),
            ("BMW_NODE_COLOR", "node_color"),
            ("BMW_CAUSAL_NODE_COLOR", "causal_node_color"),
        ] {
            if let Ok(value) = std::env::var(var) {
                self.set(key, &value)?;
            }
        }
        Ok(self)
    }

    /// Save configuration to disk.
    pub fn save(&self) -> OpsResult<()> {
        if let Some(path) = Self::config_file_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(self)?;
            std::fs::write(&path, contents)?;
        }
        Ok(())
    }

    /// Remove the saved configuration file, if any.
    pub fn reset() -> OpsResult<()> {
        if let Some(path) = Self::config_file_path() {
            if path.exists() {
                std::fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_file_path() -> Option<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Some(PathBuf::from(dir).join("config.json"));
        }
        ProjectDirs::from("dev", "bubble-multiway", "bmw")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "output_dir" => Some(self.output_dir.display().to_string()),
            "max_states" => Some(self.max_states.to_string()),
            "node_size" => Some(self.node_size.to_string()),
            "font_size" => Some(self.font_size.to_string()),
            "node_color" => Some(self.node_color.clone()),
            "causal_node_color" => Some(self.causal_node_color.clone()),
            "super_source_color" => Some(self.super_source_color.clone()),
            "scale" => Some(self.scale.to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key.
    pub fn set(&mut self, key: &str, value: &str) -> OpsResult<()> {
        match key {
            "output_dir" => self.output_dir = PathBuf::from(value),
            "max_states" => {
                self.max_states = value
                    .parse()
                    .map_err(|_| OpsError::Config(format!("Invalid number: {}", value)))?;
            }
            "node_size" => self.node_size = parse_positive(key, value)?,
            "font_size" => self.font_size = parse_positive(key, value)?,
            "scale" => self.scale = parse_positive(key, value)?,
            "node_color" => self.node_color = value.to_string(),
            "causal_node_color" => self.causal_node_color = value.to_string(),
            "super_source_color" => self.super_source_color = value.to_string(),
            _ => {
                return Err(OpsError::Config(format!("Unknown config key: {}", key)));
            }
        }
        Ok(())
    }
}

fn parse_positive(key: &str, value: &str) -> OpsResult<f32> {
    match value.parse::<f32>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(OpsError::Config(format!(
            "{} must be a positive number, got {}",
            key, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_round_trip_for_every_key() {
        let mut config = Config::default();
        for key in Config::KEYS {
            let current = config.get(key).unwrap();
            config.set(key, &current).unwrap();
        }
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("max_states", "lots").is_err());
        assert!(config.set("scale", "0").is_err());
        assert!(config.set("scale", "-2").is_err());
        assert!(config.set("no_such_key", "1").is_err());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = serde_json::from_str(r#"{"max_states": 10}"#).unwrap();
        assert_eq!(config.max_states, 10);
        assert_eq!(config.node_color, "#9ecae1");
        assert_eq!(config.scale, 1.0);
    }
}
