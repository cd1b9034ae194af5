//! Relay configuration
//!
//! Supports multiple profiles (debug, release) with different settings.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::gesture::EngineOptions;

/// Demo window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width
    pub width: f64,
    /// Window height
    pub height: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Gesture Relay".to_string(),
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// The active profile (debug, release, etc.)
    pub profile: String,
    /// Default `tracing` filter when `RUST_LOG` is unset
    pub log_filter: String,
    /// Demo window configuration
    pub window: WindowConfig,
    /// Engine options; missing keys take the engine defaults
    pub engine: EngineOptions,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            profile: "debug".to_string(),
            log_filter: "info".to_string(),
            window: WindowConfig::default(),
            engine: EngineOptions::default(),
        }
    }
}

impl RelayConfig {
    /// Loads configuration based on the specified profile
    ///
    /// Sources, later ones overriding earlier ones:
    /// 1. config/{profile}.toml (profile-specific configuration)
    /// 2. Environment variables with prefix RELAY_ (e.g., RELAY_ENGINE__MODE=native)
    ///
    /// Config files are searched for next to the executable first, then in ./config.
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        builder = match Self::find_config_dir() {
            Some(dir) => builder.add_source(File::from(dir.join(profile).as_path()).required(false)),
            None => builder.add_source(File::with_name(&format!("config/{}", profile)).required(false)),
        };

        // Use __ as separator for nested fields (e.g., RELAY_ENGINE__TOUCH_MULTIPLIER)
        builder = builder.add_source(
            Environment::with_prefix("RELAY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.set_override("profile", profile)?.build()?;

        config.try_deserialize()
    }

    /// Finds the config directory by searching in multiple locations
    fn find_config_dir() -> Option<std::path::PathBuf> {
        if let Ok(exe_path) = std::env::current_exe()
            && let Some(exe_dir) = exe_path.parent()
        {
            let config_dir = exe_dir.join("config");
            if config_dir.exists() {
                return Some(config_dir);
            }
        }

        let cwd_config = std::path::PathBuf::from("config");
        if cwd_config.exists() {
            return Some(cwd_config);
        }

        None
    }

    /// Loads configuration using the RELAY_PROFILE environment variable,
    /// defaulting to "debug"
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let profile = std::env::var("RELAY_PROFILE").unwrap_or_else(|_| "debug".to_string());
        Self::load(&profile)
    }
}
