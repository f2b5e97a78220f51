// Configuration module for intake-assist
// Loads ~/.config/intake-assist/config.toml and applies environment overrides

pub mod assist_types;
mod types;

pub use assist_types::AssistConfig;
pub use types::Config;

use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `[assist] api_key`
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Result of loading configuration
pub struct ConfigResult {
    pub config: Config,
    pub warning: Option<String>,
}

/// Loads configuration from ~/.config/intake-assist/config.toml
///
/// Returns default configuration if the file doesn't exist or on parse errors.
/// `OPENAI_API_KEY` takes precedence over the file's `api_key`.
pub fn load_config() -> ConfigResult {
    let mut result = load_config_from(&get_config_path());
    apply_env_overrides(&mut result.config, |name| std::env::var(name).ok());
    result
}

/// Loads configuration from an explicit path without environment overrides
pub fn load_config_from(config_path: &Path) -> ConfigResult {
    log::debug!("Loading config from {:?}", config_path);

    // If file doesn't exist, return defaults silently
    if !config_path.exists() {
        log::debug!("Config file does not exist, using defaults");
        return ConfigResult {
            config: Config::default(),
            warning: None,
        };
    }

    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            log::error!("Failed to read config file {:?}: {}", config_path, e);
            return ConfigResult {
                config: Config::default(),
                warning: Some(format!("Failed to read config: {}", e)),
            };
        }
    };

    match toml::from_str::<Config>(&contents) {
        Ok(config) => ConfigResult {
            config,
            warning: None,
        },
        Err(e) => {
            log::error!("Failed to parse config file {:?}: {}", config_path, e);
            ConfigResult {
                config: Config::default(),
                warning: Some(format!("Invalid config: {}", e)),
            }
        }
    }
}

/// Apply environment overrides through `lookup`
///
/// Blank values are ignored so an exported-but-empty variable does not
/// shadow a key from the file.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
        log::debug!("Using API key from {}", API_KEY_ENV);
        config.assist.api_key = Some(key);
    }
}

/// Returns the path to the configuration file
///
/// Always uses ~/.config/intake-assist/config.toml on all platforms for consistency.
fn get_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("intake-assist")
        .join("config.toml")
}
