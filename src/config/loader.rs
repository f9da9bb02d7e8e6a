#![warn(clippy::all, clippy::pedantic)]

use log::debug;
use once_cell::sync::Lazy;
use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;

use super::Config;

// Default config file path
const CONFIG_FILE_PATH: &str = "config/rgb_beam.toml";

// Environment variable overriding the config location
pub const CONFIG_ENV_VAR: &str = "RGB_BEAM_CONFIG";

// Last modified time of the config file as of the previous load
static LAST_MODIFIED: Lazy<Mutex<Option<SystemTime>>> = Lazy::new(|| Mutex::new(None));

/// Loads the config file if it changed since the last load.
///
/// Returns `Ok(None)` when the file is unchanged. A missing file is created
/// with default values.
pub fn load_config_from_file() -> Result<Option<Config>, ConfigError> {
    let config_path = get_config_file_path();

    if config_path.exists() {
        let last_modified = fs::metadata(&config_path)?.modified()?;
        let previous = *LAST_MODIFIED.lock().unwrap_or_else(|e| e.into_inner());
        if previous == Some(last_modified) {
            return Ok(None);
        }
    }

    let config = load_config_from_path(&config_path)?;
    remember_modification_time(&config_path);
    Ok(Some(config))
}

/// Reads a config from `path`, writing the defaults there first if it is missing
pub fn load_config_from_path(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        debug!("No config at {}, writing defaults", path.display());
        let default_config = Config::default();
        save_config_to_path(&default_config, path)?;
        return Ok(default_config);
    }

    let mut file = fs::File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let config: Config = toml::from_str(&contents)?;
    Ok(config)
}

pub fn save_config_to_path(config: &Config, path: &Path) -> Result<(), ConfigError> {
    // Create parent directory if it doesn't exist
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let toml_string = toml::to_string_pretty(config)?;
    fs::write(path, toml_string)?;
    Ok(())
}

/// Forgets the remembered modification time so the next load reads the file
pub fn reset_modification_time() {
    *LAST_MODIFIED.lock().unwrap_or_else(|e| e.into_inner()) = None;
}

fn remember_modification_time(path: &Path) {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok();
    *LAST_MODIFIED.lock().unwrap_or_else(|e| e.into_inner()) = modified;
}

// Get the path to the config file
#[must_use]
pub fn get_config_file_path() -> PathBuf {
    // Check for environment variable override
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return PathBuf::from(path);
    }

    // Otherwise use default path in user's config directory
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("rgb_beam").join("config.toml")
    } else {
        // Fallback to local directory
        PathBuf::from(CONFIG_FILE_PATH)
    }
}

// Custom error type for configuration operations
#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "invalid config file: {e}"),
            ConfigError::Serialize(e) => write!(f, "could not serialize config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Serialize(err)
    }
}
