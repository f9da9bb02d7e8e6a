pub mod loader;
pub mod sections;

use log::warn;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

pub use sections::{AudioConfig, DisplayConfig, SessionConfig};

// Global configuration instance with thread-safe access
pub static CONFIG: once_cell::sync::Lazy<Arc<RwLock<Config>>> =
    once_cell::sync::Lazy::new(|| Arc::new(RwLock::new(Config::default())));

// Time to wait between checking for config file changes
const CONFIG_CHECK_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(skip)]
    last_checked: Option<Instant>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            audio: AudioConfig::default(),
            display: DisplayConfig::default(),
            session: SessionConfig::default(),
            last_checked: Some(Instant::now()),
        }
    }
}

impl Config {
    /// Snapshot of the global configuration
    #[must_use]
    pub fn current() -> Self {
        match CONFIG.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    // Check if the config needs to be reloaded and reload if necessary
    pub fn check_and_reload() -> bool {
        let now = Instant::now();
        let should_check = Self::current()
            .last_checked
            .is_none_or(|last_checked| now.duration_since(last_checked) > CONFIG_CHECK_INTERVAL);

        if !should_check {
            return false;
        }

        match loader::load_config_from_file() {
            Ok(Some(new_config)) => {
                Self::install(new_config, now);
                true
            }
            Ok(None) => {
                Self::touch(now);
                false
            }
            Err(e) => {
                warn!("Keeping previous configuration: {e}");
                Self::touch(now);
                false
            }
        }
    }

    // Force reload the configuration from file
    pub fn force_reload() -> bool {
        loader::reset_modification_time();
        match loader::load_config_from_file() {
            Ok(Some(new_config)) => {
                Self::install(new_config, Instant::now());
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!("Failed to reload configuration: {e}");
                false
            }
        }
    }

    fn install(mut new_config: Config, now: Instant) {
        new_config.last_checked = Some(now);
        match CONFIG.write() {
            Ok(mut config) => *config = new_config,
            Err(poisoned) => *poisoned.into_inner() = new_config,
        }
    }

    fn touch(now: Instant) {
        match CONFIG.write() {
            Ok(mut config) => config.last_checked = Some(now),
            Err(poisoned) => poisoned.into_inner().last_checked = Some(now),
        }
    }
}
