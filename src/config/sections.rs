use serde::{Deserialize, Serialize};

// Sound effect settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sound_enabled: bool,
    pub volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            volume: 0.5,
        }
    }
}

// Terminal front end settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub frame_ms: u64,        // Render period
    pub show_timer_bar: bool, // Per-target time bar under the lane
    pub beam_flash_ms: u64,   // How long a fired beam stays visible
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            show_timer_bar: true,
            beam_flash_ms: 180,
        }
    }
}

// Game session settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Fixes the color sequence; a fresh random seed is used when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}
