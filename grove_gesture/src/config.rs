//! Application configuration.
//!
//! Every field has a default, so a JSON file only needs the keys it changes:
//!
//! ```json
//! { "particle_count": 80000, "theme": "lagoon", "audio": { "enabled": false } }
//! ```

use std::path::Path;

use grove_field::archetype::{DEFAULT_PARTICLE_COUNT, DEFAULT_TREE_COUNT};
use grove_field::ThemeColor;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which hand-tracking source feeds the field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Keyboard + mouse simulation through the visualizer window.
    #[default]
    Sim,
    /// LeapMotion palm tracking (needs the `leap` feature).
    Leap,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width:  usize,
    pub height: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig { width: 1280, height: 720 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// When false the pad thread runs against a null output and never touches
    /// a MIDI port.
    pub enabled:  bool,
    /// General MIDI program of the pad voice.
    pub program:  u8,
    pub velocity: u8,
    pub channel:  u8,
}

impl Default for AudioConfig {
    fn default() -> Self {
        // GM 89 "Pad 2 (warm)"
        AudioConfig { enabled: true, program: 89, velocity: 70, channel: 0 }
    }
}

/// Configuration for the full application.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub particle_count: usize,
    pub tree_count:     usize,
    pub seed:           u64,
    pub theme:          ThemeColor,
    pub window:         WindowConfig,
    pub audio:          AudioConfig,
    pub source:         SourceKind,
    /// Capture cadence of the simulated camera, frames per second.
    pub video_fps:      f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            particle_count: DEFAULT_PARTICLE_COUNT,
            tree_count:     DEFAULT_TREE_COUNT,
            seed:           42,
            theme:          ThemeColor::default(),
            window:         WindowConfig::default(),
            audio:          AudioConfig::default(),
            source:         SourceKind::default(),
            video_fps:      30.0,
        }
    }
}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::IO(e, Some(path.display().to_string())))?;
        let cfg = Self::from_json(&text)?;
        log::info!("loaded config from {}", path.display());
        Ok(cfg)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
