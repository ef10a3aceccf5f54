// Application settings
// Stored as RON in the user's config directory

use crate::playback::PlaybackRate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "musicloop";
const CONFIG_FILE: &str = "config.ron";

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;
pub const DEFAULT_EVENT_CAPACITY: usize = 256;
pub const MIN_EVENT_CAPACITY: usize = 16;
pub const DEFAULT_MAX_NOTIFICATIONS: usize = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("RON error: {0}")]
    Ron(#[from] ron::Error),

    #[error("No config directory available on this platform")]
    NoConfigDir,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where uploaded audio files live
    pub library_dir: PathBuf,
    /// Largest file accepted by import, in bytes
    pub max_upload_bytes: u64,
    /// Volume applied at startup, in [0, 1]
    pub default_volume: f32,
    pub default_rate: PlaybackRate,
    /// Ring buffer capacity of the UI event subscription
    pub event_capacity: usize,
    /// Notifications kept in the status bar history
    pub max_notifications: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            library_dir: default_library_dir(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            default_volume: 1.0,
            default_rate: PlaybackRate::Normal,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            max_notifications: DEFAULT_MAX_NOTIFICATIONS,
        }
    }
}

impl AppConfig {
    /// `<config dir>/musicloop/config.ron`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from the default location, falling back to defaults when the
    /// file is missing or unreadable
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            log::warn!("No config directory, using default settings");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: AppConfig = ron::from_str(&text)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config.sanitized())
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, text)?;
        log::debug!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn save_default(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigDir)?;
        self.save(&path)?;
        Ok(path)
    }

    /// Clamp out-of-range values read from disk
    pub fn sanitized(mut self) -> Self {
        self.default_volume = if self.default_volume.is_nan() {
            1.0
        } else {
            self.default_volume.clamp(0.0, 1.0)
        };
        self.event_capacity = self.event_capacity.max(MIN_EVENT_CAPACITY);
        self.max_notifications = self.max_notifications.max(1);
        if self.max_upload_bytes == 0 {
            self.max_upload_bytes = DEFAULT_MAX_UPLOAD_BYTES;
        }
        self
    }
}

fn default_library_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR).join("uploads"))
        .unwrap_or_else(|| PathBuf::from("uploads"))
}
