//! Player preferences
//!
//! Persisted separately from the best score (LocalStorage on web, a JSON
//! file on native).

use serde::{Deserialize, Serialize};

#[cfg(not(target_arch = "wasm32"))]
use crate::error::Result;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Vibrate on landings and game over (mobile)
    pub haptics: bool,

    // === Visual ===
    /// Screen shake on landings/game over
    pub screen_shake: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, no speed lines)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            haptics: true,
            screen_shake: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Volume actually applied to cues
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Shake magnitude the renderer should apply
    pub fn effective_shake(&self, shake: f64) -> f64 {
        if self.screen_shake && !self.reduced_motion {
            shake
        } else {
            0.0
        }
    }

    /// Speed-line intensity the renderer should apply
    pub fn effective_speed_lines(&self, alpha: f64) -> f64 {
        if self.reduced_motion { 0.0 } else { alpha }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "skyleap_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(Ok(Some(json))) = storage.map(|s| s.get_item(Self::STORAGE_KEY)) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(e) => log::warn!("Discarding unreadable settings: {e}"),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let (Some(storage), Ok(json)) = (storage, serde_json::to_string(self)) {
            if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                log::warn!("Settings not saved");
            }
        }
    }

    /// Load settings from a JSON file; missing or unreadable files give defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Self {
        let path = path.as_ref();
        let Ok(json) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("Discarding unreadable settings {}: {e}", path.display());
            Self::default()
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
