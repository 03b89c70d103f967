//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logging backend
//! - Wall-clock seeding
//! - The JS-facing session handle (web only)

/// Install the log backend and panic hook. Safe to call more than once.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Install the log backend and panic hook. Safe to call more than once.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    // Errors only when a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Seed derived from the wall clock
#[cfg(not(target_arch = "wasm32"))]
pub fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Seed derived from the wall clock
#[cfg(target_arch = "wasm32")]
pub fn clock_seed() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(target_arch = "wasm32")]
pub use web::WebSession;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::prelude::*;

    use crate::audio::AudioManager;
    use crate::persistence::LocalStorageStore;
    use crate::session::Session;
    use crate::settings::Settings;
    use crate::sim::GamePhase;
    use crate::tuning::Tuning;

    /// Session handle for a JS render loop. Call `frame` once per
    /// `requestAnimationFrame` and draw the returned JSON snapshot.
    #[wasm_bindgen]
    pub struct WebSession {
        inner: Session<AudioManager, LocalStorageStore>,
        settings: Settings,
    }

    #[wasm_bindgen]
    impl WebSession {
        /// `tuning_json` may be empty for the default balance
        #[wasm_bindgen(constructor)]
        pub fn new(tuning_json: &str) -> Result<WebSession, JsValue> {
            super::init_logging();
            let tuning = if tuning_json.trim().is_empty() {
                Tuning::default()
            } else {
                Tuning::from_json(tuning_json).map_err(|e| JsValue::from_str(&e.to_string()))?
            };
            let settings = Settings::load();
            let seed = super::clock_seed();
            log::info!("Sky Leap starting (seed {seed})");
            Ok(Self {
                inner: Session::new(tuning, seed, AudioManager::new(settings.clone()), LocalStorageStore),
                settings,
            })
        }

        #[wasm_bindgen(js_name = pointerDown)]
        pub fn pointer_down(&mut self, x: f64) {
            if self.inner.engine().phase() != GamePhase::Playing {
                // Audio may only start from a user gesture
                self.inner.sound().resume();
            }
            self.inner.pointer_down(x);
        }

        #[wasm_bindgen(js_name = pointerMove)]
        pub fn pointer_move(&mut self, x: f64) {
            self.inner.pointer_move(x);
        }

        #[wasm_bindgen(js_name = pointerUp)]
        pub fn pointer_up(&mut self) {
            self.inner.pointer_up();
        }

        /// Advance one tick; returns `{ frame, world }` as JSON
        pub fn frame(&mut self) -> String {
            serde_json::to_string(&self.inner.frame()).unwrap_or_default()
        }

        /// Frame counter of the latest snapshot
        #[wasm_bindgen(js_name = frameCount)]
        pub fn frame_count(&self) -> f64 {
            self.inner.snapshot().frame as f64
        }

        /// Current preferences as JSON
        #[wasm_bindgen(js_name = settings)]
        pub fn settings_json(&self) -> String {
            serde_json::to_string(&self.settings).unwrap_or_default()
        }

        /// Replace preferences (partial JSON falls back to defaults), persist
        /// them and apply them to the audio backend
        #[wasm_bindgen(js_name = setSettings)]
        pub fn set_settings(&mut self, json: &str) -> Result<(), JsValue> {
            let settings: Settings =
                serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
            settings.save();
            self.inner.sound_mut().set_settings(settings.clone());
            self.settings = settings;
            log::info!("Settings updated");
            Ok(())
        }

        /// Shake magnitude after accessibility settings
        #[wasm_bindgen(js_name = effectiveShake)]
        pub fn effective_shake(&self) -> f64 {
            self.settings.effective_shake(self.inner.snapshot().shake)
        }

        /// Speed-line intensity after accessibility settings
        #[wasm_bindgen(js_name = effectiveSpeedLines)]
        pub fn effective_speed_lines(&self) -> f64 {
            self.settings
                .effective_speed_lines(self.inner.snapshot().speed_line_alpha)
        }

        #[wasm_bindgen(js_name = bestScore)]
        pub fn best_score(&self) -> f64 {
            self.inner.snapshot().best_score as f64
        }
    }
}
