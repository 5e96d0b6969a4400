use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use shaderbrot_core::input::DEFAULT_PAN_DAMPING;
use shaderbrot_core::viewport::{DEFAULT_ITERATIONS, DEFAULT_ZOOM_RATIO};
use shaderbrot_core::{Bounds, ViewportDefaults};

// ---------------------------------------------------------------------------
// Application preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppPreferences {
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
    /// Rectangle of the complex plane shown at startup and after a reset.
    #[serde(default)]
    pub initial_bounds: Bounds,
    #[serde(default = "default_iterations")]
    pub initial_iterations: u32,
    /// Span multiplier per zoom-in notch, strictly between 0 and 1.
    #[serde(default = "default_zoom_ratio")]
    pub zoom_ratio: f64,
    /// `k` in the pan damping `k * log10(iterations)`.
    #[serde(default = "default_pan_damping")]
    pub pan_damping: f64,
    #[serde(default)]
    pub show_hud: bool,
    #[serde(default = "default_true")]
    pub vsync: bool,
}

fn default_window_width() -> f32 {
    800.0
}
fn default_window_height() -> f32 {
    800.0
}
fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}
fn default_zoom_ratio() -> f64 {
    DEFAULT_ZOOM_RATIO
}
fn default_pan_damping() -> f64 {
    DEFAULT_PAN_DAMPING
}
fn default_true() -> bool {
    true
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            initial_bounds: Bounds::DEFAULT,
            initial_iterations: default_iterations(),
            zoom_ratio: default_zoom_ratio(),
            pan_damping: default_pan_damping(),
            show_hud: false,
            vsync: true,
        }
    }
}

impl AppPreferences {
    /// Load preferences from next to the executable, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!("No preferences file at {}", path.display());
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<AppPreferences>(&json) {
                Ok(prefs) => {
                    info!("Loaded preferences from {}", path.display());
                    return prefs.sanitized();
                }
                Err(e) => error!("Failed to parse preferences: {e}"),
            },
            Err(e) => error!("Failed to read preferences file: {e}"),
        }
        Self::default()
    }

    /// Persist preferences to disk.
    pub fn save(&self) {
        self.save_to(&config_path());
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences");
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }

    /// Replace out-of-range values with their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.window_width >= 1.0 && self.window_height >= 1.0) {
            warn!(
                "Ignoring window size {}x{}",
                self.window_width, self.window_height
            );
            self.window_width = defaults.window_width;
            self.window_height = defaults.window_height;
        }
        if self.initial_iterations < 1 {
            warn!("Ignoring initial_iterations 0");
            self.initial_iterations = defaults.initial_iterations;
        }
        if !(self.zoom_ratio > 0.0 && self.zoom_ratio < 1.0) {
            warn!("Ignoring zoom_ratio {}", self.zoom_ratio);
            self.zoom_ratio = defaults.zoom_ratio;
        }
        if !(self.pan_damping.is_finite() && self.pan_damping > 0.0) {
            warn!("Ignoring pan_damping {}", self.pan_damping);
            self.pan_damping = defaults.pan_damping;
        }
        self
    }

    pub fn viewport_defaults(&self) -> ViewportDefaults {
        ViewportDefaults::new(self.initial_bounds, self.initial_iterations, self.zoom_ratio)
            .unwrap_or_default()
    }
}

fn config_path() -> PathBuf {
    crate::app_dir::exe_directory().join("preferences.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let prefs: AppPreferences = serde_json::from_str("{}").unwrap();
        assert_eq!(prefs, AppPreferences::default());
        assert_eq!(prefs.viewport_defaults(), ViewportDefaults::default());
    }

    #[test]
    fn out_of_range_values_are_replaced() {
        let prefs: AppPreferences = serde_json::from_str(
            r#"{"initial_iterations":0,"zoom_ratio":1.5,"pan_damping":-1.0,"window_width":0}"#,
        )
        .unwrap();
        let prefs = prefs.sanitized();
        assert_eq!(prefs.initial_iterations, DEFAULT_ITERATIONS);
        assert_eq!(prefs.zoom_ratio, DEFAULT_ZOOM_RATIO);
        assert_eq!(prefs.pan_damping, DEFAULT_PAN_DAMPING);
        assert_eq!(prefs.window_width, 800.0);
    }

    #[test]
    fn zero_pan_damping_is_replaced() {
        let prefs: AppPreferences = serde_json::from_str(r#"{"pan_damping":0.0}"#).unwrap();
        assert_eq!(prefs.sanitized().pan_damping, DEFAULT_PAN_DAMPING);
    }

    #[test]
    fn inverted_bounds_fail_to_parse() {
        let parsed = serde_json::from_str::<AppPreferences>(
            r#"{"initial_bounds":{"min_x":2,"max_x":-2,"min_y":-2,"max_y":2}}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = std::env::temp_dir().join("shaderbrot_test_prefs");
        let path = dir.join("preferences.json");
        let prefs = AppPreferences {
            initial_iterations: 120,
            zoom_ratio: 0.5,
            show_hud: true,
            initial_bounds: Bounds::new(-2.5, 1.0, -1.25, 1.25).unwrap(),
            ..AppPreferences::default()
        };
        prefs.save_to(&path);
        assert_eq!(AppPreferences::load_from(&path), prefs);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unreadable_file_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join("shaderbrot_test_prefs_bad");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("preferences.json");
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(AppPreferences::load_from(&path), AppPreferences::default());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
