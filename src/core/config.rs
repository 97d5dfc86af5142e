use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Multi Scene Demo".into(),
            auto_close: 0.0,
        }
    }
}

/// Timing knobs for the scene transition sequencer.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TransitionConfig {
    /// Settle delay before the previous scene is unloaded (the fade window).
    pub fade_duration: f32,
    /// Upper bound on a single bundle load before the transition is failed.
    pub load_timeout: f32,
}
impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            fade_duration: 0.5,
            load_timeout: 15.0,
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub transition: TransitionConfig,
    /// Filesystem path of the scene catalog (not an asset path; read at startup).
    pub catalog_path: String,
    /// Filesystem path the user settings are persisted to.
    pub settings_path: String,
}
impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            transition: TransitionConfig::default(),
            catalog_path: "assets/scenes/catalog.ron".into(),
            settings_path: "user_settings.ron".into(),
        }
    }
}

impl GameConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }
    /// Non-fatal sanity warnings, logged once at startup.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width < 320.0 || self.window.height < 240.0 {
            w.push(format!(
                "window {}x{} below sensible minimum 320x240",
                self.window.width, self.window.height
            ));
        }
        if self.window.auto_close < 0.0 {
            w.push("window.autoClose negative; auto close disabled".into());
        }
        if self.transition.fade_duration < 0.0 {
            w.push("transition.fade_duration negative; treated as 0".into());
        }
        if self.transition.fade_duration > 5.0 {
            w.push(format!(
                "transition.fade_duration {} very long; transitions will feel stuck",
                self.transition.fade_duration
            ));
        }
        if self.transition.load_timeout <= 0.0 {
            w.push("transition.load_timeout must be > 0; loads could stall forever".into());
        }
        if self.catalog_path.trim().is_empty() {
            w.push("catalog_path empty; startup will fail".into());
        }
        if self.settings_path.trim().is_empty() {
            w.push("settings_path empty; settings will not persist".into());
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        assert!(GameConfig::default().validate().is_empty());
    }

    #[test]
    fn bad_timing_is_flagged() {
        let mut cfg = GameConfig::default();
        cfg.transition.load_timeout = 0.0;
        cfg.transition.fade_duration = -1.0;
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 2);
    }
}
