use bevy::audio::Volume;
use bevy::prelude::*;
use bevy::window::{MonitorSelection, PrimaryWindow, WindowFocused, WindowMode};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::core::config::GameConfig;

/// Labels for the quality dropdown; the stored setting is the index.
pub const QUALITY_LEVELS: &[&str] = &["Low", "Medium", "High", "Ultra"];

/// Marker for looping background-music playback entities.
#[derive(Component)]
pub struct MusicChannel;

/// Marker for one-shot effect playback entities (button clicks etc.).
#[derive(Component)]
pub struct EffectsChannel;

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub master_volume: f32,
    pub music_volume: f32,
    pub effects_volume: f32,
    pub quality: usize,
    pub fullscreen: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.75,
            music_volume: 0.6,
            effects_volume: 0.8,
            quality: 2,
            fullscreen: false,
        }
    }
}

impl UserSettings {
    pub fn quality_label(&self) -> &'static str {
        QUALITY_LEVELS[self.quality.min(QUALITY_LEVELS.len() - 1)]
    }

    /// Master is a parent group of both channels, so it multiplies in.
    pub fn music_db(&self) -> f32 {
        linear_to_decibels(self.master_volume * self.music_volume)
    }

    pub fn effects_db(&self) -> f32 {
        linear_to_decibels(self.master_volume * self.effects_volume)
    }
}

/// Mixer mapping for a linear 0..1 slider value. Clamped at the bottom so
/// zero maps to -80 dB rather than negative infinity.
pub fn linear_to_decibels(linear: f32) -> f32 {
    20.0 * linear.clamp(1e-4, 1.0).log10()
}

/// RON-backed persistence for [`UserSettings`].
#[derive(Resource, Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<UserSettings, String> {
        let data =
            fs::read_to_string(&self.path).map_err(|e| format!("read {:?}: {e}", self.path))?;
        ron::from_str(&data).map_err(|e| format!("parse {:?}: {e}", self.path))
    }

    /// Missing or corrupt settings degrade to defaults; the error is returned
    /// for logging, never raised.
    pub fn load_or_default(&self) -> (UserSettings, Option<String>) {
        match self.load() {
            Ok(settings) => (settings, None),
            Err(e) => (UserSettings::default(), Some(e)),
        }
    }

    pub fn save(&self, settings: &UserSettings) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| format!("create {parent:?}: {e}"))?;
            }
        }
        let data = ron::ser::to_string_pretty(settings, ron::ser::PrettyConfig::default())
            .map_err(|e| format!("serialize settings: {e}"))?;
        fs::write(&self.path, data).map_err(|e| format!("write {:?}: {e}", self.path))
    }
}

pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        let path = app
            .world()
            .get_resource::<GameConfig>()
            .map(|cfg| cfg.settings_path.clone())
            .unwrap_or_else(|| GameConfig::default().settings_path);
        let store = SettingsStore::new(path);
        let (settings, err) = store.load_or_default();
        if let Some(e) = err {
            warn!(target: "settings", "no stored settings ({e}); using defaults");
        }
        app.insert_resource(store)
            .insert_resource(settings)
            // No-op under DefaultPlugins; keeps headless runs (no WindowPlugin) valid.
            .add_event::<WindowFocused>()
            .add_systems(
                Update,
                (apply_audio_volumes, apply_window_mode, apply_camera_msaa)
                    .run_if(resource_changed::<UserSettings>),
            )
            .add_systems(Update, flush_on_focus_loss)
            .add_systems(Last, flush_on_exit);
    }
}

fn apply_audio_volumes(
    settings: Res<UserSettings>,
    mut music: Query<&mut AudioSink, (With<MusicChannel>, Without<EffectsChannel>)>,
    mut effects: Query<&mut AudioSink, (With<EffectsChannel>, Without<MusicChannel>)>,
) {
    for mut sink in &mut music {
        sink.set_volume(Volume::Decibels(settings.music_db()));
    }
    for mut sink in &mut effects {
        sink.set_volume(Volume::Decibels(settings.effects_db()));
    }
}

fn apply_window_mode(
    settings: Res<UserSettings>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    let Ok(mut window) = windows.single_mut() else {
        return;
    };
    let wanted = if settings.fullscreen {
        WindowMode::BorderlessFullscreen(MonitorSelection::Current)
    } else {
        WindowMode::Windowed
    };
    if window.mode != wanted {
        window.mode = wanted;
    }
}

fn apply_camera_msaa(
    settings: Res<UserSettings>,
    mut commands: Commands,
    cameras: Query<Entity, With<Camera>>,
) {
    let msaa = match settings.quality {
        0 => Msaa::Off,
        1 => Msaa::Sample2,
        2 => Msaa::Sample4,
        _ => Msaa::Sample8,
    };
    for camera in &cameras {
        commands.entity(camera).insert(msaa);
    }
}

fn flush_on_focus_loss(
    mut events: EventReader<WindowFocused>,
    settings: Res<UserSettings>,
    store: Res<SettingsStore>,
) {
    if events.read().any(|e| !e.focused) {
        persist(&store, &settings);
    }
}

fn flush_on_exit(
    mut events: EventReader<AppExit>,
    settings: Res<UserSettings>,
    store: Res<SettingsStore>,
) {
    if events.read().next().is_some() {
        persist(&store, &settings);
    }
}

fn persist(store: &SettingsStore, settings: &UserSettings) {
    match store.save(settings) {
        Ok(()) => info!(target: "settings", "settings saved to {:?}", store.path()),
        Err(e) => error!(target: "settings", "settings save failed: {e}"),
    }
}
