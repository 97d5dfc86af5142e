pub mod app;
pub mod core;
#[cfg(feature = "debug")]
pub mod debug;
pub mod events;
pub mod scenes;
pub mod settings;
pub mod ui;

// Curated re-exports
pub use crate::app::game::ScenePlugins;
pub use crate::app::state::{AppState, MenuPanel};
pub use crate::core::config::{GameConfig, TransitionConfig, WindowConfig};
pub use crate::scenes::{
    ActiveScene, SceneCatalog, SceneEntry, SceneKind, SceneSequencer, TransitionOutcome,
};
pub use crate::settings::{SettingsStore, UserSettings};
