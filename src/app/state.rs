use bevy::prelude::*;

/// High-level app lifecycle state.
/// Boot -> Loading -> Menu <-> Loading <-> Gameplay
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    /// Startup, before the first scene request resolves.
    #[default]
    Boot,
    /// Transitional state while the sequencer has a transition in flight.
    Loading,
    /// Menu scene active.
    Menu,
    /// A map scene active.
    Gameplay,
}

/// Panel shown while in `AppState::Menu`.
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum MenuPanel {
    /// Not in the menu at all.
    #[default]
    Closed,
    Main,
    Settings,
    Credits,
    MapSelect,
}
