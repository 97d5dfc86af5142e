// This file is part of Multi Scene Demo.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bevy::prelude::*;

use crate::app::bootstrap::BootstrapPlugin;
use crate::app::map_select::MapSelectPlugin;
use crate::app::menu::MenuPlugin;
use crate::app::session::AutoClosePlugin;
use crate::app::state::{AppState, MenuPanel};
#[cfg(feature = "debug")]
use crate::debug::DebugPlugin;
use crate::events::EventChannelPlugin;
use crate::scenes::content::SceneContentPlugin;
use crate::scenes::sequencer::SceneSequencerPlugin;
use crate::settings::SettingsPlugin;
use crate::ui::loading_screen::LoadingScreenPlugin;

pub struct ScenePlugins;

impl Plugin for ScenePlugins {
    fn build(&self, app: &mut App) {
        app.init_state::<AppState>()
            .init_state::<MenuPanel>()
            .add_plugins((
                EventChannelPlugin,
                SceneContentPlugin,
                SceneSequencerPlugin,
                SettingsPlugin,
                LoadingScreenPlugin,
                BootstrapPlugin,
                MenuPlugin,
                MapSelectPlugin,
                AutoClosePlugin,
                #[cfg(feature = "debug")]
                DebugPlugin,
            ));
    }
}
