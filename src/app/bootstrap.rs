use bevy::prelude::*;

use crate::core::config::GameConfig;
use crate::events::{publish_load_request, LoadSceneRequest};
use crate::scenes::catalog::SceneCatalog;

/// Startup glue: spawns the camera and hands control to the sequencer by
/// requesting the menu scene on the load channel.
pub struct BootstrapPlugin;

impl Plugin for BootstrapPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            (spawn_camera, log_config_warnings, request_menu_scene),
        );
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((Name::new("MainCamera"), Camera2d));
}

fn log_config_warnings(cfg: Option<Res<GameConfig>>) {
    let Some(cfg) = cfg else {
        return;
    };
    for w in cfg.validate() {
        warn!(target: "config", "{w}");
    }
}

fn request_menu_scene(mut commands: Commands, catalog: Option<Res<SceneCatalog>>) {
    let Some(catalog) = catalog else {
        warn!(target: "scene", "no scene catalog; nothing to boot into");
        return;
    };
    let entry = catalog.menu_entry().clone();
    publish_load_request(
        &mut commands,
        LoadSceneRequest {
            entry,
            show_loading_screen: true,
            fade: false,
        },
    );
}
