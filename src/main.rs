use bevy::prelude::*;

use multi_scene::{GameConfig, SceneCatalog, ScenePlugins};

fn main() {
    // Load configuration and the scene catalog; neither is recoverable if absent.
    let cfg = GameConfig::load_from_file("assets/config/game.ron")
        .expect("Failed to load assets/config/game.ron");
    let catalog =
        SceneCatalog::load_from_file(&cfg.catalog_path).expect("Failed to load scene catalog");

    App::new()
        .insert_resource(cfg.clone())
        .insert_resource(catalog)
        .add_plugins(
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: cfg.window.title.clone(),
                    resolution: (cfg.window.width, cfg.window.height).into(),
                    resizable: true,
                    ..default()
                }),
                ..default()
            }),
        )
        .add_plugins(ScenePlugins)
        .run();
}
