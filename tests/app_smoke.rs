use std::thread::sleep;
use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::audio::AudioSource;
use bevy::input::InputPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use multi_scene::{
    ActiveScene, AppState, GameConfig, MenuPanel, SceneCatalog, ScenePlugins, TransitionConfig,
};

/// Headless boot: the full plugin set comes up, the bootstrapper requests the
/// menu scene, and the app settles in the menu.
#[test]
fn boots_into_the_menu_scene() {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin, InputPlugin, AssetPlugin::default()));
    // DefaultPlugins' AudioPlugin registers this asset in the real app; the
    // headless harness omits AudioPlugin, so register it here to match.
    app.init_asset::<AudioSource>();

    let mut cfg = GameConfig::default();
    cfg.transition = TransitionConfig {
        fade_duration: 0.0,
        load_timeout: 10.0,
    };
    app.insert_resource(cfg);
    app.insert_resource(
        SceneCatalog::load_from_file("assets/scenes/catalog.ron").expect("catalog loads"),
    );
    app.add_plugins(ScenePlugins);

    let mut settled = false;
    for _ in 0..400 {
        app.update();
        let menu_active = app
            .world()
            .get_resource::<ActiveScene>()
            .map(|a| a.id == "main_menu")
            .unwrap_or(false);
        let in_menu_state =
            app.world().resource::<State<AppState>>().get() == &AppState::Menu;
        let main_panel_open =
            app.world().resource::<State<MenuPanel>>().get() == &MenuPanel::Main;
        if menu_active && in_menu_state && main_panel_open {
            settled = true;
            break;
        }
        sleep(Duration::from_millis(5));
    }
    assert!(settled, "app never settled in the main menu");
}
