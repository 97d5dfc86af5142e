use std::thread::sleep;
use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::audio::AudioSource;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use multi_scene::events::{EventChannelPlugin, LoadSceneRequest, LoadingScreenChannel, SceneLoadChannel};
use multi_scene::scenes::content::SceneTag;
use multi_scene::scenes::{SceneContentPlugin, SceneSequencerPlugin};
use multi_scene::ui::loading_screen::LoadingScreenVisible;
use multi_scene::ui::LoadingScreenPlugin;
use multi_scene::{
    ActiveScene, AppState, GameConfig, SceneCatalog, SceneSequencer, TransitionConfig,
    TransitionOutcome,
};

fn test_config() -> GameConfig {
    let mut cfg = GameConfig::default();
    // No settle delay in tests; generous load timeout for slow CI disks.
    cfg.transition = TransitionConfig {
        fade_duration: 0.0,
        load_timeout: 10.0,
    };
    cfg
}

fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin, AssetPlugin::default()));
    // DefaultPlugins' AudioPlugin registers this asset in the real app; the
    // headless harness omits AudioPlugin, so register it here to match.
    app.init_asset::<AudioSource>();
    app.init_state::<AppState>();
    app.insert_resource(test_config());
    app.insert_resource(
        SceneCatalog::load_from_file("assets/scenes/catalog.ron").expect("catalog loads"),
    );
    app.add_plugins((
        EventChannelPlugin,
        SceneContentPlugin,
        SceneSequencerPlugin,
        LoadingScreenPlugin,
    ));
    app
}

fn request_for(app: &App, id: &str, show_loading_screen: bool) -> LoadSceneRequest {
    let entry = app
        .world()
        .resource::<SceneCatalog>()
        .get(id)
        .expect("entry in catalog")
        .clone();
    LoadSceneRequest {
        entry,
        show_loading_screen,
        fade: false,
    }
}

fn publish(app: &mut App, request: LoadSceneRequest) {
    app.world_mut()
        .resource_scope(|world, mut channel: Mut<SceneLoadChannel>| {
            channel.publish(&request, world);
        });
}

fn publish_toggle(app: &mut App, visible: bool) {
    app.world_mut()
        .resource_scope(|world, mut channel: Mut<LoadingScreenChannel>| {
            channel.publish(&visible, world);
        });
}

/// Step the app until the predicate holds; asset loads complete on pool
/// threads, so give them wall-clock time between updates.
fn run_until(app: &mut App, mut done: impl FnMut(&mut App) -> bool) -> bool {
    for _ in 0..400 {
        app.update();
        if done(app) {
            return true;
        }
        sleep(Duration::from_millis(5));
    }
    false
}

fn active_scene_is(app: &mut App, id: &str) -> bool {
    app.world()
        .get_resource::<ActiveScene>()
        .map(|a| a.id == id)
        .unwrap_or(false)
}

fn scene_tags(app: &mut App) -> Vec<String> {
    let world = app.world_mut();
    let mut q = world.query::<&SceneTag>();
    let mut tags: Vec<String> = q.iter(world).map(|t| t.0.clone()).collect();
    tags.sort();
    tags.dedup();
    tags
}

fn drain_outcomes(app: &mut App) -> Vec<TransitionOutcome> {
    app.world_mut()
        .resource_mut::<Events<TransitionOutcome>>()
        .drain()
        .collect()
}

#[test]
fn menu_then_map_transition_follows_the_contract() {
    let mut app = test_app();

    // Boot into the menu scene.
    let req = request_for(&app, "main_menu", false);
    publish(&mut app, req);
    // Acceptance is synchronous with the publish.
    assert!(app.world().resource::<SceneSequencer>().is_in_progress());
    assert!(
        run_until(&mut app, |app| active_scene_is(app, "main_menu")),
        "menu scene never became active"
    );
    {
        let seq = app.world().resource::<SceneSequencer>();
        assert!(!seq.is_in_progress());
        assert_eq!(seq.current_scene(), Some("main_menu"));
        assert!(!seq.managers_resident());
    }
    assert_eq!(scene_tags(&mut app), vec!["main_menu".to_string()]);
    assert_eq!(
        drain_outcomes(&mut app),
        vec![TransitionOutcome::Completed {
            scene: "main_menu".into()
        }]
    );
    assert_eq!(
        app.world().resource::<State<AppState>>().get(),
        &AppState::Menu
    );

    // Head to a map, with the loading screen up.
    let req = request_for(&app, "forest", true);
    publish(&mut app, req);
    assert!(app.world().resource::<SceneSequencer>().is_in_progress());
    assert_eq!(
        app.world().resource::<SceneSequencer>().pending_scene(),
        Some("forest")
    );

    // A competing request mid-transition is dropped, not queued.
    let req = request_for(&app, "desert", true);
    publish(&mut app, req);
    assert_eq!(
        app.world().resource::<SceneSequencer>().pending_scene(),
        Some("forest")
    );

    // After one frame the transition has begun and the overlay is up.
    app.update();
    assert!(app.world().resource::<LoadingScreenVisible>().0);

    assert!(
        run_until(&mut app, |app| active_scene_is(app, "forest")),
        "map scene never became active"
    );
    {
        let seq = app.world().resource::<SceneSequencer>();
        assert!(!seq.is_in_progress());
        assert_eq!(seq.current_scene(), Some("forest"));
        assert!(seq.managers_resident());
    }
    let tags = scene_tags(&mut app);
    assert!(tags.contains(&"forest".to_string()));
    assert!(tags.contains(&"gameplay_managers".to_string()));
    assert!(
        !tags.contains(&"main_menu".to_string()),
        "previous scene must be unloaded before the new one is active"
    );
    assert!(
        !tags.contains(&"desert".to_string()),
        "dropped request must leave no trace"
    );
    assert_eq!(
        drain_outcomes(&mut app),
        vec![TransitionOutcome::Completed {
            scene: "forest".into()
        }]
    );
    assert!(!app.world().resource::<LoadingScreenVisible>().0);
    assert_eq!(
        app.world().resource::<State<AppState>>().get(),
        &AppState::Gameplay
    );
}

#[test]
fn returning_to_menu_unloads_managers() {
    let mut app = test_app();

    let req = request_for(&app, "main_menu", false);
    publish(&mut app, req);
    assert!(run_until(&mut app, |app| active_scene_is(app, "main_menu")));
    let req = request_for(&app, "forest", false);
    publish(&mut app, req);
    assert!(run_until(&mut app, |app| active_scene_is(app, "forest")));
    assert!(app.world().resource::<SceneSequencer>().managers_resident());

    let req = request_for(&app, "main_menu", false);
    publish(&mut app, req);
    assert!(run_until(&mut app, |app| active_scene_is(app, "main_menu")));

    assert!(!app.world().resource::<SceneSequencer>().managers_resident());
    assert_eq!(scene_tags(&mut app), vec!["main_menu".to_string()]);
}

#[test]
fn failed_load_is_surfaced_and_clears_the_guard() {
    let mut app = test_app();

    let mut entry = app
        .world()
        .resource::<SceneCatalog>()
        .get("main_menu")
        .unwrap()
        .clone();
    entry.id = "broken".into();
    entry.content = "scenes/does_not_exist.scene.ron".into();
    publish(
        &mut app,
        LoadSceneRequest {
            entry,
            show_loading_screen: true,
            fade: false,
        },
    );
    assert!(app.world().resource::<SceneSequencer>().is_in_progress());

    assert!(
        run_until(&mut app, |app| !app
            .world()
            .resource::<SceneSequencer>()
            .is_in_progress()),
        "failed transition never settled"
    );

    let outcomes = drain_outcomes(&mut app);
    assert_eq!(outcomes.len(), 1);
    assert!(matches!(
        &outcomes[0],
        TransitionOutcome::Failed { scene, .. } if scene == "broken"
    ));
    assert!(app.world().get_resource::<ActiveScene>().is_none());
    assert!(!app.world().resource::<LoadingScreenVisible>().0);
    // With nothing loaded the menu UI is the recovery surface.
    assert_eq!(
        app.world().resource::<State<AppState>>().get(),
        &AppState::Menu
    );

    // The sequencer accepts new requests again.
    let req = request_for(&app, "main_menu", false);
    publish(&mut app, req);
    assert!(run_until(&mut app, |app| active_scene_is(app, "main_menu")));
}

#[test]
fn loading_screen_toggle_is_idempotent() {
    let mut app = test_app();
    app.update();

    publish_toggle(&mut app, true);
    publish_toggle(&mut app, true);
    app.update();
    assert!(app.world().resource::<LoadingScreenVisible>().0);

    publish_toggle(&mut app, false);
    publish_toggle(&mut app, false);
    app.update();
    assert!(!app.world().resource::<LoadingScreenVisible>().0);
}
