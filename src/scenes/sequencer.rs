use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::app::state::AppState;
use crate::core::config::GameConfig;
use crate::events::{publish_loading_screen, LoadSceneRequest, SceneLoadChannel};
use crate::scenes::catalog::{SceneCatalog, SceneKind};
use crate::scenes::content::{despawn_scene_bundle, spawn_scene_bundle, SceneContent};

/// The scene new spawns and queries target by default. Present only while a
/// non-persistent bundle is fully loaded; absent mid-transition.
#[derive(Resource, Debug, Clone)]
pub struct ActiveScene {
    pub id: String,
    pub kind: SceneKind,
}

/// Terminal result of a transition, surfaced instead of stalling on failure.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    Completed { scene: String },
    Failed { scene: String, reason: String },
}

#[derive(Debug, Clone)]
struct LoadedScene {
    id: String,
    kind: SceneKind,
}

/// Where the in-flight transition currently is.
///
/// `Idle -> [PreparingManagers] -> Settling -> Loading -> Idle`, with failure
/// edges from the two waiting states back to `Idle`.
#[derive(Debug, Default)]
enum TransitionPhase {
    #[default]
    Idle,
    Accepted {
        request: LoadSceneRequest,
    },
    PreparingManagers {
        request: LoadSceneRequest,
        handle: Handle<SceneContent>,
        timeout: Timer,
    },
    Settling {
        request: LoadSceneRequest,
        timer: Timer,
    },
    Loading {
        request: LoadSceneRequest,
        handle: Handle<SceneContent>,
        timeout: Timer,
    },
}

/// Owner of all transition state. Exactly one transition may be in flight,
/// guarded by `in_progress`; requests arriving mid-transition are dropped,
/// never queued.
#[derive(Resource, Debug, Default)]
pub struct SceneSequencer {
    in_progress: bool,
    current: Option<LoadedScene>,
    managers: Option<LoadedScene>,
    phase: TransitionPhase,
}

impl SceneSequencer {
    pub fn is_in_progress(&self) -> bool {
        self.in_progress
    }

    pub fn current_scene(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.id.as_str())
    }

    pub fn managers_resident(&self) -> bool {
        self.managers.is_some()
    }

    /// Id of the scene the in-flight transition is heading to, if any.
    pub fn pending_scene(&self) -> Option<&str> {
        match &self.phase {
            TransitionPhase::Idle => None,
            TransitionPhase::Accepted { request }
            | TransitionPhase::PreparingManagers { request, .. }
            | TransitionPhase::Settling { request, .. }
            | TransitionPhase::Loading { request, .. } => Some(request.entry.id.as_str()),
        }
    }

    /// Entry point for the load channel. Begins a transition, or drops the
    /// request when one is already running.
    pub fn accept(&mut self, request: LoadSceneRequest) {
        if self.in_progress {
            debug!(
                target: "scene",
                "transition in progress ({:?}); dropping request for '{}'",
                self.pending_scene(),
                request.entry.id
            );
            return;
        }
        if request.entry.kind == SceneKind::Managers {
            warn!(
                target: "scene",
                "managers bundle '{}' cannot be requested directly; ignored",
                request.entry.id
            );
            return;
        }
        self.in_progress = true;
        self.phase = TransitionPhase::Accepted { request };
    }
}

pub struct SceneSequencerPlugin;

impl Plugin for SceneSequencerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneSequencer>()
            .init_resource::<SceneLoadChannel>()
            .add_event::<TransitionOutcome>()
            .add_systems(Update, advance_transitions);

        let mut channel = app.world_mut().resource_mut::<SceneLoadChannel>();
        channel.subscribe("scene-sequencer", |request, world| {
            world.resource_mut::<SceneSequencer>().accept(request.clone());
        });
    }
}

/// Single exclusive driver; advances the in-flight transition one step per
/// frame. Exclusive access keeps publish/spawn/despawn on one thread, which is
/// the whole concurrency model here.
pub fn advance_transitions(world: &mut World) {
    let delta = world.resource::<Time>().delta();
    let phase = std::mem::take(&mut world.resource_mut::<SceneSequencer>().phase);
    let next = match phase {
        TransitionPhase::Idle => TransitionPhase::Idle,
        TransitionPhase::Accepted { request } => begin_transition(world, request),
        TransitionPhase::PreparingManagers {
            request,
            handle,
            mut timeout,
        } => {
            timeout.tick(delta);
            poll_managers(world, request, handle, timeout)
        }
        TransitionPhase::Settling { request, mut timer } => {
            timer.tick(delta);
            if timer.finished() {
                begin_load(world, request)
            } else {
                TransitionPhase::Settling { request, timer }
            }
        }
        TransitionPhase::Loading {
            request,
            handle,
            mut timeout,
        } => {
            timeout.tick(delta);
            poll_load(world, request, handle, timeout)
        }
    };
    world.resource_mut::<SceneSequencer>().phase = next;
}

fn begin_transition(world: &mut World, request: LoadSceneRequest) -> TransitionPhase {
    info!(
        target: "scene",
        "transition to '{}' begins (loading screen: {}, fade: {})",
        request.entry.id, request.show_loading_screen, request.fade
    );
    world
        .resource_mut::<NextState<AppState>>()
        .set(AppState::Loading);
    if request.show_loading_screen {
        publish_loading_screen(world, true);
    }

    let cfg = world.resource::<GameConfig>().transition.clone();
    let needs_managers = request.entry.kind == SceneKind::Map
        && !world.resource::<SceneSequencer>().managers_resident();
    if needs_managers {
        let Some(catalog) = world.get_resource::<SceneCatalog>() else {
            return fail_transition(world, request, "no scene catalog loaded".into());
        };
        let entry = catalog.managers_entry().clone();
        let handle = world.resource::<AssetServer>().load(entry.content.clone());
        info!(target: "scene", "loading managers bundle '{}'", entry.id);
        return TransitionPhase::PreparingManagers {
            request,
            handle,
            timeout: Timer::from_seconds(cfg.load_timeout, TimerMode::Once),
        };
    }
    if request.entry.kind == SceneKind::Menu {
        // Managers are only resident while a map is up.
        if let Some(managers) = world.resource_mut::<SceneSequencer>().managers.take() {
            despawn_scene_bundle(world, &managers.id);
            info!(target: "scene", "unloaded managers bundle '{}'", managers.id);
        }
    }
    TransitionPhase::Settling {
        request,
        timer: Timer::from_seconds(cfg.fade_duration.max(0.0), TimerMode::Once),
    }
}

fn poll_managers(
    world: &mut World,
    request: LoadSceneRequest,
    handle: Handle<SceneContent>,
    timeout: Timer,
) -> TransitionPhase {
    match world.resource::<AssetServer>().get_load_state(handle.id()) {
        Some(LoadState::Loaded) => {
            let entry = world.resource::<SceneCatalog>().managers_entry().clone();
            let Some(content) = world.resource::<Assets<SceneContent>>().get(&handle).cloned()
            else {
                return fail_transition(
                    world,
                    request,
                    "managers bundle loaded but absent from asset storage".into(),
                );
            };
            spawn_scene_bundle(world, &entry.id, &content);
            world.resource_mut::<SceneSequencer>().managers = Some(LoadedScene {
                id: entry.id,
                kind: SceneKind::Managers,
            });
            let cfg = world.resource::<GameConfig>().transition.clone();
            TransitionPhase::Settling {
                request,
                timer: Timer::from_seconds(cfg.fade_duration.max(0.0), TimerMode::Once),
            }
        }
        Some(LoadState::Failed(err)) => {
            fail_transition(world, request, format!("managers bundle failed to load: {err}"))
        }
        _ if timeout.finished() => {
            let secs = timeout.duration().as_secs_f32();
            fail_transition(
                world,
                request,
                format!("managers bundle load timed out after {secs:.1}s"),
            )
        }
        _ => TransitionPhase::PreparingManagers {
            request,
            handle,
            timeout,
        },
    }
}

/// Settle delay elapsed: tear down the previous scene, then start the async
/// load of the new bundle. Unload strictly precedes load.
fn begin_load(world: &mut World, request: LoadSceneRequest) -> TransitionPhase {
    if let Some(previous) = world.resource_mut::<SceneSequencer>().current.take() {
        despawn_scene_bundle(world, &previous.id);
        world.remove_resource::<ActiveScene>();
        info!(target: "scene", "unloaded scene '{}'", previous.id);
    }
    let handle = world
        .resource::<AssetServer>()
        .load(request.entry.content.clone());
    let cfg = world.resource::<GameConfig>().transition.clone();
    TransitionPhase::Loading {
        request,
        handle,
        timeout: Timer::from_seconds(cfg.load_timeout, TimerMode::Once),
    }
}

fn poll_load(
    world: &mut World,
    request: LoadSceneRequest,
    handle: Handle<SceneContent>,
    timeout: Timer,
) -> TransitionPhase {
    match world.resource::<AssetServer>().get_load_state(handle.id()) {
        Some(LoadState::Loaded) => {
            let Some(content) = world.resource::<Assets<SceneContent>>().get(&handle).cloned()
            else {
                return fail_transition(
                    world,
                    request,
                    "bundle loaded but absent from asset storage".into(),
                );
            };
            complete_transition(world, request, content)
        }
        Some(LoadState::Failed(err)) => {
            fail_transition(world, request, format!("bundle failed to load: {err}"))
        }
        _ if timeout.finished() => {
            let secs = timeout.duration().as_secs_f32();
            fail_transition(world, request, format!("bundle load timed out after {secs:.1}s"))
        }
        _ => TransitionPhase::Loading {
            request,
            handle,
            timeout,
        },
    }
}

fn complete_transition(
    world: &mut World,
    request: LoadSceneRequest,
    content: SceneContent,
) -> TransitionPhase {
    let id = request.entry.id.clone();
    let kind = request.entry.kind;
    spawn_scene_bundle(world, &id, &content);
    world.insert_resource(ActiveScene {
        id: id.clone(),
        kind,
    });
    let next = match kind {
        SceneKind::Menu => AppState::Menu,
        SceneKind::Map => AppState::Gameplay,
        // Rejected in accept(); kept total for the compiler.
        SceneKind::Managers => AppState::Menu,
    };
    world.resource_mut::<NextState<AppState>>().set(next);
    if request.show_loading_screen {
        publish_loading_screen(world, false);
    }
    {
        let mut seq = world.resource_mut::<SceneSequencer>();
        seq.current = Some(LoadedScene { id: id.clone(), kind });
        seq.in_progress = false;
    }
    world.send_event(TransitionOutcome::Completed { scene: id.clone() });
    info!(target: "scene", "scene '{}' is now active", id);
    TransitionPhase::Idle
}

fn fail_transition(world: &mut World, request: LoadSceneRequest, reason: String) -> TransitionPhase {
    error!(
        target: "scene",
        "transition to '{}' failed: {reason}", request.entry.id
    );
    if request.show_loading_screen {
        publish_loading_screen(world, false);
    }
    let surviving_kind = {
        let mut seq = world.resource_mut::<SceneSequencer>();
        seq.in_progress = false;
        seq.current.as_ref().map(|c| c.kind)
    };
    // Fall back to whatever is still loaded; with nothing loaded the menu UI
    // is the only recoverable surface.
    let next = match surviving_kind {
        Some(SceneKind::Map) => AppState::Gameplay,
        _ => AppState::Menu,
    };
    world.resource_mut::<NextState<AppState>>().set(next);
    world.send_event(TransitionOutcome::Failed {
        scene: request.entry.id.clone(),
        reason,
    });
    TransitionPhase::Idle
}
