use bevy::prelude::*;

use crate::app::state::AppState;
use crate::scenes::sequencer::{ActiveScene, SceneSequencer};

#[derive(Resource, Deref, DerefMut)]
struct DebugLogTimer(Timer);

/// Periodic one-line status log for soak/smoke runs.
pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(DebugLogTimer(Timer::from_seconds(
            5.0,
            TimerMode::Repeating,
        )))
        .add_systems(Update, debug_logging_system);
    }
}

fn debug_logging_system(
    time: Res<Time>,
    mut timer: ResMut<DebugLogTimer>,
    state: Res<State<AppState>>,
    sequencer: Res<SceneSequencer>,
    active: Option<Res<ActiveScene>>,
) {
    if timer.tick(time.delta()).just_finished() {
        info!(
            target: "debug",
            "state={:?} active={:?} in_progress={} pending={:?}",
            state.get(),
            active.as_ref().map(|a| a.id.as_str()),
            sequencer.is_in_progress(),
            sequencer.pending_scene()
        );
    }
}
