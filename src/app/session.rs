use bevy::prelude::*;

use crate::core::config::GameConfig;
use crate::scenes::sequencer::ActiveScene;

#[derive(Resource, Deref, DerefMut)]
struct AutoCloseTimer(Timer);

/// Exits the app after `window.autoClose` seconds; used by headless smoke
/// runs. The countdown is armed once the first scene is active, so slow asset
/// warmup does not eat into it.
pub struct AutoClosePlugin;

impl Plugin for AutoClosePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (arm_autoclose, check_autoclose));
    }
}

fn arm_autoclose(
    mut commands: Commands,
    cfg: Option<Res<GameConfig>>,
    timer: Option<Res<AutoCloseTimer>>,
    active: Option<Res<ActiveScene>>,
) {
    if timer.is_some() || active.is_none() {
        return;
    }
    let Some(cfg) = cfg else {
        return;
    };
    let secs = cfg.window.auto_close;
    if secs > 0.0 {
        info!("AutoClose: will exit after {secs} seconds");
        commands.insert_resource(AutoCloseTimer(Timer::from_seconds(secs, TimerMode::Once)));
    }
}

fn check_autoclose(
    time: Res<Time>,
    mut timer: Option<ResMut<AutoCloseTimer>>,
    active: Option<Res<ActiveScene>>,
    mut ev_exit: EventWriter<AppExit>,
) {
    if let Some(t) = timer.as_mut() {
        t.tick(time.delta());
        if t.finished() {
            info!(
                "AutoClose: timer finished in scene {:?}, requesting app exit",
                active.as_ref().map(|a| a.id.as_str())
            );
            ev_exit.write(AppExit::Success);
        }
    }
}
