pub mod loading_screen;

pub use loading_screen::LoadingScreenPlugin;

use bevy::prelude::*;

/// Despawn every entity carrying the marker; used on state/panel exits.
pub fn cleanup<T: Component>(mut commands: Commands, q: Query<Entity, With<T>>) {
    for e in &q {
        commands.entity(e).despawn();
    }
}
