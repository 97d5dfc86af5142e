use bevy::prelude::*;

use crate::events::LoadingScreenChannel;

#[derive(Component)]
struct LoadingOverlay;

/// Mirrors the last value published on the loading-screen channel.
#[derive(Resource, Default, Debug, PartialEq)]
pub struct LoadingScreenVisible(pub bool);

pub struct LoadingScreenPlugin;

impl Plugin for LoadingScreenPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LoadingScreenVisible>()
            .init_resource::<LoadingScreenChannel>()
            .add_systems(Startup, spawn_overlay)
            .add_systems(
                Update,
                sync_overlay.run_if(resource_changed::<LoadingScreenVisible>),
            );

        let mut channel = app.world_mut().resource_mut::<LoadingScreenChannel>();
        channel.subscribe("loading-screen", |visible, world| {
            let mut state = world.resource_mut::<LoadingScreenVisible>();
            // Same-state toggles stop here; only a real flip marks the
            // resource changed and reaches the visibility sync.
            if state.0 != *visible {
                state.0 = *visible;
            }
        });
    }
}

fn spawn_overlay(mut commands: Commands) {
    commands
        .spawn((
            Name::new("LoadingOverlay"),
            LoadingOverlay,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.85)),
            GlobalZIndex(100),
            Visibility::Hidden,
        ))
        .with_children(|p| {
            p.spawn((
                Text::new("Loading..."),
                TextFont {
                    font_size: 36.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.9, 0.9)),
            ));
        });
}

fn sync_overlay(
    state: Res<LoadingScreenVisible>,
    mut q: Query<&mut Visibility, With<LoadingOverlay>>,
) {
    for mut visibility in &mut q {
        *visibility = if state.0 {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }
}
