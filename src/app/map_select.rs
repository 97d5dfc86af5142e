use bevy::prelude::*;

use super::menu::{play_click, ButtonSounds, MenuAction, StaticButtonColor, NORMAL_BUTTON, TEXT_COLOR};
use super::state::MenuPanel;
use crate::events::{publish_load_request, LoadSceneRequest};
use crate::scenes::catalog::SceneCatalog;
use crate::settings::UserSettings;
use crate::ui::cleanup;

const LOCKED_BUTTON: Color = Color::srgb(0.08, 0.08, 0.08);
const LOCKED_TEXT: Color = Color::srgb(0.4, 0.4, 0.4);

#[derive(Component)]
struct MapSelectUi;

/// Index into the catalog's map list.
#[derive(Component, Clone, Copy)]
struct MapButton(usize);

/// Locked maps keep their button but ignore interaction.
#[derive(Component)]
struct LockedMapButton;

#[derive(Component)]
struct MapDetailTitle;
#[derive(Component)]
struct MapDetailBody;
#[derive(Component)]
struct PlayMapButton;

#[derive(Resource, Default)]
struct SelectedMap(usize);

pub struct MapSelectPlugin;

impl Plugin for MapSelectPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SelectedMap>()
            .add_systems(OnEnter(MenuPanel::MapSelect), spawn_map_select)
            .add_systems(OnExit(MenuPanel::MapSelect), cleanup::<MapSelectUi>)
            .add_systems(
                Update,
                (
                    select_map,
                    play_selected,
                    update_detail.run_if(resource_changed::<SelectedMap>),
                )
                    .run_if(in_state(MenuPanel::MapSelect)),
            );
    }
}

fn spawn_map_select(mut commands: Commands, catalog: Option<Res<SceneCatalog>>) {
    commands.insert_resource(SelectedMap(0));
    commands
        .spawn((
            Name::new("MapSelectPanel"),
            MapSelectUi,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(16.0),
                ..default()
            },
        ))
        .with_children(|p| {
            p.spawn((
                Text::new("Select Map"),
                TextFont {
                    font_size: 40.0,
                    ..default()
                },
                TextColor(TEXT_COLOR),
            ));
            p.spawn(Node {
                column_gap: Val::Px(32.0),
                ..default()
            })
            .with_children(|columns| {
                columns
                    .spawn(Node {
                        flex_direction: FlexDirection::Column,
                        row_gap: Val::Px(8.0),
                        ..default()
                    })
                    .with_children(|list| {
                        let Some(catalog) = &catalog else {
                            list.spawn((
                                Text::new("No catalog loaded."),
                                TextFont {
                                    font_size: 22.0,
                                    ..default()
                                },
                                TextColor(TEXT_COLOR),
                            ));
                            return;
                        };
                        for (i, map) in catalog.maps().enumerate() {
                            let mut button = list.spawn((
                                Button,
                                Node {
                                    width: Val::Px(220.0),
                                    height: Val::Px(48.0),
                                    justify_content: JustifyContent::Center,
                                    align_items: AlignItems::Center,
                                    ..default()
                                },
                                BackgroundColor(if map.unlocked {
                                    NORMAL_BUTTON
                                } else {
                                    LOCKED_BUTTON
                                }),
                                BorderRadius::all(Val::Px(6.0)),
                                MapButton(i),
                            ));
                            if !map.unlocked {
                                button.insert((LockedMapButton, StaticButtonColor));
                            }
                            button.with_children(|b| {
                                b.spawn((
                                    Text::new(map.title.clone()),
                                    TextFont {
                                        font_size: 24.0,
                                        ..default()
                                    },
                                    TextColor(if map.unlocked { TEXT_COLOR } else { LOCKED_TEXT }),
                                ));
                            });
                        }
                    });
                columns
                    .spawn(Node {
                        flex_direction: FlexDirection::Column,
                        width: Val::Px(320.0),
                        row_gap: Val::Px(8.0),
                        ..default()
                    })
                    .with_children(|detail| {
                        detail.spawn((
                            Text::new(""),
                            TextFont {
                                font_size: 30.0,
                                ..default()
                            },
                            TextColor(TEXT_COLOR),
                            MapDetailTitle,
                        ));
                        detail.spawn((
                            Text::new(""),
                            TextFont {
                                font_size: 20.0,
                                ..default()
                            },
                            TextColor(TEXT_COLOR),
                            MapDetailBody,
                        ));
                    });
            });
            p.spawn(Node {
                column_gap: Val::Px(16.0),
                ..default()
            })
            .with_children(|buttons| {
                buttons
                    .spawn((
                        Button,
                        Node {
                            width: Val::Px(180.0),
                            height: Val::Px(52.0),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        BackgroundColor(NORMAL_BUTTON),
                        BorderRadius::all(Val::Px(8.0)),
                        PlayMapButton,
                    ))
                    .with_children(|b| {
                        b.spawn((
                            Text::new("Play Map"),
                            TextFont {
                                font_size: 26.0,
                                ..default()
                            },
                            TextColor(TEXT_COLOR),
                        ));
                    });
                buttons
                    .spawn((
                        Button,
                        Node {
                            width: Val::Px(180.0),
                            height: Val::Px(52.0),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        BackgroundColor(NORMAL_BUTTON),
                        BorderRadius::all(Val::Px(8.0)),
                        MenuAction::Back,
                    ))
                    .with_children(|b| {
                        b.spawn((
                            Text::new("Back"),
                            TextFont {
                                font_size: 26.0,
                                ..default()
                            },
                            TextColor(TEXT_COLOR),
                        ));
                    });
            });
        });
}

fn select_map(
    mut commands: Commands,
    interactions: Query<
        (&Interaction, &MapButton),
        (Changed<Interaction>, Without<LockedMapButton>),
    >,
    sounds: Option<Res<ButtonSounds>>,
    settings: Res<UserSettings>,
    mut selected: ResMut<SelectedMap>,
) {
    for (interaction, button) in &interactions {
        if *interaction == Interaction::Pressed {
            play_click(&mut commands, &sounds, &settings);
            selected.0 = button.0;
        }
    }
}

fn update_detail(
    selected: Res<SelectedMap>,
    catalog: Option<Res<SceneCatalog>>,
    mut title: Query<&mut Text, (With<MapDetailTitle>, Without<MapDetailBody>)>,
    mut body: Query<&mut Text, (With<MapDetailBody>, Without<MapDetailTitle>)>,
) {
    let Some(catalog) = catalog else {
        return;
    };
    let Some(map) = catalog.maps().nth(selected.0) else {
        return;
    };
    if let Ok(mut text) = title.single_mut() {
        if text.as_str() != map.title {
            *text = Text::new(map.title.clone());
        }
    }
    if let Ok(mut text) = body.single_mut() {
        if text.as_str() != map.description {
            *text = Text::new(map.description.clone());
        }
    }
}

fn play_selected(
    mut commands: Commands,
    interactions: Query<&Interaction, (Changed<Interaction>, With<PlayMapButton>)>,
    selected: Res<SelectedMap>,
    catalog: Option<Res<SceneCatalog>>,
    sounds: Option<Res<ButtonSounds>>,
    settings: Res<UserSettings>,
) {
    for interaction in &interactions {
        if *interaction != Interaction::Pressed {
            continue;
        }
        play_click(&mut commands, &sounds, &settings);
        let Some(catalog) = &catalog else {
            continue;
        };
        let Some(map) = catalog.maps().nth(selected.0) else {
            continue;
        };
        if !map.unlocked {
            continue;
        }
        publish_load_request(
            &mut commands,
            LoadSceneRequest {
                entry: map.clone(),
                show_loading_screen: true,
                fade: true,
            },
        );
    }
}
