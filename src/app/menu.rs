use bevy::audio::Volume;
use bevy::prelude::*;

use super::state::{AppState, MenuPanel};
use crate::events::{publish_load_request, LoadSceneRequest};
use crate::scenes::catalog::SceneCatalog;
use crate::settings::{EffectsChannel, UserSettings, QUALITY_LEVELS};
use crate::ui::cleanup;

pub const NORMAL_BUTTON: Color = Color::srgb(0.15, 0.15, 0.15);
pub const HOVERED_BUTTON: Color = Color::srgb(0.25, 0.25, 0.25);
pub const PRESSED_BUTTON: Color = Color::srgb(0.35, 0.55, 0.35);
pub const TEXT_COLOR: Color = Color::srgb(0.9, 0.9, 0.9);

/// One-shot UI sounds, loaded once at startup.
#[derive(Resource)]
pub struct ButtonSounds {
    pub click: Handle<AudioSource>,
}

#[derive(Component)]
struct MainPanelUi;
#[derive(Component)]
struct SettingsPanelUi;
#[derive(Component)]
struct CreditsPanelUi;

/// Buttons shared across menu panels.
#[derive(Component, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Play,
    MapSelect,
    Settings,
    Credits,
    Quit,
    Back,
}

#[derive(Component, Clone, Copy, PartialEq, Eq)]
enum SettingAction {
    MasterDown,
    MasterUp,
    MusicDown,
    MusicUp,
    EffectsDown,
    EffectsUp,
    CycleQuality,
    ToggleFullscreen,
}

/// Opt-out marker for [`button_feedback`]; the button keeps whatever
/// background color it was spawned with.
#[derive(Component)]
pub struct StaticButtonColor;

/// Marks the text entity showing a setting's current value.
#[derive(Component, Clone, Copy, PartialEq, Eq)]
enum SettingLabel {
    Master,
    Music,
    Effects,
    Quality,
    Fullscreen,
}

pub struct MenuPlugin;

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_button_sounds)
            .add_systems(OnEnter(AppState::Menu), open_main_panel)
            .add_systems(OnExit(AppState::Menu), close_panels)
            .add_systems(OnEnter(MenuPanel::Main), spawn_main_panel)
            .add_systems(OnExit(MenuPanel::Main), cleanup::<MainPanelUi>)
            .add_systems(OnEnter(MenuPanel::Settings), spawn_settings_panel)
            .add_systems(OnExit(MenuPanel::Settings), cleanup::<SettingsPanelUi>)
            .add_systems(OnEnter(MenuPanel::Credits), spawn_credits_panel)
            .add_systems(OnExit(MenuPanel::Credits), cleanup::<CreditsPanelUi>)
            .add_systems(
                Update,
                (button_feedback, menu_actions, handle_escape).run_if(in_state(AppState::Menu)),
            )
            .add_systems(
                Update,
                (
                    settings_actions,
                    update_setting_labels.run_if(resource_changed::<UserSettings>),
                )
                    .run_if(in_state(MenuPanel::Settings)),
            )
            .add_systems(
                Update,
                gameplay_escape.run_if(in_state(AppState::Gameplay)),
            );
    }
}

fn load_button_sounds(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(ButtonSounds {
        click: asset_server.load("audio/click.wav"),
    });
}

pub fn play_click(
    commands: &mut Commands,
    sounds: &Option<Res<ButtonSounds>>,
    settings: &UserSettings,
) {
    if let Some(sounds) = sounds {
        commands.spawn((
            AudioPlayer::<AudioSource>(sounds.click.clone()),
            PlaybackSettings::DESPAWN.with_volume(Volume::Decibels(settings.effects_db())),
            EffectsChannel,
        ));
    }
}

fn open_main_panel(mut next_panel: ResMut<NextState<MenuPanel>>) {
    next_panel.set(MenuPanel::Main);
}

fn close_panels(mut next_panel: ResMut<NextState<MenuPanel>>) {
    next_panel.set(MenuPanel::Closed);
}

/// Hover/press feedback for every button that has not opted out.
fn button_feedback(
    mut q: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>, Without<StaticButtonColor>),
    >,
) {
    for (interaction, mut color) in &mut q {
        *color = match *interaction {
            Interaction::Pressed => PRESSED_BUTTON.into(),
            Interaction::Hovered => HOVERED_BUTTON.into(),
            Interaction::None => NORMAL_BUTTON.into(),
        };
    }
}

fn menu_actions(
    mut commands: Commands,
    interactions: Query<(&Interaction, &MenuAction), Changed<Interaction>>,
    catalog: Option<Res<SceneCatalog>>,
    sounds: Option<Res<ButtonSounds>>,
    settings: Res<UserSettings>,
    mut next_panel: ResMut<NextState<MenuPanel>>,
    mut exit: EventWriter<AppExit>,
) {
    for (interaction, action) in &interactions {
        if *interaction != Interaction::Pressed {
            continue;
        }
        play_click(&mut commands, &sounds, &settings);
        match action {
            MenuAction::Play => {
                let Some(catalog) = &catalog else {
                    continue;
                };
                match catalog.maps().find(|m| m.unlocked) {
                    Some(entry) => publish_load_request(
                        &mut commands,
                        LoadSceneRequest {
                            entry: entry.clone(),
                            show_loading_screen: true,
                            fade: true,
                        },
                    ),
                    None => warn!(target: "menu", "no unlocked maps to play"),
                }
            }
            MenuAction::MapSelect => next_panel.set(MenuPanel::MapSelect),
            MenuAction::Settings => next_panel.set(MenuPanel::Settings),
            MenuAction::Credits => next_panel.set(MenuPanel::Credits),
            MenuAction::Back => next_panel.set(MenuPanel::Main),
            MenuAction::Quit => {
                exit.write(AppExit::Success);
            }
        }
    }
}

fn handle_escape(
    keys: Res<ButtonInput<KeyCode>>,
    panel: Res<State<MenuPanel>>,
    mut next_panel: ResMut<NextState<MenuPanel>>,
) {
    if keys.just_pressed(KeyCode::Escape)
        && !matches!(panel.get(), MenuPanel::Main | MenuPanel::Closed)
    {
        next_panel.set(MenuPanel::Main);
    }
}

/// In a map, Escape requests the menu scene back.
fn gameplay_escape(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    catalog: Option<Res<SceneCatalog>>,
) {
    if !keys.just_pressed(KeyCode::Escape) {
        return;
    }
    let Some(catalog) = catalog else {
        return;
    };
    publish_load_request(
        &mut commands,
        LoadSceneRequest {
            entry: catalog.menu_entry().clone(),
            show_loading_screen: true,
            fade: true,
        },
    );
}

// === PANEL SPAWNING ===

fn panel_node() -> Node {
    Node {
        width: Val::Percent(100.0),
        height: Val::Percent(100.0),
        flex_direction: FlexDirection::Column,
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        row_gap: Val::Px(12.0),
        ..default()
    }
}

fn button_node() -> Node {
    Node {
        width: Val::Px(240.0),
        height: Val::Px(56.0),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        ..default()
    }
}

fn spawn_main_panel(mut commands: Commands) {
    commands
        .spawn((Name::new("MainPanel"), MainPanelUi, panel_node()))
        .with_children(|p| {
            p.spawn((
                Text::new("Multi Scene Demo"),
                TextFont {
                    font_size: 48.0,
                    ..default()
                },
                TextColor(TEXT_COLOR),
                Node {
                    margin: UiRect::bottom(Val::Px(32.0)),
                    ..default()
                },
            ));
            for (label, action) in [
                ("Play", MenuAction::Play),
                ("Select Map", MenuAction::MapSelect),
                ("Settings", MenuAction::Settings),
                ("Credits", MenuAction::Credits),
                ("Quit", MenuAction::Quit),
            ] {
                p.spawn((
                    Button,
                    button_node(),
                    BackgroundColor(NORMAL_BUTTON),
                    BorderRadius::all(Val::Px(8.0)),
                    action,
                ))
                .with_children(|p| {
                    p.spawn((
                        Text::new(label),
                        TextFont {
                            font_size: 28.0,
                            ..default()
                        },
                        TextColor(TEXT_COLOR),
                    ));
                });
            }
        });
}

fn spawn_settings_panel(mut commands: Commands, settings: Res<UserSettings>) {
    let volume_rows = [
        ("Master Volume", SettingLabel::Master, SettingAction::MasterDown, SettingAction::MasterUp),
        ("Music Volume", SettingLabel::Music, SettingAction::MusicDown, SettingAction::MusicUp),
        ("Effects Volume", SettingLabel::Effects, SettingAction::EffectsDown, SettingAction::EffectsUp),
    ];
    commands
        .spawn((Name::new("SettingsPanel"), SettingsPanelUi, panel_node()))
        .with_children(|p| {
            p.spawn((
                Text::new("Settings"),
                TextFont {
                    font_size: 40.0,
                    ..default()
                },
                TextColor(TEXT_COLOR),
            ));
            for (title, label, down, up) in volume_rows {
                p.spawn(Node {
                    column_gap: Val::Px(12.0),
                    align_items: AlignItems::Center,
                    ..default()
                })
                .with_children(|row| {
                    row.spawn((
                        Text::new(title),
                        TextFont {
                            font_size: 24.0,
                            ..default()
                        },
                        TextColor(TEXT_COLOR),
                        Node {
                            width: Val::Px(220.0),
                            ..default()
                        },
                    ));
                    row.spawn((
                        Button,
                        small_button_node(),
                        BackgroundColor(NORMAL_BUTTON),
                        BorderRadius::all(Val::Px(6.0)),
                        down,
                    ))
                    .with_children(|b| {
                        b.spawn((
                            Text::new("-"),
                            TextFont {
                                font_size: 24.0,
                                ..default()
                            },
                            TextColor(TEXT_COLOR),
                        ));
                    });
                    row.spawn((
                        Text::new(volume_text(&settings, label)),
                        TextFont {
                            font_size: 24.0,
                            ..default()
                        },
                        TextColor(TEXT_COLOR),
                        label,
                    ));
                    row.spawn((
                        Button,
                        small_button_node(),
                        BackgroundColor(NORMAL_BUTTON),
                        BorderRadius::all(Val::Px(6.0)),
                        up,
                    ))
                    .with_children(|b| {
                        b.spawn((
                            Text::new("+"),
                            TextFont {
                                font_size: 24.0,
                                ..default()
                            },
                            TextColor(TEXT_COLOR),
                        ));
                    });
                });
            }
            p.spawn(Node {
                column_gap: Val::Px(12.0),
                align_items: AlignItems::Center,
                ..default()
            })
            .with_children(|row| {
                row.spawn((
                    Text::new("Quality"),
                    TextFont {
                        font_size: 24.0,
                        ..default()
                    },
                    TextColor(TEXT_COLOR),
                    Node {
                        width: Val::Px(220.0),
                        ..default()
                    },
                ));
                row.spawn((
                    Button,
                    Node {
                        width: Val::Px(140.0),
                        height: Val::Px(40.0),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    BackgroundColor(NORMAL_BUTTON),
                    BorderRadius::all(Val::Px(6.0)),
                    SettingAction::CycleQuality,
                ))
                .with_children(|b| {
                    b.spawn((
                        Text::new(settings.quality_label()),
                        TextFont {
                            font_size: 22.0,
                            ..default()
                        },
                        TextColor(TEXT_COLOR),
                        SettingLabel::Quality,
                    ));
                });
            });
            p.spawn(Node {
                column_gap: Val::Px(12.0),
                align_items: AlignItems::Center,
                ..default()
            })
            .with_children(|row| {
                row.spawn((
                    Text::new("Fullscreen"),
                    TextFont {
                        font_size: 24.0,
                        ..default()
                    },
                    TextColor(TEXT_COLOR),
                    Node {
                        width: Val::Px(220.0),
                        ..default()
                    },
                ));
                row.spawn((
                    Button,
                    Node {
                        width: Val::Px(140.0),
                        height: Val::Px(40.0),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    BackgroundColor(NORMAL_BUTTON),
                    BorderRadius::all(Val::Px(6.0)),
                    SettingAction::ToggleFullscreen,
                ))
                .with_children(|b| {
                    b.spawn((
                        Text::new(if settings.fullscreen { "On" } else { "Off" }),
                        TextFont {
                            font_size: 22.0,
                            ..default()
                        },
                        TextColor(TEXT_COLOR),
                        SettingLabel::Fullscreen,
                    ));
                });
            });
            p.spawn((
                Button,
                button_node(),
                BackgroundColor(NORMAL_BUTTON),
                BorderRadius::all(Val::Px(8.0)),
                MenuAction::Back,
            ))
            .with_children(|b| {
                b.spawn((
                    Text::new("Back"),
                    TextFont {
                        font_size: 28.0,
                        ..default()
                    },
                    TextColor(TEXT_COLOR),
                ));
            });
        });
}

fn small_button_node() -> Node {
    Node {
        width: Val::Px(40.0),
        height: Val::Px(40.0),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        ..default()
    }
}

fn spawn_credits_panel(mut commands: Commands) {
    commands
        .spawn((Name::new("CreditsPanel"), CreditsPanelUi, panel_node()))
        .with_children(|p| {
            p.spawn((
                Text::new("Credits"),
                TextFont {
                    font_size: 40.0,
                    ..default()
                },
                TextColor(TEXT_COLOR),
            ));
            for line in [
                "A multi-scene streaming demo.",
                "Built on the Bevy engine.",
            ] {
                p.spawn((
                    Text::new(line),
                    TextFont {
                        font_size: 22.0,
                        ..default()
                    },
                    TextColor(TEXT_COLOR),
                ));
            }
            p.spawn((
                Button,
                button_node(),
                BackgroundColor(NORMAL_BUTTON),
                BorderRadius::all(Val::Px(8.0)),
                MenuAction::Back,
            ))
            .with_children(|b| {
                b.spawn((
                    Text::new("Back"),
                    TextFont {
                        font_size: 28.0,
                        ..default()
                    },
                    TextColor(TEXT_COLOR),
                ));
            });
        });
}

// === SETTINGS WIDGET BEHAVIOR ===

const VOLUME_STEP: f32 = 0.05;

fn settings_actions(
    mut commands: Commands,
    interactions: Query<(&Interaction, &SettingAction), Changed<Interaction>>,
    sounds: Option<Res<ButtonSounds>>,
    mut settings: ResMut<UserSettings>,
) {
    for (interaction, action) in &interactions {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match action {
            SettingAction::MasterDown => {
                settings.master_volume = (settings.master_volume - VOLUME_STEP).max(0.0)
            }
            SettingAction::MasterUp => {
                settings.master_volume = (settings.master_volume + VOLUME_STEP).min(1.0)
            }
            SettingAction::MusicDown => {
                settings.music_volume = (settings.music_volume - VOLUME_STEP).max(0.0)
            }
            SettingAction::MusicUp => {
                settings.music_volume = (settings.music_volume + VOLUME_STEP).min(1.0)
            }
            SettingAction::EffectsDown => {
                settings.effects_volume = (settings.effects_volume - VOLUME_STEP).max(0.0)
            }
            SettingAction::EffectsUp => {
                settings.effects_volume = (settings.effects_volume + VOLUME_STEP).min(1.0)
            }
            SettingAction::CycleQuality => {
                settings.quality = (settings.quality + 1) % QUALITY_LEVELS.len()
            }
            SettingAction::ToggleFullscreen => settings.fullscreen = !settings.fullscreen,
        }
        play_click(&mut commands, &sounds, &settings);
    }
}

fn volume_text(settings: &UserSettings, label: SettingLabel) -> String {
    let linear = match label {
        SettingLabel::Master => settings.master_volume,
        SettingLabel::Music => settings.music_volume,
        SettingLabel::Effects => settings.effects_volume,
        _ => return String::new(),
    };
    format!("{:>3.0}", linear * 100.0)
}

fn update_setting_labels(
    settings: Res<UserSettings>,
    mut labels: Query<(&SettingLabel, &mut Text)>,
) {
    for (label, mut text) in &mut labels {
        let value = match label {
            SettingLabel::Quality => settings.quality_label().to_string(),
            SettingLabel::Fullscreen => {
                (if settings.fullscreen { "On" } else { "Off" }).to_string()
            }
            volume_label => volume_text(&settings, *volume_label),
        };
        if text.as_str() != value {
            *text = Text::new(value);
        }
    }
}
