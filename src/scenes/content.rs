use anyhow::Context;
use bevy::asset::{io::Reader, AssetLoader, LoadContext};
use bevy::audio::Volume;
use bevy::prelude::*;
use serde::Deserialize;

use crate::settings::{MusicChannel, UserSettings};

/// Everything a scene bundle spawns, described as a `*.scene.ron` asset.
///
/// Loading one of these through the asset server IS the asynchronous "scene
/// load" the sequencer waits on; spawning the described entities afterwards is
/// synchronous and cheap.
#[derive(Asset, TypePath, Debug, Clone, Deserialize)]
pub struct SceneContent {
    pub display_name: String,
    /// Backdrop clear color, linear RGB.
    pub clear_color: (f32, f32, f32),
    /// Placard lines rendered centered on screen. Empty for invisible bundles.
    #[serde(default)]
    pub placard: Vec<String>,
    /// Looping music track (asset path), if the bundle carries one.
    #[serde(default)]
    pub music: Option<String>,
}

impl SceneContent {
    pub fn clear_color(&self) -> Color {
        let (r, g, b) = self.clear_color;
        Color::srgb(r, g, b)
    }
}

#[derive(Default)]
pub struct SceneContentLoader;

impl AssetLoader for SceneContentLoader {
    type Asset = SceneContent;
    type Settings = ();
    type Error = anyhow::Error;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &(),
        load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let content: SceneContent = ron::de::from_bytes(&bytes)
            .with_context(|| format!("parse scene content {:?}", load_context.path()))?;
        Ok(content)
    }

    fn extensions(&self) -> &[&str] {
        &["scene.ron"]
    }
}

pub struct SceneContentPlugin;

impl Plugin for SceneContentPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<SceneContent>()
            .init_asset_loader::<SceneContentLoader>();
    }
}

/// Tag on every top-level entity a bundle spawned; unloading a scene is a
/// despawn of all entities carrying its id.
#[derive(Component, Debug, Clone)]
pub struct SceneTag(pub String);

/// Spawn the entities a loaded bundle describes, tagged with the scene id.
pub fn spawn_scene_bundle(world: &mut World, id: &str, content: &SceneContent) {
    world.insert_resource(ClearColor(content.clear_color()));

    let mut root = world.spawn((
        Name::new(format!("Scene:{id}")),
        SceneTag(id.to_string()),
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            row_gap: Val::Px(8.0),
            ..default()
        },
    ));
    if !content.placard.is_empty() {
        root.with_children(|p| {
            for (i, line) in content.placard.iter().enumerate() {
                let size = if i == 0 { 48.0 } else { 24.0 };
                p.spawn((
                    Text::new(line.clone()),
                    TextFont {
                        font_size: size,
                        ..default()
                    },
                    TextColor(Color::srgb(0.9, 0.9, 0.9)),
                ));
            }
        });
    }

    if let Some(track) = &content.music {
        let source = world.resource::<AssetServer>().load(track.clone());
        let db = world
            .get_resource::<UserSettings>()
            .map(|s| s.music_db())
            .unwrap_or(0.0);
        world.spawn((
            Name::new(format!("Scene:{id}:music")),
            SceneTag(id.to_string()),
            AudioPlayer::<AudioSource>(source),
            PlaybackSettings::LOOP.with_volume(Volume::Decibels(db)),
            MusicChannel,
        ));
    }

    info!(
        target: "scene",
        "spawned bundle '{}' ({})", id, content.display_name
    );
}

/// Despawn every entity (and descendants) tagged with the given scene id.
pub fn despawn_scene_bundle(world: &mut World, id: &str) {
    let mut tagged = world.query::<(Entity, &SceneTag)>();
    let doomed: Vec<Entity> = tagged
        .iter(world)
        .filter(|(_, tag)| tag.0 == id)
        .map(|(entity, _)| entity)
        .collect();
    for entity in doomed {
        world.despawn(entity);
    }
}
