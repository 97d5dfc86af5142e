pub mod channel;

use bevy::prelude::*;

use crate::scenes::catalog::SceneEntry;
use channel::EventChannel;

/// Request to load a scene bundle. Consumed by the sequencer and discarded.
#[derive(Debug, Clone)]
pub struct LoadSceneRequest {
    pub entry: SceneEntry,
    pub show_loading_screen: bool,
    pub fade: bool,
}

/// Channel carrying [`LoadSceneRequest`]s from menus/bootstrap to the sequencer.
#[derive(Resource, Deref, DerefMut)]
pub struct SceneLoadChannel(pub EventChannel<LoadSceneRequest>);

impl Default for SceneLoadChannel {
    fn default() -> Self {
        Self(EventChannel::new("scene-load"))
    }
}

/// Channel carrying loading-screen visibility toggles.
#[derive(Resource, Deref, DerefMut)]
pub struct LoadingScreenChannel(pub EventChannel<bool>);

impl Default for LoadingScreenChannel {
    fn default() -> Self {
        Self(EventChannel::new("loading-screen"))
    }
}

pub struct EventChannelPlugin;

impl Plugin for EventChannelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneLoadChannel>()
            .init_resource::<LoadingScreenChannel>();
    }
}

/// Publish a load request from a regular system via the command queue.
pub fn publish_load_request(commands: &mut Commands, request: LoadSceneRequest) {
    commands.queue(move |world: &mut World| {
        world.resource_scope(|world, mut ch: Mut<SceneLoadChannel>| {
            ch.publish(&request, world);
        });
    });
}

/// Publish a loading-screen toggle with exclusive world access.
pub fn publish_loading_screen(world: &mut World, visible: bool) {
    world.resource_scope(|world, mut ch: Mut<LoadingScreenChannel>| {
        ch.publish(&visible, world);
    });
}
