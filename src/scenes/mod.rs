pub mod catalog;
pub mod content;
pub mod sequencer;

pub use catalog::{SceneCatalog, SceneEntry, SceneKind};
pub use content::{SceneContent, SceneContentPlugin, SceneTag};
pub use sequencer::{ActiveScene, SceneSequencer, SceneSequencerPlugin, TransitionOutcome};
