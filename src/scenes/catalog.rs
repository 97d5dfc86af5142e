use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

/// What a loaded bundle stands in for; drives the post-transition app state.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    Menu,
    Map,
    /// Persistent gameplay services bundle, resident while any map is active.
    Managers,
}

/// Descriptor of one loadable scene bundle.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SceneEntry {
    pub id: String,
    pub kind: SceneKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Asset path of the bundle's content file (relative to the asset root).
    pub content: String,
    #[serde(default = "default_unlocked")]
    pub unlocked: bool,
}

fn default_unlocked() -> bool {
    true
}

#[derive(Debug, Deserialize, Resource, Clone)]
pub struct SceneCatalog {
    pub version: u32,
    /// Id of the menu scene the bootstrapper requests at startup.
    pub menu: String,
    /// Id of the gameplay-managers bundle loaded alongside maps.
    pub managers: String,
    pub scenes: Vec<SceneEntry>,
}

impl SceneCatalog {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let txt = fs::read_to_string(&path)
            .map_err(|e| format!("read catalog {:?}: {e}", path.as_ref()))?;
        let catalog: SceneCatalog =
            ron::from_str(&txt).map_err(|e| format!("parse catalog {:?}: {e}", path.as_ref()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.version != 1 {
            return Err(format!(
                "SceneCatalog version {} unsupported (expected 1)",
                self.version
            ));
        }
        if self.scenes.is_empty() {
            return Err("SceneCatalog scene list empty".into());
        }
        for (i, entry) in self.scenes.iter().enumerate() {
            if entry.id.trim().is_empty() {
                return Err(format!("SceneCatalog entry {i} has an empty id"));
            }
            if self.scenes[..i].iter().any(|prev| prev.id == entry.id) {
                return Err(format!("SceneCatalog duplicate id '{}'", entry.id));
            }
            if entry.content.trim().is_empty() {
                return Err(format!("SceneCatalog entry '{}' has no content path", entry.id));
            }
        }
        let menu = self
            .get(&self.menu)
            .ok_or_else(|| format!("SceneCatalog menu id '{}' not in scene list", self.menu))?;
        if menu.kind != SceneKind::Menu {
            return Err(format!("SceneCatalog menu id '{}' is not a Menu scene", self.menu));
        }
        let managers = self.get(&self.managers).ok_or_else(|| {
            format!("SceneCatalog managers id '{}' not in scene list", self.managers)
        })?;
        if managers.kind != SceneKind::Managers {
            return Err(format!(
                "SceneCatalog managers id '{}' is not a Managers scene",
                self.managers
            ));
        }
        if self.maps().next().is_none() {
            return Err("SceneCatalog has no Map scenes".into());
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&SceneEntry> {
        self.scenes.iter().find(|e| e.id == id)
    }

    pub fn menu_entry(&self) -> &SceneEntry {
        // Upheld by validate(); a catalog resource always passed it.
        self.get(&self.menu).expect("menu id validated at load")
    }

    pub fn managers_entry(&self) -> &SceneEntry {
        self.get(&self.managers).expect("managers id validated at load")
    }

    /// Map scenes in declaration order, for the map select screen.
    pub fn maps(&self) -> impl Iterator<Item = &SceneEntry> {
        self.scenes.iter().filter(|e| e.kind == SceneKind::Map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SceneCatalog {
        SceneCatalog {
            version: 1,
            menu: "main_menu".into(),
            managers: "gameplay_managers".into(),
            scenes: vec![
                SceneEntry {
                    id: "main_menu".into(),
                    kind: SceneKind::Menu,
                    title: "Main Menu".into(),
                    description: String::new(),
                    content: "scenes/main_menu.scene.ron".into(),
                    unlocked: true,
                },
                SceneEntry {
                    id: "gameplay_managers".into(),
                    kind: SceneKind::Managers,
                    title: "Gameplay Managers".into(),
                    description: String::new(),
                    content: "scenes/gameplay_managers.scene.ron".into(),
                    unlocked: true,
                },
                SceneEntry {
                    id: "forest".into(),
                    kind: SceneKind::Map,
                    title: "Forest".into(),
                    description: "A quiet clearing.".into(),
                    content: "scenes/forest.scene.ron".into(),
                    unlocked: true,
                },
            ],
        }
    }

    #[test]
    fn valid_catalog_passes() {
        assert!(catalog().validate().is_ok());
    }

    #[test]
    fn wrong_version_rejected() {
        let mut c = catalog();
        c.version = 2;
        assert!(c.validate().is_err());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let mut c = catalog();
        let dup = c.scenes[2].clone();
        c.scenes.push(dup);
        assert!(c.validate().unwrap_err().contains("duplicate"));
    }

    #[test]
    fn dangling_menu_id_rejected() {
        let mut c = catalog();
        c.menu = "nope".into();
        assert!(c.validate().is_err());
    }

    #[test]
    fn menu_id_must_point_at_menu_kind() {
        let mut c = catalog();
        c.menu = "forest".into();
        assert!(c.validate().unwrap_err().contains("not a Menu"));
    }

    #[test]
    fn catalog_without_maps_rejected() {
        let mut c = catalog();
        c.scenes.retain(|e| e.kind != SceneKind::Map);
        assert!(c.validate().unwrap_err().contains("no Map scenes"));
    }

    #[test]
    fn maps_iterates_map_kind_only() {
        let c = catalog();
        let ids: Vec<_> = c.maps().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["forest"]);
    }
}
