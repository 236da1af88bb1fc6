// Central asset cache

use super::{
    AssetError, AssetHandle, AssetId, AssetLoader, AssetType, PrefabAsset, PrefabHandle,
    SoundSetAsset, SoundSetHandle,
};
use crate::engine::audio::SoundSet;
use crate::engine::scene::Prefab;
use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Central asset manager for the game
///
/// Loads prefab templates and sound sets once and hands out shared copies.
#[derive(Debug)]
pub struct AssetManager {
    /// Asset loader
    loader: AssetLoader,

    /// Loaded prefab templates
    prefabs: HashMap<AssetId, Arc<Prefab>>,

    /// Loaded sound sets
    sound_sets: HashMap<AssetId, Arc<SoundSet>>,

    /// Name to ID mapping for everything loaded
    names: HashMap<String, AssetId>,
}

impl AssetManager {
    /// Create a new asset manager
    pub fn new<P: AsRef<Path>>(asset_path: P) -> Self {
        Self {
            loader: AssetLoader::new(asset_path),
            prefabs: HashMap::new(),
            sound_sets: HashMap::new(),
            names: HashMap::new(),
        }
    }

    /// Load a prefab template from disk (cached by name)
    pub fn load_prefab(&mut self, name: &str) -> Result<PrefabHandle> {
        let key = Self::key(AssetType::Prefab, name);
        if let Some(&id) = self.names.get(&key) {
            return Ok(AssetHandle::new(id));
        }

        let prefab: Prefab = self.loader.load(AssetType::Prefab, name)?;
        self.insert_prefab(name, prefab)
    }

    /// Register an in-memory prefab template
    pub fn insert_prefab(&mut self, name: &str, prefab: Prefab) -> Result<PrefabHandle> {
        let key = Self::key(AssetType::Prefab, name);
        if self.names.contains_key(&key) {
            return Err(AssetError::AlreadyLoaded(name.to_string()).into());
        }

        let id = AssetId::from_path(&key);
        self.prefabs.insert(id, Arc::new(prefab));
        self.names.insert(key, id);

        Ok(AssetHandle::new(id))
    }

    /// Load a sound set from disk (cached by name)
    pub fn load_sound_set(&mut self, name: &str) -> Result<SoundSetHandle> {
        let key = Self::key(AssetType::SoundSet, name);
        if let Some(&id) = self.names.get(&key) {
            return Ok(AssetHandle::new(id));
        }

        let set: SoundSet = self.loader.load(AssetType::SoundSet, name)?;
        self.insert_sound_set(name, set)
    }

    /// Register an in-memory sound set
    pub fn insert_sound_set(&mut self, name: &str, set: SoundSet) -> Result<SoundSetHandle> {
        let key = Self::key(AssetType::SoundSet, name);
        if self.names.contains_key(&key) {
            return Err(AssetError::AlreadyLoaded(name.to_string()).into());
        }

        let id = AssetId::from_path(&key);
        self.sound_sets.insert(id, Arc::new(set));
        self.names.insert(key, id);

        Ok(AssetHandle::new(id))
    }

    /// Get a prefab by handle
    pub fn get_prefab(&self, handle: AssetHandle<PrefabAsset>) -> Option<Arc<Prefab>> {
        self.prefabs.get(&handle.id()).cloned()
    }

    /// Get a sound set by handle
    pub fn get_sound_set(&self, handle: AssetHandle<SoundSetAsset>) -> Option<Arc<SoundSet>> {
        self.sound_sets.get(&handle.id()).cloned()
    }

    /// Get statistics about loaded assets
    pub fn stats(&self) -> AssetStats {
        AssetStats {
            prefab_count: self.prefabs.len(),
            sound_set_count: self.sound_sets.len(),
        }
    }

    /// Get the asset loader
    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }

    fn key(asset_type: AssetType, name: &str) -> String {
        format!("{}/{}", asset_type.default_directory(), name)
    }
}

/// Statistics about loaded assets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetStats {
    pub prefab_count: usize,
    pub sound_set_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get_prefab() {
        let mut assets = AssetManager::new("unused");
        let handle = assets.insert_prefab("arm", Prefab::new("Arm")).unwrap();

        let prefab = assets.get_prefab(handle).unwrap();
        assert_eq!(prefab.name, "Arm");
        assert_eq!(assets.stats().prefab_count, 1);
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut assets = AssetManager::new("unused");
        assets.insert_prefab("arm", Prefab::new("Arm")).unwrap();

        let err = assets.insert_prefab("arm", Prefab::new("Arm")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AssetError>(),
            Some(AssetError::AlreadyLoaded(_))
        ));
    }

    #[test]
    fn test_same_name_different_types() {
        let mut assets = AssetManager::new("unused");
        assets.insert_prefab("bone", Prefab::new("Bone")).unwrap();
        assert!(assets.insert_sound_set("bone", SoundSet::default()).is_ok());
        assert_eq!(
            assets.stats(),
            AssetStats {
                prefab_count: 1,
                sound_set_count: 1
            }
        );
    }

    #[test]
    fn test_load_prefab_is_cached() {
        let mut assets = AssetManager::new(concat!(env!("CARGO_MANIFEST_DIR"), "/assets"));
        let first = assets.load_prefab("bone_leg.toml").unwrap();
        let second = assets.load_prefab("bone_leg.toml").unwrap();

        assert_eq!(first, second);
        assert_eq!(assets.stats().prefab_count, 1);
    }
}
