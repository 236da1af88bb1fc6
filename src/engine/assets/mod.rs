// Asset management system
//
// Provides centralized loading and caching of prefab templates, sound sets
// and part manifests authored as TOML.

mod handle;
mod loader;
mod manager;

pub use handle::{
    AssetHandle, AssetId, ControllerAsset, ControllerHandle, PrefabAsset, PrefabHandle,
    SoundSetAsset, SoundSetHandle,
};
pub use loader::{AssetLoader, AssetType};
pub use manager::{AssetManager, AssetStats};

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Asset already loaded: {0}")]
    AlreadyLoaded(String),

    #[error("Failed to load asset: {0}")]
    LoadError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_error_display() {
        let err = AssetError::NotFound("bone_arm.toml".to_string());
        assert_eq!(err.to_string(), "Asset not found: bone_arm.toml");
    }
}
