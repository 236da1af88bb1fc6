// Type-safe asset handle system

use std::marker::PhantomData;

/// Unique identifier for an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(pub(crate) u64);

impl AssetId {
    /// Create a new asset ID from a string path
    pub fn from_path(path: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        path.hash(&mut hasher);
        Self(hasher.finish())
    }
}

/// Type-safe handle to an asset
///
/// The `T` parameter ensures handles can only be used with the correct asset type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetHandle<T> {
    pub(crate) id: AssetId,
    _phantom: PhantomData<T>,
}

impl<T> AssetHandle<T> {
    pub(crate) fn new(id: AssetId) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    /// Handle for an asset known only by name (not necessarily loaded)
    pub fn named(name: &str) -> Self {
        Self::new(AssetId::from_path(name))
    }

    /// Get the underlying asset ID
    pub fn id(&self) -> AssetId {
        self.id
    }
}

// Marker types for different asset types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrefabAsset;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundSetAsset;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControllerAsset;

/// Convenience type aliases
pub type PrefabHandle = AssetHandle<PrefabAsset>;
pub type SoundSetHandle = AssetHandle<SoundSetAsset>;
/// Animator controller bundle selected for a composite representation
pub type ControllerHandle = AssetHandle<ControllerAsset>;
