// Asset loading functionality

use super::AssetError;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Supported asset types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetType {
    Part,
    Prefab,
    SoundSet,
    Config,
}

impl AssetType {
    /// Get the default directory for this asset type
    pub fn default_directory(&self) -> &'static str {
        match self {
            AssetType::Part => "parts",
            AssetType::Prefab => "prefabs",
            AssetType::SoundSet => "sounds",
            AssetType::Config => "config",
        }
    }

    /// Get supported file extensions for this asset type
    pub fn extensions(&self) -> &'static [&'static str] {
        &["toml"]
    }
}

/// Asset loader responsible for finding and parsing asset files
#[derive(Debug, Clone)]
pub struct AssetLoader {
    base_path: PathBuf,
}

impl AssetLoader {
    /// Create a new asset loader with the given base path
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the full path for an asset
    pub fn resolve_path(&self, asset_type: AssetType, name: &str) -> PathBuf {
        self.base_path
            .join(asset_type.default_directory())
            .join(name)
    }

    /// Load asset text from disk
    pub fn load_text(&self, asset_type: AssetType, name: &str) -> Result<String> {
        let path = self.resolve_path(asset_type, name);

        if !path.exists() {
            return Err(AssetError::NotFound(path.to_string_lossy().to_string()).into());
        }

        std::fs::read_to_string(&path)
            .map_err(|e| AssetError::LoadError(format!("Failed to read {}: {}", name, e)).into())
    }

    /// Load and parse a TOML asset
    pub fn load<T: DeserializeOwned>(&self, asset_type: AssetType, name: &str) -> Result<T> {
        let text = self.load_text(asset_type, name)?;
        toml::from_str(&text).with_context(|| {
            format!(
                "Failed to parse {}/{}",
                asset_type.default_directory(),
                name
            )
        })
    }

    /// Check if an asset exists
    pub fn exists(&self, asset_type: AssetType, name: &str) -> bool {
        self.resolve_path(asset_type, name).exists()
    }

    /// List all assets of a given type, sorted by name
    pub fn list_assets(&self, asset_type: AssetType) -> Result<Vec<String>> {
        let dir = self.base_path.join(asset_type.default_directory());

        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut assets = Vec::new();
        let extensions = asset_type.extensions();

        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let supported = path
                .extension()
                .is_some_and(|ext| extensions.contains(&ext.to_string_lossy().as_ref()));
            match path.file_name() {
                Some(name) if supported => assets.push(name.to_string_lossy().to_string()),
                _ => log::warn!("Skipping unsupported asset file {}", path.display()),
            }
        }

        assets.sort();
        Ok(assets)
    }

    /// Get the base path
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}
