// Skeleton assembly configuration, loaded from `config/assembly.toml`

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::resolver::Representation;
use super::slot::SlotLayouts;
use crate::engine::assets::{AssetLoader, AssetType};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse assembly config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Representation '{0}' is bound to more than one controller")]
    DuplicateController(Representation),

    #[error("Skeleton root name must not be empty")]
    EmptyRootName,
}

/// What to do with a limb offered before the torso exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeckPolicy {
    /// Report success without attaching anything or notifying
    #[default]
    AcceptWithoutAttach,
    /// Refuse the part so the pickup stays in the world
    Reject,
}

/// Animator controller bound to one representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerBinding {
    pub representation: Representation,
    pub controller: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    /// Name of the skeleton's root scene node
    pub root_name: String,
    pub neck_policy: NeckPolicy,
    pub slots: SlotLayouts,
    pub controllers: Vec<ControllerBinding>,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            root_name: "Skeleton".to_string(),
            neck_policy: NeckPolicy::default(),
            slots: SlotLayouts::default(),
            controllers: Vec::new(),
        }
    }
}

impl AssemblyConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `config/<name>.toml` through the asset loader
    pub fn load(loader: &AssetLoader, name: &str) -> anyhow::Result<Self> {
        let source = loader.load_text(AssetType::Config, name)?;
        let config = Self::from_toml_str(&source)?;
        log::info!(
            "Loaded assembly config '{}' ({} controller bindings)",
            name,
            config.controllers.len()
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root_name.trim().is_empty() {
            return Err(ConfigError::EmptyRootName);
        }

        let mut seen = HashSet::new();
        for binding in &self.controllers {
            if !seen.insert(binding.representation) {
                return Err(ConfigError::DuplicateController(binding.representation));
            }
        }
        Ok(())
    }

    /// Controller asset name for a representation, falling back to the default
    pub fn controller_name(&self, representation: Representation) -> String {
        self.controllers
            .iter()
            .find(|binding| binding.representation == representation)
            .map(|binding| binding.controller.clone())
            .unwrap_or_else(|| representation.default_controller())
    }
}
