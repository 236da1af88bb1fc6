// Collectible part definitions and their runtime instances

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::slot::{SlotKind, SlotSet};
use crate::core::math::FloatRange;
use crate::engine::assets::{AssetError, AssetManager, AssetType};
use crate::engine::audio::SoundSet;
use crate::engine::scene::{NodeId, Prefab, SceneGraph};

/// Launch angles are authored in degrees above the +X axis
const LAUNCH_ANGLE_LIMITS: (f32, f32) = (0.0, 180.0);

/// Part validation errors, raised while loading manifests
#[derive(Debug, thiserror::Error)]
pub enum PartError {
    #[error("Part '{0}' has no allowed slots")]
    NoAllowedSlots(String),

    #[error("Part '{part}' references missing visual template '{template}'")]
    MissingTemplate { part: String, template: String },

    #[error("Part '{part}' references missing sound set '{sound_set}'")]
    MissingSoundSet { part: String, sound_set: String },

    #[error("Part '{part}' has invalid {field} range [{min}, {max}]")]
    InvalidRange {
        part: String,
        field: &'static str,
        min: f32,
        max: f32,
    },

    #[error("Duplicate part id '{0}'")]
    DuplicateId(String),
}

/// Part manifest as authored in `parts/*.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartManifest {
    pub id: String,
    pub allowed_slots: SlotSet,
    /// Name of a prefab in `prefabs/`
    pub visual_template: String,
    #[serde(default)]
    pub layer_order: i32,
    #[serde(default)]
    pub local_offset: Vec2,
    /// Name of a sound set in `sounds/`
    #[serde(default)]
    pub collection_sounds: Option<String>,
    #[serde(default)]
    pub launch_force: FloatRange,
    #[serde(default)]
    pub launch_angle: FloatRange,
    #[serde(default)]
    pub hover_height: f32,
    #[serde(default)]
    pub persists: bool,
}

/// Immutable, validated part definition
#[derive(Debug, Clone)]
pub struct PartDefinition {
    pub id: String,
    /// Slot kinds this part may fill
    pub allowed_slots: SlotSet,
    pub visual_template: Arc<Prefab>,
    /// Added to the slot's layer order
    pub layer_order: i32,
    /// Added to the slot's position
    pub local_offset: Vec2,
    pub collection_sounds: Option<Arc<SoundSet>>,
    /// Launch impulse magnitude
    pub launch_force: FloatRange,
    /// Launch direction in degrees
    pub launch_angle: FloatRange,
    /// How far the pickup rises once it settles
    pub hover_height: f32,
    /// Whether the pickup survives touching the ground
    pub persists: bool,
}

impl PartDefinition {
    /// Create a definition with no sounds, no launch and no hover
    pub fn new(id: &str, allowed_slots: SlotSet, visual_template: Prefab) -> Self {
        Self {
            id: id.to_string(),
            allowed_slots,
            visual_template: Arc::new(visual_template),
            layer_order: 0,
            local_offset: Vec2::ZERO,
            collection_sounds: None,
            launch_force: FloatRange::constant(0.0),
            launch_angle: FloatRange::constant(90.0),
            hover_height: 0.0,
            persists: true,
        }
    }

    pub fn with_sounds(mut self, sounds: SoundSet) -> Self {
        self.collection_sounds = Some(Arc::new(sounds));
        self
    }

    pub fn with_launch(mut self, force: FloatRange, angle: FloatRange) -> Self {
        self.launch_force = force;
        self.launch_angle = angle;
        self
    }

    pub fn with_hover_height(mut self, height: f32) -> Self {
        self.hover_height = height;
        self
    }

    pub fn with_persists(mut self, persists: bool) -> Self {
        self.persists = persists;
        self
    }

    pub fn with_layer_order(mut self, layer_order: i32) -> Self {
        self.layer_order = layer_order;
        self
    }

    pub fn can_fill(&self, kind: SlotKind) -> bool {
        self.allowed_slots.contains(kind)
    }

    /// Torso-capable parts only ever go through the torso path
    pub fn is_torso(&self) -> bool {
        self.can_fill(SlotKind::Torso)
    }

    /// Resolve a manifest's references and validate it
    pub fn from_manifest(manifest: PartManifest, assets: &mut AssetManager) -> Result<Self> {
        let PartManifest {
            id,
            allowed_slots,
            visual_template,
            layer_order,
            local_offset,
            collection_sounds,
            launch_force,
            launch_angle,
            hover_height,
            persists,
        } = manifest;

        if allowed_slots.is_empty() {
            return Err(PartError::NoAllowedSlots(id).into());
        }

        if !launch_force.is_ordered() || launch_force.min < 0.0 {
            return Err(invalid_range(&id, "launch_force", launch_force).into());
        }

        let (lo, hi) = LAUNCH_ANGLE_LIMITS;
        if !launch_angle.within(lo, hi) {
            return Err(invalid_range(&id, "launch_angle", launch_angle).into());
        }

        let template = match assets.load_prefab(&visual_template) {
            Ok(handle) => assets.get_prefab(handle),
            Err(err) if is_not_found(&err) => None,
            Err(err) => return Err(err),
        }
        .ok_or_else(|| PartError::MissingTemplate {
            part: id.clone(),
            template: visual_template.clone(),
        })?;

        let sounds = match collection_sounds {
            Some(name) => {
                let set = match assets.load_sound_set(&name) {
                    Ok(handle) => assets.get_sound_set(handle),
                    Err(err) if is_not_found(&err) => None,
                    Err(err) => return Err(err),
                };
                let set = set.ok_or_else(|| PartError::MissingSoundSet {
                    part: id.clone(),
                    sound_set: name.clone(),
                })?;
                Some(set)
            }
            None => None,
        };

        Ok(Self {
            id,
            allowed_slots,
            visual_template: template,
            layer_order,
            local_offset,
            collection_sounds: sounds,
            launch_force,
            launch_angle,
            hover_height,
            persists,
        })
    }
}

fn is_not_found(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<AssetError>(),
        Some(AssetError::NotFound(_))
    )
}

fn invalid_range(part: &str, field: &'static str, range: FloatRange) -> PartError {
    PartError::InvalidRange {
        part: part.to_string(),
        field,
        min: range.min,
        max: range.max,
    }
}

/// A part attached to a slot, owning its instantiated visuals
///
/// Not `Clone`: exactly one slot owns it, and the only way to get rid of it
/// is [`PartInstance::release`], which despawns the visual subtree.
#[derive(Debug)]
#[must_use = "dropping a PartInstance leaks its scene nodes; release it instead"]
pub struct PartInstance {
    definition: Arc<PartDefinition>,
    root: NodeId,
}

impl PartInstance {
    pub(crate) fn new(definition: Arc<PartDefinition>, root: NodeId) -> Self {
        Self { definition, root }
    }

    pub fn definition(&self) -> &Arc<PartDefinition> {
        &self.definition
    }

    /// Root node of the instantiated visual subtree
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Despawn the visuals and hand back the definition
    pub(crate) fn release(self, scene: &mut SceneGraph) -> Arc<PartDefinition> {
        let removed = scene.despawn(self.root);
        log::debug!("Released part '{}' ({} nodes)", self.definition.id, removed);
        self.definition
    }
}

/// All part definitions known to the game, keyed by id
#[derive(Debug, Default)]
pub struct PartLibrary {
    parts: HashMap<String, Arc<PartDefinition>>,
}

impl PartLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate every manifest under `parts/`
    pub fn load_all(assets: &mut AssetManager) -> Result<Self> {
        let mut library = Self::new();
        let loader = assets.loader().clone();

        for name in loader.list_assets(AssetType::Part)? {
            let manifest: PartManifest = loader.load(AssetType::Part, &name)?;
            let definition = PartDefinition::from_manifest(manifest, assets)
                .with_context(|| format!("Invalid part manifest {}", name))?;
            library.insert(definition)?;
        }

        log::info!("Loaded {} part definitions", library.len());
        Ok(library)
    }

    /// Register a definition, rejecting duplicate ids
    pub fn insert(&mut self, definition: PartDefinition) -> Result<Arc<PartDefinition>, PartError> {
        if self.parts.contains_key(&definition.id) {
            return Err(PartError::DuplicateId(definition.id));
        }
        let definition = Arc::new(definition);
        self.parts
            .insert(definition.id.clone(), Arc::clone(&definition));
        Ok(definition)
    }

    pub fn get(&self, id: &str) -> Option<Arc<PartDefinition>> {
        self.parts.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}
