// Skeleton attachment slots and their occupants

use std::fmt;
use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::part::{PartDefinition, PartInstance};
use super::resolver::Occupancy;
use crate::engine::scene::SceneGraph;

/// A fixed attachment point on the skeleton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    Torso,
    NeckArm,
    NeckLeg,
    FrontArm,
    BackArm,
    FrontLeg,
    BackLeg,
}

impl SlotKind {
    /// Every slot, in registry order
    pub const ALL: [SlotKind; 7] = [
        SlotKind::Torso,
        SlotKind::NeckArm,
        SlotKind::NeckLeg,
        SlotKind::FrontArm,
        SlotKind::BackArm,
        SlotKind::FrontLeg,
        SlotKind::BackLeg,
    ];

    /// Position in [`SlotKind::ALL`]
    pub fn index(self) -> usize {
        match self {
            SlotKind::Torso => 0,
            SlotKind::NeckArm => 1,
            SlotKind::NeckLeg => 2,
            SlotKind::FrontArm => 3,
            SlotKind::BackArm => 4,
            SlotKind::FrontLeg => 5,
            SlotKind::BackLeg => 6,
        }
    }

    /// Bit in the occupancy mask: body slots 0-4, neck slots 5-6
    pub const fn bit(self) -> u8 {
        match self {
            SlotKind::Torso => 1 << 0,
            SlotKind::FrontArm => 1 << 1,
            SlotKind::BackArm => 1 << 2,
            SlotKind::FrontLeg => 1 << 3,
            SlotKind::BackLeg => 1 << 4,
            SlotKind::NeckArm => 1 << 5,
            SlotKind::NeckLeg => 1 << 6,
        }
    }

    /// Slots drawn behind the body
    pub fn is_back(self) -> bool {
        matches!(self, SlotKind::BackArm | SlotKind::BackLeg)
    }

    /// The front slot a back slot pairs with
    pub fn front_counterpart(self) -> Option<SlotKind> {
        match self {
            SlotKind::BackArm => Some(SlotKind::FrontArm),
            SlotKind::BackLeg => Some(SlotKind::FrontLeg),
            _ => None,
        }
    }

    /// The back slot a front slot pairs with
    pub fn back_counterpart(self) -> Option<SlotKind> {
        match self {
            SlotKind::FrontArm => Some(SlotKind::BackArm),
            SlotKind::FrontLeg => Some(SlotKind::BackLeg),
            _ => None,
        }
    }

    /// Name given to the root node of a part instantiated in this slot
    pub fn instance_name(self) -> &'static str {
        match self {
            SlotKind::Torso => "SkeletonTorso",
            SlotKind::NeckArm => "SkeletonNeckArm",
            SlotKind::NeckLeg => "SkeletonNeckLeg",
            SlotKind::FrontArm => "SkeletonArm",
            SlotKind::BackArm => "SkeletonArmBack",
            SlotKind::FrontLeg => "SkeletonLeg",
            SlotKind::BackLeg => "SkeletonLegBack",
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlotKind::Torso => "torso",
            SlotKind::NeckArm => "neck_arm",
            SlotKind::NeckLeg => "neck_leg",
            SlotKind::FrontArm => "front_arm",
            SlotKind::BackArm => "back_arm",
            SlotKind::FrontLeg => "front_leg",
            SlotKind::BackLeg => "back_leg",
        };
        f.write_str(name)
    }
}

/// Set of slot kinds a part may fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<SlotKind>", into = "Vec<SlotKind>")]
pub struct SlotSet(u8);

impl SlotSet {
    pub const EMPTY: SlotSet = SlotSet(0);

    pub fn contains(&self, kind: SlotKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn insert(&mut self, kind: SlotKind) {
        self.0 |= kind.bit();
    }

    pub fn with(mut self, kind: SlotKind) -> Self {
        self.insert(kind);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Members in registry order
    pub fn iter(&self) -> impl Iterator<Item = SlotKind> + '_ {
        SlotKind::ALL
            .into_iter()
            .filter(|kind| self.contains(*kind))
    }
}

impl FromIterator<SlotKind> for SlotSet {
    fn from_iter<I: IntoIterator<Item = SlotKind>>(iter: I) -> Self {
        let mut set = SlotSet::EMPTY;
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl From<Vec<SlotKind>> for SlotSet {
    fn from(kinds: Vec<SlotKind>) -> Self {
        kinds.into_iter().collect()
    }
}

impl From<SlotSet> for Vec<SlotKind> {
    fn from(set: SlotSet) -> Self {
        set.iter().collect()
    }
}

/// Where an attached part sits relative to the skeleton root
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotLayout {
    pub position: Vec2,
    /// Sorting order of the attached sprite
    pub layer_order: i32,
}

impl SlotLayout {
    pub const fn new(x: f32, y: f32, layer_order: i32) -> Self {
        Self {
            position: Vec2::new(x, y),
            layer_order,
        }
    }
}

/// Authored layout for every slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotLayouts {
    pub torso: SlotLayout,
    pub neck_arm: SlotLayout,
    pub neck_leg: SlotLayout,
    pub front_arm: SlotLayout,
    pub back_arm: SlotLayout,
    pub front_leg: SlotLayout,
    pub back_leg: SlotLayout,
}

impl SlotLayouts {
    pub fn get(&self, kind: SlotKind) -> SlotLayout {
        match kind {
            SlotKind::Torso => self.torso,
            SlotKind::NeckArm => self.neck_arm,
            SlotKind::NeckLeg => self.neck_leg,
            SlotKind::FrontArm => self.front_arm,
            SlotKind::BackArm => self.back_arm,
            SlotKind::FrontLeg => self.front_leg,
            SlotKind::BackLeg => self.back_leg,
        }
    }
}

impl Default for SlotLayouts {
    // Skull sits at the origin on layer 2; back limbs go under it
    fn default() -> Self {
        Self {
            torso: SlotLayout::new(0.0, -0.45, 1),
            neck_arm: SlotLayout::new(0.15, -0.3, 3),
            neck_leg: SlotLayout::new(0.0, -0.35, 1),
            front_arm: SlotLayout::new(0.2, -0.55, 3),
            back_arm: SlotLayout::new(-0.2, -0.55, 0),
            front_leg: SlotLayout::new(0.1, -0.95, 2),
            back_leg: SlotLayout::new(-0.1, -0.95, 0),
        }
    }
}

/// A single attachment slot
#[derive(Debug)]
pub struct Slot {
    kind: SlotKind,
    layout: SlotLayout,
    occupant: Option<PartInstance>,
}

impl Slot {
    fn new(kind: SlotKind, layout: SlotLayout) -> Self {
        Self {
            kind,
            layout,
            occupant: None,
        }
    }

    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    pub fn layout(&self) -> SlotLayout {
        self.layout
    }

    pub fn occupant(&self) -> Option<&PartInstance> {
        self.occupant.as_ref()
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// The fixed set of skeleton slots
///
/// Occupants only leave through [`SlotRegistry::clear_occupant`] or
/// replacement in [`SlotRegistry::set_occupant`], both of which despawn the
/// prior occupant's visuals.
#[derive(Debug)]
pub struct SlotRegistry {
    slots: [Slot; 7],
}

impl SlotRegistry {
    /// Create every slot, all empty
    pub fn new(layouts: &SlotLayouts) -> Self {
        Self {
            slots: SlotKind::ALL.map(|kind| Slot::new(kind, layouts.get(kind))),
        }
    }

    pub fn get_slot(&self, kind: SlotKind) -> &Slot {
        &self.slots[kind.index()]
    }

    pub fn is_occupied(&self, kind: SlotKind) -> bool {
        self.get_slot(kind).is_occupied()
    }

    /// Place a part in a slot, releasing whatever was there
    ///
    /// Returns the definition of the replaced occupant, if any.
    pub fn set_occupant(
        &mut self,
        kind: SlotKind,
        part: PartInstance,
        scene: &mut SceneGraph,
    ) -> Option<Arc<PartDefinition>> {
        let released = self.clear_occupant(kind, scene);
        self.slots[kind.index()].occupant = Some(part);
        released
    }

    /// Empty a slot, despawning the occupant's visual subtree
    pub fn clear_occupant(
        &mut self,
        kind: SlotKind,
        scene: &mut SceneGraph,
    ) -> Option<Arc<PartDefinition>> {
        self.slots[kind.index()]
            .occupant
            .take()
            .map(|part| part.release(scene))
    }

    /// Empty every slot
    pub fn clear_all(&mut self, scene: &mut SceneGraph) {
        for kind in SlotKind::ALL {
            let _ = self.clear_occupant(kind, scene);
        }
    }

    /// Current occupancy vector
    pub fn occupancy(&self) -> Occupancy {
        self.occupied()
            .fold(Occupancy::EMPTY, |acc, slot| acc.with(slot.kind))
    }

    /// Occupied slots in registry order
    pub fn occupied(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|slot| slot.is_occupied())
    }

    /// All slots in registry order
    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene::Prefab;

    fn instance(scene: &mut SceneGraph, id: &str) -> PartInstance {
        let definition = Arc::new(PartDefinition::new(
            id,
            SlotSet::EMPTY.with(SlotKind::FrontLeg),
            Prefab::new("Leg").with_child(Prefab::new("Foot")),
        ));
        let root = scene.instantiate(&definition.visual_template, None);
        PartInstance::new(definition, root)
    }

    #[test]
    fn test_slot_bits_unique() {
        let mut seen = 0u8;
        for kind in SlotKind::ALL {
            assert_eq!(seen & kind.bit(), 0);
            seen |= kind.bit();
        }
        assert_eq!(seen, 0x7f);
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, kind) in SlotKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_counterparts() {
        assert_eq!(
            SlotKind::BackArm.front_counterpart(),
            Some(SlotKind::FrontArm)
        );
        assert_eq!(
            SlotKind::FrontLeg.back_counterpart(),
            Some(SlotKind::BackLeg)
        );
        assert_eq!(SlotKind::Torso.front_counterpart(), None);
        assert!(SlotKind::BackLeg.is_back());
        assert!(!SlotKind::FrontLeg.is_back());
    }

    #[test]
    fn test_slot_set_parse() {
        #[derive(Deserialize)]
        struct Manifest {
            slots: SlotSet,
        }

        let manifest: Manifest = toml::from_str(r#"slots = ["front_leg", "back_arm"]"#).unwrap();
        assert!(manifest.slots.contains(SlotKind::FrontLeg));
        assert!(manifest.slots.contains(SlotKind::BackArm));
        assert!(!manifest.slots.contains(SlotKind::Torso));
        assert_eq!(
            manifest.slots.iter().collect::<Vec<_>>(),
            vec![SlotKind::BackArm, SlotKind::FrontLeg]
        );
    }

    #[test]
    fn test_registry_starts_empty() {
        let registry = SlotRegistry::new(&SlotLayouts::default());
        assert_eq!(registry.occupied().count(), 0);
        assert_eq!(registry.occupancy(), Occupancy::EMPTY);
        assert_eq!(
            registry.get_slot(SlotKind::BackLeg).kind(),
            SlotKind::BackLeg
        );
    }

    #[test]
    fn test_clear_releases_visuals() {
        let mut scene = SceneGraph::new();
        let mut registry = SlotRegistry::new(&SlotLayouts::default());

        let part = instance(&mut scene, "leg");
        let root = part.root();
        let replaced = registry.set_occupant(SlotKind::FrontLeg, part, &mut scene);
        assert!(replaced.is_none());
        assert_eq!(scene.len(), 2);

        let released = registry.clear_occupant(SlotKind::FrontLeg, &mut scene);
        assert_eq!(released.unwrap().id, "leg");
        assert!(!scene.contains(root));
        assert!(scene.is_empty());

        let released = registry.clear_occupant(SlotKind::FrontLeg, &mut scene);
        assert!(released.is_none());
    }

    #[test]
    fn test_replace_releases_prior_occupant() {
        let mut scene = SceneGraph::new();
        let mut registry = SlotRegistry::new(&SlotLayouts::default());

        let first = instance(&mut scene, "first");
        let first_root = first.root();
        let _ = registry.set_occupant(SlotKind::FrontLeg, first, &mut scene);

        let second = instance(&mut scene, "second");
        let released = registry.set_occupant(SlotKind::FrontLeg, second, &mut scene);

        assert_eq!(released.unwrap().id, "first");
        assert!(!scene.contains(first_root));
        assert_eq!(scene.len(), 2);
        assert_eq!(registry.occupied().count(), 1);
    }

    #[test]
    fn test_clear_all() {
        let mut scene = SceneGraph::new();
        let mut registry = SlotRegistry::new(&SlotLayouts::default());
        let a = instance(&mut scene, "a");
        let b = instance(&mut scene, "b");
        let _ = registry.set_occupant(SlotKind::Torso, a, &mut scene);
        let _ = registry.set_occupant(SlotKind::FrontLeg, b, &mut scene);

        registry.clear_all(&mut scene);
        assert_eq!(registry.occupied().count(), 0);
        assert!(scene.is_empty());
    }
}
