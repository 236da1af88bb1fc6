// Skeleton character: assembly plus its physics body

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use glam::Vec2;

use crate::engine::physics::{body::presets, ColliderHandle, PhysicsWorld, RigidBodyHandle};
use crate::game::assembly::{
    AssemblyConfig, AssemblyController, AttachOutcome, PartDefinition, SlotKind,
};

use super::animation::AnimatorBinding;
use super::stats::SkeletonStats;

/// Direction the model faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    /// Yaw applied to the model
    pub fn yaw_degrees(self) -> f32 {
        match self {
            Facing::Right => 0.0,
            Facing::Left => 180.0,
        }
    }

    /// Facing for a horizontal input, None inside the dead zone
    pub fn from_horizontal(input: f32) -> Option<Facing> {
        if input > 0.1 {
            Some(Facing::Right)
        } else if input < -0.1 {
            Some(Facing::Left)
        } else {
            None
        }
    }
}

/// The collecting skeleton in the world
#[derive(Debug)]
pub struct SkeletonCharacter {
    /// Character name (for logs)
    pub name: String,

    assembly: AssemblyController,
    animator: AnimatorBinding,
    /// Last leg-collider signal not yet pushed to physics
    leg_signal: Rc<Cell<Option<bool>>>,

    // Physics
    /// Handle to the skeleton's rigid body
    pub body_handle: RigidBodyHandle,
    /// Skull collider, always enabled
    pub skull_collider: ColliderHandle,
    /// Leg collider, enabled while a front leg is attached
    pub leg_collider: ColliderHandle,

    pub stats: SkeletonStats,
    facing: Facing,
}

impl SkeletonCharacter {
    /// Create a bare skull and add it to the physics world
    pub fn new(
        name: &str,
        config: &AssemblyConfig,
        stats: SkeletonStats,
        physics: &mut PhysicsWorld,
        spawn_x: f32,
        spawn_y: f32,
    ) -> Self {
        let body_handle = physics.add_rigid_body(presets::skeleton_body(spawn_x, spawn_y));
        let skull_collider =
            physics.add_collider(presets::skull_collider(stats.skull_radius), body_handle);
        let leg_collider = physics.add_collider(
            presets::leg_collider(stats.leg_width, stats.leg_height),
            body_handle,
        );

        let mut assembly = AssemblyController::new(config);

        let leg_signal = Rc::new(Cell::new(None));
        let sink = Rc::clone(&leg_signal);
        assembly.subscribe_leg_collider(move |enabled| sink.set(Some(enabled)));

        let mut animator = AnimatorBinding::new();
        animator.attach(&mut assembly);

        Self {
            name: name.to_string(),
            assembly,
            animator,
            leg_signal,
            body_handle,
            skull_collider,
            leg_collider,
            stats,
            facing: Facing::Right,
        }
    }

    /// Offer a part and push any resulting changes to physics and animation
    pub fn try_add_limb(&mut self, part: &Arc<PartDefinition>, physics: &mut PhysicsWorld) -> bool {
        self.add_limb(part, physics).is_success()
    }

    pub fn add_limb(
        &mut self,
        part: &Arc<PartDefinition>,
        physics: &mut PhysicsWorld,
    ) -> AttachOutcome {
        let outcome = self.assembly.attach(part);
        self.sync(physics);
        outcome
    }

    /// Drop the part in `kind`, if the slot order allows it
    pub fn remove_limb(
        &mut self,
        kind: SlotKind,
        physics: &mut PhysicsWorld,
    ) -> Option<Arc<PartDefinition>> {
        let removed = self.assembly.detach(kind);
        self.sync(physics);
        removed
    }

    /// Apply pending leg-collider and animator changes
    ///
    /// Call after mutating the assembly through [`Self::assembly_mut`].
    pub fn sync(&mut self, physics: &mut PhysicsWorld) {
        if let Some(enabled) = self.leg_signal.take() {
            physics.set_collider_enabled(self.leg_collider, enabled);
        }
        self.animator.sync(&self.assembly);
    }

    /// Turn the model to face `facing`
    pub fn face(&mut self, facing: Facing) {
        if self.facing == facing {
            return;
        }
        self.facing = facing;
        self.assembly.set_mirrored(facing == Facing::Left);
        self.animator.sync(&self.assembly);
    }

    /// Face along a horizontal input, keeping the old facing inside the dead zone
    pub fn face_toward(&mut self, input_horizontal: f32) {
        if let Some(facing) = Facing::from_horizontal(input_horizontal) {
            self.face(facing);
        }
    }

    /// Advance animation timing (called every tick)
    pub fn update(&mut self, dt: f32) {
        self.animator.update(dt);
    }

    /// Whether `collider` belongs to this skeleton
    pub fn owns_collider(&self, collider: ColliderHandle) -> bool {
        collider == self.skull_collider || collider == self.leg_collider
    }

    /// Get the skeleton's current position
    pub fn position(&self, physics: &PhysicsWorld) -> Option<Vec2> {
        physics.body_position(self.body_handle)
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn assembly(&self) -> &AssemblyController {
        &self.assembly
    }

    pub fn assembly_mut(&mut self) -> &mut AssemblyController {
        &mut self.assembly
    }

    pub fn animator(&self) -> &AnimatorBinding {
        &self.animator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene::Prefab;
    use crate::game::assembly::{Representation, SlotSet};

    fn part(id: &str, slots: SlotSet) -> Arc<PartDefinition> {
        Arc::new(PartDefinition::new(id, slots, Prefab::new(id)))
    }

    fn torso() -> Arc<PartDefinition> {
        part("torso", SlotSet::EMPTY.with(SlotKind::Torso))
    }

    fn spawn(physics: &mut PhysicsWorld) -> SkeletonCharacter {
        SkeletonCharacter::new(
            "bones",
            &AssemblyConfig::default(),
            SkeletonStats::default(),
            physics,
            0.0,
            2.0,
        )
    }

    #[test]
    fn test_facing_yaw() {
        assert_eq!(Facing::Right.yaw_degrees(), 0.0);
        assert_eq!(Facing::Left.yaw_degrees(), 180.0);
        assert_eq!(Facing::from_horizontal(0.05), None);
        assert_eq!(Facing::from_horizontal(-1.0), Some(Facing::Left));
    }

    #[test]
    fn test_leg_collider_follows_front_leg() {
        let mut physics = PhysicsWorld::new();
        let mut skeleton = spawn(&mut physics);
        let legs = SlotSet::from(vec![SlotKind::FrontLeg, SlotKind::BackLeg]);
        let leg = part("leg", legs);

        assert!(physics.is_collider_enabled(skeleton.skull_collider));
        assert!(!physics.is_collider_enabled(skeleton.leg_collider));

        assert!(skeleton.try_add_limb(&torso(), &mut physics));
        assert!(!physics.is_collider_enabled(skeleton.leg_collider));

        assert!(skeleton.try_add_limb(&leg, &mut physics));
        assert!(physics.is_collider_enabled(skeleton.leg_collider));

        assert!(skeleton.try_add_limb(&leg, &mut physics));
        skeleton.remove_limb(SlotKind::BackLeg, &mut physics);
        assert!(physics.is_collider_enabled(skeleton.leg_collider));

        skeleton.remove_limb(SlotKind::FrontLeg, &mut physics);
        assert!(!physics.is_collider_enabled(skeleton.leg_collider));
    }

    #[test]
    fn test_animator_tracks_attach() {
        let mut physics = PhysicsWorld::new();
        let mut skeleton = spawn(&mut physics);

        skeleton.try_add_limb(&torso(), &mut physics);
        assert_eq!(
            skeleton.animator().representation(),
            Some(Representation::TorsoOnly)
        );
    }

    #[test]
    fn test_face_mirrors_model() {
        let mut physics = PhysicsWorld::new();
        let mut skeleton = spawn(&mut physics);

        skeleton.face_toward(-1.0);
        assert_eq!(skeleton.facing(), Facing::Left);
        assert!(skeleton.assembly().is_mirrored());
        assert!(skeleton.animator().is_mirrored());

        skeleton.face_toward(0.0);
        assert_eq!(skeleton.facing(), Facing::Left);

        skeleton.face(Facing::Right);
        assert!(!skeleton.assembly().is_mirrored());
    }

    #[test]
    fn test_owns_colliders() {
        let mut physics = PhysicsWorld::new();
        let skeleton = spawn(&mut physics);
        assert!(skeleton.owns_collider(skeleton.skull_collider));
        assert!(skeleton.owns_collider(skeleton.leg_collider));
    }
}
