use rapier2d::prelude::*;

use super::collision::{CollisionEvent as GameCollisionEvent, CollisionEventQueue};

/// Physics world wrapping the rapier2d pipeline
///
/// The assembly core never touches this directly; characters and pickups
/// push collider toggles and impulses into it from the outside.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    collision_event_queue: CollisionEventQueue,
}

impl PhysicsWorld {
    /// Create a new physics world with default settings
    pub fn new() -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = 1.0 / 60.0;

        Self {
            gravity: vector![0.0, -9.81],
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            collision_event_queue: CollisionEventQueue::new(),
        }
    }

    /// Step the physics simulation forward by one timestep
    pub fn step(&mut self) {
        self.collision_event_queue.clear();

        let event_handler = &self.collision_event_queue;

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            event_handler,
        );
    }

    /// Add a rigid body to the physics world
    pub fn add_rigid_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(body)
    }

    /// Add a collider attached to a rigid body
    pub fn add_collider(
        &mut self,
        collider: Collider,
        parent_handle: RigidBodyHandle,
    ) -> ColliderHandle {
        self.collider_set
            .insert_with_parent(collider, parent_handle, &mut self.rigid_body_set)
    }

    /// Remove a rigid body and all its attached colliders
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    /// Get a reference to a rigid body
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Get a reference to a collider
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Enable or disable a collider (no-op for unknown handles)
    pub fn set_collider_enabled(&mut self, handle: ColliderHandle, enabled: bool) {
        if let Some(collider) = self.collider_set.get_mut(handle) {
            collider.set_enabled(enabled);
        }
    }

    /// Check whether a collider exists and is enabled
    pub fn is_collider_enabled(&self, handle: ColliderHandle) -> bool {
        self.collider_set
            .get(handle)
            .map(|collider| collider.is_enabled())
            .unwrap_or(false)
    }

    /// Apply a one-off impulse to a rigid body
    pub fn apply_impulse(&mut self, handle: RigidBodyHandle, impulse: glam::Vec2) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.apply_impulse(vector![impulse.x, impulse.y], true);
        }
    }

    /// Stop simulating a body and pin it in place at a new position
    pub fn freeze_body_at(&mut self, handle: RigidBodyHandle, position: glam::Vec2) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_body_type(RigidBodyType::Fixed, true);
            body.set_linvel(vector![0.0, 0.0], true);
            body.set_translation(vector![position.x, position.y], true);
        }
    }

    /// Translation of a rigid body
    pub fn body_position(&self, handle: RigidBodyHandle) -> Option<glam::Vec2> {
        self.rigid_body_set.get(handle).map(|body| {
            let pos = body.translation();
            glam::Vec2::new(pos.x, pos.y)
        })
    }

    /// Get all collision events from this frame
    pub fn get_collision_events(&self) -> Vec<GameCollisionEvent> {
        self.collision_event_queue.events()
    }

    /// Number of live rigid bodies
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
