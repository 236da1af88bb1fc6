// Demo scene: one skeleton, a floor and launched pickups

use std::collections::HashSet;
use std::sync::Arc;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engine::physics::{
    body::presets, ColliderHandle, CollisionEvent, PhysicsWorld, RigidBodyHandle,
};
use crate::game::assembly::{AssemblyConfig, PartDefinition};
use crate::game::characters::{SkeletonCharacter, SkeletonStats};
use crate::game::pickup::{Collectable, PickupState};

const GROUND_WIDTH: f32 = 40.0;
const GROUND_HEIGHT: f32 = 1.0;
const PICKUP_RADIUS: f32 = 0.25;
const PICKUP_SENSOR_RADIUS: f32 = 0.6;

/// Identifier for a live pickup
pub type PickupId = u32;

#[derive(Debug)]
struct PickupEntry {
    id: PickupId,
    pickup: Collectable,
    body: RigidBodyHandle,
    collider: ColliderHandle,
    sensor: ColliderHandle,
}

/// Routes physics contacts between the skeleton, the ground and pickups
pub struct Playground {
    physics: PhysicsWorld,
    ground_collider: ColliderHandle,
    character: SkeletonCharacter,
    pickups: Vec<PickupEntry>,
    /// Pickup sensors the skeleton is currently inside
    overlapping: HashSet<ColliderHandle>,
    next_pickup_id: PickupId,
    rng: StdRng,
    collected: usize,
}

impl Playground {
    /// Build the scene with the skeleton standing at the origin
    pub fn new(config: &AssemblyConfig, seed: u64) -> Self {
        let mut physics = PhysicsWorld::new();

        let ground_body = physics.add_rigid_body(presets::ground_body(0.0, -GROUND_HEIGHT / 2.0));
        let ground_collider = physics.add_collider(
            presets::ground_collider(GROUND_WIDTH, GROUND_HEIGHT),
            ground_body,
        );

        let stats = SkeletonStats::default();
        let character = SkeletonCharacter::new(
            "Skeleton",
            config,
            stats,
            &mut physics,
            0.0,
            stats.skull_radius,
        );

        Self {
            physics,
            ground_collider,
            character,
            pickups: Vec::new(),
            overlapping: HashSet::new(),
            next_pickup_id: 0,
            rng: StdRng::seed_from_u64(seed),
            collected: 0,
        }
    }

    /// Launch a pickup for `part` from `(x, y)`
    pub fn spawn_pickup(&mut self, part: Arc<PartDefinition>, x: f32, y: f32) -> PickupId {
        let (pickup, impulse) = Collectable::spawn(part, Vec2::new(x, y), &mut self.rng);

        let body = self.physics.add_rigid_body(presets::limb_body(x, y));
        let collider = self
            .physics
            .add_collider(presets::limb_collider(PICKUP_RADIUS), body);
        let sensor = self
            .physics
            .add_collider(presets::limb_sensor(PICKUP_SENSOR_RADIUS), body);
        self.physics.apply_impulse(body, impulse);

        let id = self.next_pickup_id;
        self.next_pickup_id += 1;
        self.pickups.push(PickupEntry {
            id,
            pickup,
            body,
            collider,
            sensor,
        });
        id
    }

    /// Advance one fixed step
    pub fn step(&mut self, dt: f32) {
        self.physics.step();

        for event in self.physics.get_collision_events() {
            match event {
                CollisionEvent::Started { .. } => {
                    let _ = self.route(event);
                }
                CollisionEvent::Stopped { .. } => self.track_overlap(event, false),
            }
        }

        for entry in &mut self.pickups {
            entry.pickup.tick(dt);
        }
        self.remove_despawned();

        self.character.update(dt);
    }

    /// Handle a contact that started this step, returns whether a part was collected
    fn route(&mut self, event: CollisionEvent) -> bool {
        let Some(index) = self.pickups.iter().position(|entry| {
            event.other(entry.collider).is_some() || event.other(entry.sensor).is_some()
        }) else {
            return false;
        };

        let entry = &mut self.pickups[index];

        if event.other(entry.collider) == Some(self.ground_collider) {
            let landed_at = self
                .physics
                .body_position(entry.body)
                .unwrap_or_else(|| entry.pickup.position());
            if entry.pickup.on_ground_contact(landed_at) != PickupState::Hovering {
                return false;
            }
            self.physics
                .freeze_body_at(entry.body, entry.pickup.position());

            // Rising into a skeleton that is already inside the sensor counts as touching it
            if !self.overlapping.contains(&entry.sensor) {
                return false;
            }
            return self.collect(index);
        }

        let touched_skeleton = event
            .other(entry.sensor)
            .is_some_and(|other| self.character.owns_collider(other));
        if !touched_skeleton {
            return false;
        }

        self.track_overlap(event, true);
        self.collect(index)
    }

    fn track_overlap(&mut self, event: CollisionEvent, touching: bool) {
        let Some(sensor) = self
            .pickups
            .iter()
            .map(|entry| entry.sensor)
            .find(|sensor| {
                event
                    .other(*sensor)
                    .is_some_and(|other| self.character.owns_collider(other))
            })
        else {
            return;
        };

        if touching {
            self.overlapping.insert(sensor);
        } else {
            self.overlapping.remove(&sensor);
        }
    }

    fn collect(&mut self, index: usize) -> bool {
        let entry = &mut self.pickups[index];
        let collected = entry
            .pickup
            .on_collector_contact(self.character.assembly_mut(), &mut self.rng);
        self.character.sync(&mut self.physics);

        if collected {
            self.physics.set_collider_enabled(entry.collider, false);
            self.physics.set_collider_enabled(entry.sensor, false);
            self.overlapping.remove(&entry.sensor);
            self.collected += 1;
        }
        collected
    }

    fn remove_despawned(&mut self) {
        let physics = &mut self.physics;
        let overlapping = &mut self.overlapping;
        self.pickups.retain(|entry| {
            if entry.pickup.is_despawned() {
                physics.remove_rigid_body(entry.body);
                overlapping.remove(&entry.sensor);
                log::debug!(
                    "Despawned pickup {} ('{}')",
                    entry.id,
                    entry.pickup.part().id
                );
                false
            } else {
                true
            }
        });
    }

    /// Offer a pickup to the skeleton directly, as if it had walked into it
    pub fn touch_pickup(&mut self, id: PickupId) -> bool {
        let Some(entry) = self.pickups.iter().find(|entry| entry.id == id) else {
            return false;
        };
        let event = CollisionEvent::Started {
            collider1: entry.sensor,
            collider2: self.character.skull_collider,
        };
        self.route(event)
    }

    /// Report that a pickup hit the ground, as the physics step would
    pub fn land_pickup(&mut self, id: PickupId) {
        let Some(entry) = self.pickups.iter().find(|entry| entry.id == id) else {
            return;
        };
        let event = CollisionEvent::Started {
            collider1: entry.collider,
            collider2: self.ground_collider,
        };
        let _ = self.route(event);
    }

    pub fn pickup_state(&self, id: PickupId) -> Option<PickupState> {
        self.pickups
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.pickup.state())
    }

    pub fn pickup_count(&self) -> usize {
        self.pickups.len()
    }

    /// Number of pickups the skeleton has taken
    pub fn collected(&self) -> usize {
        self.collected
    }

    pub fn character(&self) -> &SkeletonCharacter {
        &self.character
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::audio::{SoundClip, SoundSet};
    use crate::engine::game_loop::FIXED_TIMESTEP;
    use crate::engine::scene::Prefab;
    use crate::game::assembly::{Representation, SlotKind, SlotSet};

    fn part(id: &str, slots: SlotSet) -> Arc<PartDefinition> {
        Arc::new(
            PartDefinition::new(id, slots, Prefab::new(id))
                .with_hover_height(0.5)
                .with_sounds(SoundSet::new(vec![SoundClip {
                    name: "rattle".to_string(),
                    duration: 0.1,
                }])),
        )
    }

    fn torso_part() -> Arc<PartDefinition> {
        part("torso", SlotSet::EMPTY.with(SlotKind::Torso))
    }

    fn playground() -> Playground {
        Playground::new(&AssemblyConfig::default(), 42)
    }

    #[test]
    fn test_spawn_adds_bodies() {
        let mut playground = playground();
        let before = playground.physics().body_count();

        let id = playground.spawn_pickup(torso_part(), 2.0, 3.0);
        assert_eq!(playground.physics().body_count(), before + 1);
        assert_eq!(playground.pickup_state(id), Some(PickupState::Airborne));
    }

    #[test]
    fn test_land_then_collect() {
        let mut playground = playground();
        let id = playground.spawn_pickup(torso_part(), 2.0, 3.0);

        playground.land_pickup(id);
        assert_eq!(playground.pickup_state(id), Some(PickupState::Hovering));

        assert!(playground.touch_pickup(id));
        assert_eq!(playground.pickup_state(id), Some(PickupState::Collecting));
        assert_eq!(
            playground.character().assembly().current(),
            Representation::TorsoOnly
        );

        for _ in 0..10 {
            playground.step(FIXED_TIMESTEP);
        }
        assert_eq!(playground.pickup_state(id), None);
        assert_eq!(playground.collected(), 1);
    }

    #[test]
    fn test_rejected_pickup_stays() {
        let mut playground = playground();
        let torso = SlotSet::EMPTY.with(SlotKind::Torso);
        let first = playground.spawn_pickup(part("torso", torso), 2.0, 3.0);
        let second = playground.spawn_pickup(part("torso", torso), -2.0, 3.0);

        playground.land_pickup(first);
        playground.land_pickup(second);
        assert!(playground.touch_pickup(first));
        assert!(!playground.touch_pickup(second));
        assert_eq!(playground.pickup_state(second), Some(PickupState::Cooldown));

        playground.step(FIXED_TIMESTEP);
        assert_eq!(playground.pickup_state(second), Some(PickupState::Hovering));
    }

    #[test]
    fn test_front_leg_enables_leg_collider() {
        let mut playground = playground();
        let torso = playground.spawn_pickup(torso_part(), 1.0, 1.0);
        let front_leg = SlotSet::EMPTY.with(SlotKind::FrontLeg);
        let leg = playground.spawn_pickup(part("leg", front_leg), 1.0, 1.0);

        for id in [torso, leg] {
            playground.land_pickup(id);
            assert!(playground.touch_pickup(id));
        }

        let legs = playground.character().leg_collider;
        assert!(playground.physics().is_collider_enabled(legs));
    }

    #[test]
    fn test_landing_inside_sensor_collects() {
        let mut playground = playground();
        let id = playground.spawn_pickup(torso_part(), 0.0, 1.0);

        // Skeleton enters the sensor while the part is still falling
        assert!(!playground.touch_pickup(id));
        assert_eq!(playground.pickup_state(id), Some(PickupState::Airborne));

        playground.land_pickup(id);
        assert_eq!(playground.pickup_state(id), Some(PickupState::Collecting));
        assert_eq!(playground.collected(), 1);
    }
}
