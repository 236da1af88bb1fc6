use rapier2d::prelude::*;
use std::sync::{Arc, Mutex};

/// Collision groups for filtering what objects can collide with each other
///
/// The skeleton only ever touches the ground and pickup sensors; loose limbs
/// only land on the ground until they are collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroups {
    /// Skull and torso body of the assembled skeleton
    Skeleton = 0b0000_0001,

    /// Leg collider, only enabled once a front leg is attached
    Legs = 0b0000_0010,

    /// Solid body of a launched limb pickup
    Limb = 0b0000_0100,

    /// Trigger zone around a limb pickup
    LimbSensor = 0b0000_1000,

    /// Static ground and platforms
    Ground = 0b0001_0000,
}

impl CollisionGroups {
    /// Convert to rapier2d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let memberships = Group::from_bits_truncate(self as u32);

        let filter = match self {
            CollisionGroups::Skeleton => Group::from_bits_truncate(
                CollisionGroups::Ground as u32 | CollisionGroups::LimbSensor as u32,
            ),

            CollisionGroups::Legs => Group::from_bits_truncate(CollisionGroups::Ground as u32),

            CollisionGroups::Limb => Group::from_bits_truncate(CollisionGroups::Ground as u32),

            // Sensors only report the skeleton walking through them
            CollisionGroups::LimbSensor => {
                Group::from_bits_truncate(CollisionGroups::Skeleton as u32)
            }

            CollisionGroups::Ground => Group::from_bits_truncate(
                CollisionGroups::Skeleton as u32
                    | CollisionGroups::Legs as u32
                    | CollisionGroups::Limb as u32,
            ),
        };

        InteractionGroups::new(memberships, filter)
    }
}

/// Custom collision event for game logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEvent {
    /// Two colliders started touching
    Started {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
    },

    /// Two colliders stopped touching
    Stopped {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
    },
}

impl CollisionEvent {
    /// Both colliders involved in the event
    pub fn colliders(&self) -> (ColliderHandle, ColliderHandle) {
        match *self {
            CollisionEvent::Started {
                collider1,
                collider2,
            }
            | CollisionEvent::Stopped {
                collider1,
                collider2,
            } => (collider1, collider2),
        }
    }

    /// If this event involves `collider`, return the other collider
    pub fn other(&self, collider: ColliderHandle) -> Option<ColliderHandle> {
        let (a, b) = self.colliders();
        if a == collider {
            Some(b)
        } else if b == collider {
            Some(a)
        } else {
            None
        }
    }
}

/// Queue for storing collision events during physics step
pub struct CollisionEventQueue {
    events: Arc<Mutex<Vec<CollisionEvent>>>,
}

impl CollisionEventQueue {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::with_capacity(16))),
        }
    }

    /// Clear all events (call at start of physics step)
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    /// Get all collision events from this frame
    pub fn events(&self) -> Vec<CollisionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn push(&self, event: CollisionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Default for CollisionEventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for CollisionEventQueue {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: rapier2d::prelude::CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        match event {
            rapier2d::prelude::CollisionEvent::Started(h1, h2, _flags) => {
                self.push(CollisionEvent::Started {
                    collider1: h1,
                    collider2: h2,
                });
            }
            rapier2d::prelude::CollisionEvent::Stopped(h1, h2, _flags) => {
                self.push(CollisionEvent::Stopped {
                    collider1: h1,
                    collider2: h2,
                });
            }
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}
