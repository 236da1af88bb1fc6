// Physics proxy using rapier2d

pub mod body;
mod collision;
mod world;

pub use body::{BodyBuilder, ColliderBuilder2D, ColliderHandle, RigidBodyHandle};
pub use collision::{CollisionEvent, CollisionGroups};
pub use world::PhysicsWorld;
