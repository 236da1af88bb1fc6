// Game layer
//
// - Slot assembly core
// - Skeleton character and animator binding
// - Collectible pickups
// - Demo playground wiring them to physics

pub mod assembly;
pub mod characters;
pub mod pickup;
pub mod playground;
