// Loose body parts waiting to be collected

pub mod collectable;

pub use collectable::{Collectable, PickupState};
