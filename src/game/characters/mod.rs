// Character system
//
// The skeleton that walks around collecting parts:
// - Character body, colliders and facing
// - Physical dimensions
// - Animator binding driven by the assembly

pub mod animation;
pub mod character;
pub mod stats;

pub use animation::AnimatorBinding;
pub use character::{Facing, SkeletonCharacter};
pub use stats::{SkeletonStats, BASE_STATS};
