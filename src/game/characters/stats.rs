// Physical dimensions of the skeleton character

/// Collider sizes for the skeleton, in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkeletonStats {
    /// Radius of the always-present skull collider
    pub skull_radius: f32,
    /// Width of the leg collider enabled by a front leg
    pub leg_width: f32,
    /// Height of the leg collider
    pub leg_height: f32,
}

/// The skeleton every scene spawns
pub const BASE_STATS: SkeletonStats = SkeletonStats {
    skull_radius: 0.35,
    leg_width: 0.4,
    leg_height: 1.0,
};

impl Default for SkeletonStats {
    fn default() -> Self {
        BASE_STATS
    }
}
