// Math utilities and helper functions

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Unit vector pointing `degrees` counter-clockwise from +X
pub fn direction_from_degrees(degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians())
}

/// Closed interval authored as `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct FloatRange {
    pub min: f32,
    pub max: f32,
}

impl FloatRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Degenerate range holding a single value
    pub const fn constant(value: f32) -> Self {
        Self::new(value, value)
    }

    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }

    /// Check that the whole range lies inside `[lo, hi]`
    pub fn within(&self, lo: f32, hi: f32) -> bool {
        self.is_ordered() && self.min >= lo && self.max <= hi
    }

    /// Uniformly sample a value in the range
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        lerp(self.min, self.max, rng.gen::<f32>())
    }
}

impl From<[f32; 2]> for FloatRange {
    fn from([min, max]: [f32; 2]) -> Self {
        Self::new(min, max)
    }
}

impl From<FloatRange> for [f32; 2] {
    fn from(range: FloatRange) -> Self {
        [range.min, range.max]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
    }

    #[test]
    fn test_direction_from_degrees() {
        let right = direction_from_degrees(0.0);
        assert_relative_eq!(right.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(right.y, 0.0, epsilon = 1e-6);

        let up = direction_from_degrees(90.0);
        assert_relative_eq!(up.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(up.y, 1.0, epsilon = 1e-6);

        let left = direction_from_degrees(180.0);
        assert_relative_eq!(left.x, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_range_sample_stays_inside() {
        let mut rng = StdRng::seed_from_u64(7);
        let range = FloatRange::new(2.0, 5.0);
        for _ in 0..100 {
            let value = range.sample(&mut rng);
            assert!((2.0..=5.0).contains(&value));
        }
    }

    #[test]
    fn test_constant_range() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(FloatRange::constant(3.0).sample(&mut rng), 3.0);
    }

    #[test]
    fn test_range_within() {
        assert!(FloatRange::new(10.0, 170.0).within(0.0, 180.0));
        assert!(!FloatRange::new(-5.0, 90.0).within(0.0, 180.0));
        assert!(!FloatRange::new(90.0, 45.0).within(0.0, 180.0));
    }

    #[test]
    fn test_range_from_array() {
        let range: FloatRange = toml::from_str::<Wrapper>("r = [1.5, 4.0]")
            .map(|w| w.r)
            .unwrap();
        assert_eq!(range, FloatRange::new(1.5, 4.0));
    }

    #[derive(Deserialize)]
    struct Wrapper {
        r: FloatRange,
    }
}
