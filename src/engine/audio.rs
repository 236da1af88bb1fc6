// Sound sets and one-shot playback timing
//
// Actual mixing is handled outside this crate; here we only pick clips
// and track how long a fired clip keeps playing.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A single authored sound clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundClip {
    pub name: String,
    /// Playback length in seconds
    pub duration: f32,
}

/// A pool of interchangeable clips, one of which is chosen per play
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SoundSet {
    #[serde(default)]
    pub clips: Vec<SoundClip>,
}

impl SoundSet {
    pub fn new(clips: Vec<SoundClip>) -> Self {
        Self { clips }
    }

    /// Pick a random clip from the set
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&SoundClip> {
        self.clips.choose(rng)
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

/// Playback of a single fired clip
#[derive(Debug, Clone)]
pub struct OneShot {
    clip: String,
    remaining: f32,
}

impl OneShot {
    /// Start playing a clip
    pub fn play(clip: &SoundClip) -> Self {
        log::debug!("Playing one-shot '{}' ({:.2}s)", clip.name, clip.duration);
        Self {
            clip: clip.name.clone(),
            remaining: clip.duration.max(0.0),
        }
    }

    /// Advance playback by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    pub fn is_playing(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn clip(&self) -> &str {
        &self.clip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn clip(name: &str, duration: f32) -> SoundClip {
        SoundClip {
            name: name.to_string(),
            duration,
        }
    }

    #[test]
    fn test_pick_from_set() {
        let set = SoundSet::new(vec![clip("rattle_a", 0.4), clip("rattle_b", 0.6)]);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..10 {
            let picked = set.pick(&mut rng).unwrap();
            assert!(picked.name.starts_with("rattle_"));
        }
    }

    #[test]
    fn test_pick_from_empty_set() {
        let set = SoundSet::default();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(set.pick(&mut rng).is_none());
    }

    #[test]
    fn test_one_shot_finishes() {
        let mut shot = OneShot::play(&clip("pop", 0.25));
        assert!(shot.is_playing());

        shot.update(0.1);
        assert!(shot.is_playing());

        shot.update(0.2);
        assert!(!shot.is_playing());
        assert_eq!(shot.clip(), "pop");
    }
}
