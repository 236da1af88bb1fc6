// Pickup lifecycle around a single part definition

use std::sync::Arc;

use glam::Vec2;
use rand::Rng;

use crate::core::math::direction_from_degrees;
use crate::engine::audio::OneShot;
use crate::game::assembly::{AssemblyController, PartDefinition};

/// Where a pickup is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupState {
    /// Launched and falling, not collectable yet
    Airborne,
    /// Resting above the ground, waiting for the skeleton
    Hovering,
    /// Attached; hidden while the collection sound plays out
    Collecting,
    /// Attach was refused, collectable again next tick
    Cooldown,
    /// Finished, the owner should drop it
    Despawned,
}

/// A launched part that the skeleton can walk into
#[derive(Debug)]
pub struct Collectable {
    part: Arc<PartDefinition>,
    state: PickupState,
    position: Vec2,
    sprite_visible: bool,
    collider_enabled: bool,
    playback: Option<OneShot>,
}

impl Collectable {
    /// Create a pickup at `position` with a randomized launch
    ///
    /// Returns the pickup and the impulse to give its body.
    pub fn spawn<R: Rng + ?Sized>(
        part: Arc<PartDefinition>,
        position: Vec2,
        rng: &mut R,
    ) -> (Self, Vec2) {
        let angle = part.launch_angle.sample(rng);
        let force = part.launch_force.sample(rng);
        let impulse = direction_from_degrees(angle) * force;

        log::debug!(
            "Launched part '{}' at {:.1} degrees with force {:.2}",
            part.id,
            angle,
            force
        );

        let pickup = Self {
            part,
            state: PickupState::Airborne,
            position,
            sprite_visible: true,
            collider_enabled: true,
            playback: None,
        };
        (pickup, impulse)
    }

    /// The pickup touched the ground at `landed_at`
    ///
    /// Persistent parts settle `hover_height` above the contact point and
    /// become collectable; the rest despawn. Only the first contact counts.
    pub fn on_ground_contact(&mut self, landed_at: Vec2) -> PickupState {
        if self.state != PickupState::Airborne {
            return self.state;
        }

        if self.part.persists {
            self.position = landed_at + Vec2::Y * self.part.hover_height;
            self.state = PickupState::Hovering;
        } else {
            self.state = PickupState::Despawned;
        }
        self.state
    }

    /// The skeleton walked into the pickup
    ///
    /// Offers the part to `controller` once. Returns whether it was taken.
    pub fn on_collector_contact<R: Rng + ?Sized>(
        &mut self,
        controller: &mut AssemblyController,
        rng: &mut R,
    ) -> bool {
        if !self.can_collect() {
            return false;
        }

        // Stop collecting before the attach so a second contact can't re-enter
        self.state = PickupState::Cooldown;
        if !controller.try_attach(&self.part) {
            return false;
        }

        self.sprite_visible = false;
        self.collider_enabled = false;
        self.playback = self
            .part
            .collection_sounds
            .as_ref()
            .and_then(|sounds| sounds.pick(rng))
            .map(OneShot::play);

        self.state = if self.playback.is_some() {
            PickupState::Collecting
        } else {
            PickupState::Despawned
        };

        log::info!("Collected part '{}'", self.part.id);
        true
    }

    /// Advance cooldown and collection playback by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        match self.state {
            PickupState::Cooldown => self.state = PickupState::Hovering,
            PickupState::Collecting => {
                let finished = match self.playback.as_mut() {
                    Some(playback) => {
                        playback.update(dt);
                        !playback.is_playing()
                    }
                    None => true,
                };
                if finished {
                    self.playback = None;
                    self.state = PickupState::Despawned;
                }
            }
            _ => {}
        }
    }

    pub fn can_collect(&self) -> bool {
        self.state == PickupState::Hovering
    }

    pub fn state(&self) -> PickupState {
        self.state
    }

    pub fn is_despawned(&self) -> bool {
        self.state == PickupState::Despawned
    }

    pub fn part(&self) -> &Arc<PartDefinition> {
        &self.part
    }

    /// Resting position once hovering, launch point before that
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn sprite_visible(&self) -> bool {
        self.sprite_visible
    }

    pub fn collider_enabled(&self) -> bool {
        self.collider_enabled
    }

    /// Name of the collection clip still playing
    pub fn playing_clip(&self) -> Option<&str> {
        self.playback.as_ref().map(OneShot::clip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::FloatRange;
    use crate::engine::audio::{SoundClip, SoundSet};
    use crate::engine::scene::Prefab;
    use crate::game::assembly::{AssemblyConfig, SlotKind, SlotSet};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rattle() -> SoundSet {
        SoundSet::new(vec![SoundClip {
            name: "rattle".to_string(),
            duration: 0.5,
        }])
    }

    fn leg() -> Arc<PartDefinition> {
        Arc::new(
            PartDefinition::new(
                "leg",
                SlotSet::from(vec![SlotKind::FrontLeg, SlotKind::BackLeg]),
                Prefab::new("Leg"),
            )
            .with_sounds(rattle())
            .with_hover_height(0.4),
        )
    }

    fn torso() -> Arc<PartDefinition> {
        Arc::new(PartDefinition::new(
            "torso",
            SlotSet::EMPTY.with(SlotKind::Torso),
            Prefab::new("Torso"),
        ))
    }

    fn arm_definition() -> PartDefinition {
        PartDefinition::new(
            "arm",
            SlotSet::EMPTY.with(SlotKind::FrontArm),
            Prefab::new("Arm"),
        )
    }

    fn landed(part: Arc<PartDefinition>, rng: &mut StdRng) -> Collectable {
        let (mut pickup, _) = Collectable::spawn(part, Vec2::ZERO, rng);
        pickup.on_ground_contact(Vec2::new(1.0, 0.0));
        pickup
    }

    #[test]
    fn test_launch_impulse_within_ranges() {
        let (forces, angles) = (FloatRange::new(2.0, 3.0), FloatRange::new(60.0, 120.0));
        let part = Arc::new(arm_definition().with_launch(forces, angles));
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..20 {
            let (pickup, impulse) = Collectable::spawn(Arc::clone(&part), Vec2::ZERO, &mut rng);
            assert_eq!(pickup.state(), PickupState::Airborne);

            let force = impulse.length();
            assert!((2.0 - 1e-4..=3.0 + 1e-4).contains(&force));
            let angle = impulse.y.atan2(impulse.x).to_degrees();
            assert!((60.0 - 1e-3..=120.0 + 1e-3).contains(&angle));
        }
    }

    #[test]
    fn test_constant_launch_straight_up() {
        let (force, angle) = (FloatRange::constant(5.0), FloatRange::constant(90.0));
        let part = arm_definition().with_launch(force, angle);
        let mut rng = StdRng::seed_from_u64(1);
        let (_, impulse) = Collectable::spawn(Arc::new(part), Vec2::ZERO, &mut rng);

        assert_relative_eq!(impulse.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(impulse.y, 5.0, epsilon = 1e-5);
    }

    #[test]
    fn test_ground_contact_hovers() {
        let mut rng = StdRng::seed_from_u64(2);
        let pickup = landed(leg(), &mut rng);

        assert_eq!(pickup.state(), PickupState::Hovering);
        assert!(pickup.can_collect());
        assert_relative_eq!(pickup.position().y, 0.4);
        assert_relative_eq!(pickup.position().x, 1.0);
    }

    #[test]
    fn test_non_persistent_despawns_on_ground() {
        let mut rng = StdRng::seed_from_u64(2);
        let dust = PartDefinition::new(
            "dust",
            SlotSet::EMPTY.with(SlotKind::FrontArm),
            Prefab::new("Dust"),
        );
        let pickup = landed(Arc::new(dust.with_persists(false)), &mut rng);
        assert!(pickup.is_despawned());
    }

    #[test]
    fn test_airborne_not_collectable() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut controller = AssemblyController::new(&AssemblyConfig::default());
        let (mut pickup, _) = Collectable::spawn(torso(), Vec2::ZERO, &mut rng);

        assert!(!pickup.on_collector_contact(&mut controller, &mut rng));
        assert!(!controller.registry().is_occupied(SlotKind::Torso));
        assert_eq!(pickup.state(), PickupState::Airborne);
    }

    #[test]
    fn test_collect_plays_then_despawns() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut controller = AssemblyController::new(&AssemblyConfig::default());
        controller.try_attach(&torso());

        let mut pickup = landed(leg(), &mut rng);
        assert!(pickup.on_collector_contact(&mut controller, &mut rng));

        assert_eq!(pickup.state(), PickupState::Collecting);
        assert!(!pickup.sprite_visible());
        assert!(!pickup.collider_enabled());
        assert_eq!(pickup.playing_clip(), Some("rattle"));
        assert!(controller.registry().is_occupied(SlotKind::FrontLeg));

        // A second contact while collecting does nothing
        assert!(!pickup.on_collector_contact(&mut controller, &mut rng));
        assert!(!controller.registry().is_occupied(SlotKind::BackLeg));

        pickup.tick(0.3);
        assert_eq!(pickup.state(), PickupState::Collecting);
        pickup.tick(0.3);
        assert!(pickup.is_despawned());
    }

    #[test]
    fn test_collect_without_sounds_despawns_at_once() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut controller = AssemblyController::new(&AssemblyConfig::default());
        let mut pickup = landed(torso(), &mut rng);

        assert!(pickup.on_collector_contact(&mut controller, &mut rng));
        assert!(pickup.is_despawned());
        assert!(pickup.playing_clip().is_none());
    }

    #[test]
    fn test_failed_attach_recovers_next_tick() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut controller = AssemblyController::new(&AssemblyConfig::default());
        controller.try_attach(&torso());

        let mut pickup = landed(torso(), &mut rng);
        assert!(!pickup.on_collector_contact(&mut controller, &mut rng));
        assert_eq!(pickup.state(), PickupState::Cooldown);
        assert!(!pickup.can_collect());
        assert!(pickup.sprite_visible());

        pickup.tick(crate::engine::game_loop::FIXED_TIMESTEP);
        assert!(pickup.can_collect());
    }
}
