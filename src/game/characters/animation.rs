// Presentation-side binding from representation to animator controller

use std::cell::Cell;
use std::rc::Rc;

use crate::engine::assets::ControllerHandle;
use crate::game::assembly::{AssemblyController, Representation, SubscriptionId};

/// Keeps an animator in step with the skeleton's representation
///
/// Configuration-changed notifications only raise a flag; the new
/// controller is picked up on the next [`AnimatorBinding::sync`].
#[derive(Debug)]
pub struct AnimatorBinding {
    /// Set by the config-changed subscriber
    pending: Rc<Cell<bool>>,
    subscription: Option<SubscriptionId>,
    /// Currently bound animator controller
    controller: Option<ControllerHandle>,
    representation: Option<Representation>,
    /// Seconds since the controller was (re)bound
    playback_time: f32,
    /// Playback speed multiplier (1.0 = normal)
    playback_speed: f32,
    /// Whether the model is drawn mirrored
    mirrored: bool,
    rebind_count: u32,
}

impl Default for AnimatorBinding {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimatorBinding {
    pub fn new() -> Self {
        Self {
            pending: Rc::new(Cell::new(false)),
            subscription: None,
            controller: None,
            representation: None,
            playback_time: 0.0,
            playback_speed: 1.0,
            mirrored: false,
            rebind_count: 0,
        }
    }

    /// Subscribe to `assembly` and bind its current representation
    pub fn attach(&mut self, assembly: &mut AssemblyController) {
        if self.subscription.is_some() {
            return;
        }

        let pending = Rc::clone(&self.pending);
        self.subscription = Some(assembly.subscribe_config_changed(move || pending.set(true)));
        self.pending.set(true);
        self.sync(assembly);
    }

    /// Stop listening to `assembly`
    pub fn detach(&mut self, assembly: &mut AssemblyController) {
        if let Some(id) = self.subscription.take() {
            assembly.unsubscribe_config_changed(id);
        }
        self.pending.set(false);
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Rebind if a configuration change happened since the last sync
    ///
    /// Returns whether a rebind took place.
    pub fn sync(&mut self, assembly: &AssemblyController) -> bool {
        self.mirrored = assembly.is_mirrored();

        if !self.pending.replace(false) {
            return false;
        }

        let handle = assembly.representation();

        // Clearing first forces playback back to the entry state even
        // when the controller did not change
        self.controller = None;
        self.playback_time = 0.0;
        self.controller = Some(handle.controller);
        self.representation = Some(handle.representation);
        self.rebind_count += 1;

        log::debug!("Animator bound to {}", handle.representation);
        true
    }

    /// Advance playback (called every tick)
    pub fn update(&mut self, dt: f32) {
        if self.controller.is_some() {
            self.playback_time += dt * self.playback_speed;
        }
    }

    /// Set playback speed (1.0 = normal, 2.0 = double speed)
    pub fn set_playback_speed(&mut self, speed: f32) {
        self.playback_speed = speed.max(0.0);
    }

    pub fn controller(&self) -> Option<ControllerHandle> {
        self.controller
    }

    pub fn representation(&self) -> Option<Representation> {
        self.representation
    }

    pub fn playback_time(&self) -> f32 {
        self.playback_time
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// How many times a controller has been bound
    pub fn rebind_count(&self) -> u32 {
        self.rebind_count
    }
}
