// Composite representation lookup
//
// The representation is a pure function of slot occupancy. Every one of
// the 128 possible occupancy masks has a table entry; only twelve of them
// can come out of the attach rules, one per representation.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::slot::SlotKind;
use crate::engine::assets::{AssetHandle, ControllerHandle};

const TORSO: u8 = SlotKind::Torso.bit();
const FRONT_ARM: u8 = SlotKind::FrontArm.bit();
const BACK_ARM: u8 = SlotKind::BackArm.bit();
const FRONT_LEG: u8 = SlotKind::FrontLeg.bit();
const BACK_LEG: u8 = SlotKind::BackLeg.bit();
const NECK_ARM: u8 = SlotKind::NeckArm.bit();
const NECK_LEG: u8 = SlotKind::NeckLeg.bit();

const LIMBS: u8 = FRONT_ARM | BACK_ARM | FRONT_LEG | BACK_LEG;
const NECKS: u8 = NECK_ARM | NECK_LEG;
const MASK: u8 = 0x7f;
const STATE_COUNT: usize = 1 << 7;

/// Occupancy vector packed into a 7-bit mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Occupancy(u8);

impl Occupancy {
    pub const EMPTY: Occupancy = Occupancy(0);
    pub const ALL: Occupancy = Occupancy(MASK);

    /// Build from raw bits, ignoring anything above bit 6
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & MASK)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, kind: SlotKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub const fn with(self, kind: SlotKind) -> Self {
        Self(self.0 | kind.bit())
    }

    pub const fn without(self, kind: SlotKind) -> Self {
        Self(self.0 & !kind.bit())
    }

    /// Whether the attach rules can produce this occupancy
    ///
    /// Without a torso only the skull and at most one neck part exist; with
    /// a torso the neck slots stay empty and each back limb needs its front.
    pub const fn is_reachable(self) -> bool {
        let bits = self.0;
        if bits & TORSO == 0 {
            bits & LIMBS == 0 && bits & NECKS != NECKS
        } else {
            bits & NECKS == 0
                && (bits & BACK_ARM == 0 || bits & FRONT_ARM != 0)
                && (bits & BACK_LEG == 0 || bits & FRONT_LEG != 0)
        }
    }

    /// Every possible occupancy mask
    pub fn all_states() -> impl Iterator<Item = Occupancy> {
        (0..STATE_COUNT as u8).map(Occupancy)
    }
}

/// Composite visual/animation bundle selected from slot occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    HeadOnly,
    HeadNeckArm,
    HeadNeckLeg,
    TorsoOnly,
    TorsoOneArm,
    TorsoTwoArm,
    TorsoOneLeg,
    TorsoTwoLeg,
    OneLegOneArm,
    OneLegTwoArm,
    TwoLegOneArm,
    FullBody,
}

impl Representation {
    pub const ALL: [Representation; 12] = [
        Representation::HeadOnly,
        Representation::HeadNeckArm,
        Representation::HeadNeckLeg,
        Representation::TorsoOnly,
        Representation::TorsoOneArm,
        Representation::TorsoTwoArm,
        Representation::TorsoOneLeg,
        Representation::TorsoTwoLeg,
        Representation::OneLegOneArm,
        Representation::OneLegTwoArm,
        Representation::TwoLegOneArm,
        Representation::FullBody,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Representation::HeadOnly => "head_only",
            Representation::HeadNeckArm => "head_neck_arm",
            Representation::HeadNeckLeg => "head_neck_leg",
            Representation::TorsoOnly => "torso_only",
            Representation::TorsoOneArm => "torso_one_arm",
            Representation::TorsoTwoArm => "torso_two_arm",
            Representation::TorsoOneLeg => "torso_one_leg",
            Representation::TorsoTwoLeg => "torso_two_leg",
            Representation::OneLegOneArm => "one_leg_one_arm",
            Representation::OneLegTwoArm => "one_leg_two_arm",
            Representation::TwoLegOneArm => "two_leg_one_arm",
            Representation::FullBody => "full_body",
        }
    }

    /// Controller asset name used when configuration does not bind one
    pub fn default_controller(self) -> String {
        format!("{}.controller", self.name())
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const fn decide(bits: u8) -> Representation {
    if bits & TORSO == 0 {
        return if bits & NECK_ARM != 0 {
            Representation::HeadNeckArm
        } else if bits & NECK_LEG != 0 {
            Representation::HeadNeckLeg
        } else {
            Representation::HeadOnly
        };
    }

    let back_leg = bits & BACK_LEG != 0;
    let front_leg = bits & FRONT_LEG != 0;

    if bits & BACK_ARM != 0 {
        if back_leg {
            Representation::FullBody
        } else if front_leg {
            Representation::OneLegTwoArm
        } else {
            Representation::TorsoTwoArm
        }
    } else if bits & FRONT_ARM != 0 {
        if back_leg {
            Representation::TwoLegOneArm
        } else if front_leg {
            Representation::OneLegOneArm
        } else {
            Representation::TorsoOneArm
        }
    } else if back_leg {
        Representation::TorsoTwoLeg
    } else if front_leg {
        Representation::TorsoOneLeg
    } else {
        Representation::TorsoOnly
    }
}

const fn build_table() -> [Representation; STATE_COUNT] {
    let mut table = [Representation::HeadOnly; STATE_COUNT];
    let mut bits = 0;
    while bits < STATE_COUNT {
        table[bits] = decide(bits as u8);
        bits += 1;
    }
    table
}

static TABLE: [Representation; STATE_COUNT] = build_table();

/// Look up the representation for an occupancy mask
///
/// Total over all masks. Callers are expected to pass only reachable
/// occupancies; see [`Occupancy::is_reachable`].
pub fn representation_for(occupancy: Occupancy) -> Representation {
    TABLE[occupancy.bits() as usize]
}

/// Masks the attach rules can never produce
pub fn unreachable_states() -> impl Iterator<Item = Occupancy> {
    Occupancy::all_states().filter(|state| !state.is_reachable())
}

/// Resolved representation plus the animator controller bound to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepresentationHandle {
    pub representation: Representation,
    pub controller: ControllerHandle,
}

/// Maps occupancy to a representation handle
#[derive(Debug, Clone)]
pub struct CompositeStateResolver {
    controllers: [ControllerHandle; 12],
}

impl CompositeStateResolver {
    /// Build a resolver from one controller name per representation
    pub fn new<F>(controller_name: F) -> Self
    where
        F: Fn(Representation) -> String,
    {
        Self {
            controllers: Representation::ALL
                .map(|representation| AssetHandle::named(&controller_name(representation))),
        }
    }

    pub fn resolve(&self, occupancy: Occupancy) -> RepresentationHandle {
        let representation = representation_for(occupancy);
        RepresentationHandle {
            representation,
            controller: self.controller(representation),
        }
    }

    pub fn controller(&self, representation: Representation) -> ControllerHandle {
        self.controllers[representation.index()]
    }
}

impl Default for CompositeStateResolver {
    fn default() -> Self {
        Self::new(Representation::default_controller)
    }
}
