// Skeleton slot assembly
//
// Parts are collected one at a time and snapped into a fixed set of slots.
// The character's representation is derived from which slots are filled.

pub mod config;
pub mod controller;
pub mod labeler;
pub mod observer;
pub mod part;
pub mod resolver;
pub mod slot;

pub use config::{AssemblyConfig, ConfigError, ControllerBinding, NeckPolicy};
pub use controller::{AssemblyController, AttachOutcome, RejectReason, LIMB_PRIORITY};
pub use labeler::{relabel_subtree, BACK_SUFFIX};
pub use observer::{ObserverList, SubscriptionId};
pub use part::{PartDefinition, PartError, PartInstance, PartLibrary, PartManifest};
pub use resolver::{
    representation_for, unreachable_states, CompositeStateResolver, Occupancy, Representation,
    RepresentationHandle,
};
pub use slot::{Slot, SlotKind, SlotLayout, SlotLayouts, SlotRegistry, SlotSet};
