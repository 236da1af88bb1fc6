// Attach orchestration: slot priority, visuals, representation and signals

use std::fmt;
use std::sync::Arc;

use super::config::{AssemblyConfig, NeckPolicy};
use super::labeler::{relabel_subtree, BACK_SUFFIX};
use super::observer::{ObserverList, SubscriptionId};
use super::part::{PartDefinition, PartInstance};
use super::resolver::{CompositeStateResolver, Occupancy, Representation, RepresentationHandle};
use super::slot::{SlotKind, SlotRegistry};
use crate::engine::scene::{NodeId, SceneGraph};

/// Order in which limb slots are offered to a non-torso part
pub const LIMB_PRIORITY: [SlotKind; 4] = [
    SlotKind::FrontLeg,
    SlotKind::BackLeg,
    SlotKind::FrontArm,
    SlotKind::BackArm,
];

/// Why an attach request was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// A torso-capable part arrived while the torso slot was filled
    TorsoOccupied,
    /// A limb arrived before the torso under [`NeckPolicy::Reject`]
    NeckUnsupported,
    /// No empty limb slot accepts the part
    NoMatchingSlot,
}

/// Result of an attach request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    Attached(SlotKind),
    /// Accepted while torso-less, nothing was attached
    NeckPlaceholder,
    Rejected(RejectReason),
}

impl AttachOutcome {
    /// Whether the collector should consider the part consumed
    pub fn is_success(self) -> bool {
        !matches!(self, AttachOutcome::Rejected(_))
    }

    pub fn slot(self) -> Option<SlotKind> {
        match self {
            AttachOutcome::Attached(kind) => Some(kind),
            _ => None,
        }
    }
}

impl fmt::Display for AttachOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachOutcome::Attached(kind) => write!(f, "attached to {}", kind),
            AttachOutcome::NeckPlaceholder => f.write_str("accepted without attaching"),
            AttachOutcome::Rejected(reason) => write!(f, "rejected ({:?})", reason),
        }
    }
}

/// Owns the skeleton's slots and visuals and applies attach requests
///
/// Every mutation runs to completion before returning: registry update,
/// back-slot relabel, representation recompute, then notifications.
pub struct AssemblyController {
    neck_policy: NeckPolicy,
    registry: SlotRegistry,
    resolver: CompositeStateResolver,
    scene: SceneGraph,
    root: NodeId,
    representation: RepresentationHandle,
    leg_collider_enabled: bool,
    config_changed: ObserverList<()>,
    leg_collider: ObserverList<bool>,
}

impl AssemblyController {
    pub fn new(config: &AssemblyConfig) -> Self {
        let mut scene = SceneGraph::new();
        let root = scene.spawn(&config.root_name, None);
        let resolver =
            CompositeStateResolver::new(|representation| config.controller_name(representation));
        let representation = resolver.resolve(Occupancy::EMPTY);

        log::info!(
            "Created skeleton '{}' (neck policy {:?})",
            config.root_name,
            config.neck_policy
        );

        Self {
            neck_policy: config.neck_policy,
            registry: SlotRegistry::new(&config.slots),
            resolver,
            scene,
            root,
            representation,
            leg_collider_enabled: false,
            config_changed: ObserverList::new(),
            leg_collider: ObserverList::new(),
        }
    }

    /// Offer a part to the skeleton, returns whether it was consumed
    pub fn try_attach(&mut self, part: &Arc<PartDefinition>) -> bool {
        self.attach(part).is_success()
    }

    /// Offer a part to the skeleton and report what happened
    pub fn attach(&mut self, part: &Arc<PartDefinition>) -> AttachOutcome {
        let outcome = self.decide(part);
        if let AttachOutcome::Attached(kind) = outcome {
            self.fill(kind, part);
        }
        log::debug!("Part '{}' {}", part.id, outcome);
        outcome
    }

    fn decide(&self, part: &PartDefinition) -> AttachOutcome {
        if part.is_torso() {
            return if self.registry.is_occupied(SlotKind::Torso) {
                AttachOutcome::Rejected(RejectReason::TorsoOccupied)
            } else {
                AttachOutcome::Attached(SlotKind::Torso)
            };
        }

        if !self.registry.is_occupied(SlotKind::Torso) {
            return match self.neck_policy {
                NeckPolicy::AcceptWithoutAttach => AttachOutcome::NeckPlaceholder,
                NeckPolicy::Reject => AttachOutcome::Rejected(RejectReason::NeckUnsupported),
            };
        }

        LIMB_PRIORITY
            .into_iter()
            .find(|kind| !self.registry.is_occupied(*kind) && part.can_fill(*kind))
            .map(AttachOutcome::Attached)
            .unwrap_or(AttachOutcome::Rejected(RejectReason::NoMatchingSlot))
    }

    fn fill(&mut self, kind: SlotKind, part: &Arc<PartDefinition>) {
        let layout = self.registry.get_slot(kind).layout();
        let root = self
            .scene
            .instantiate(&part.visual_template, Some(self.root));

        if let Some(node) = self.scene.get_mut(root) {
            node.name = kind.instance_name().to_string();
            node.local_position = layout.position + part.local_offset;
            node.sort_order = layout.layer_order + part.layer_order;
        }

        if kind.is_back() {
            relabel_subtree(&mut self.scene, root, BACK_SUFFIX);
        }

        let instance = PartInstance::new(Arc::clone(part), root);
        if let Some(replaced) = self.registry.set_occupant(kind, instance, &mut self.scene) {
            log::warn!("Slot {} replaced part '{}'", kind, replaced.id);
        }

        self.publish();
    }

    /// Remove the part in `kind`, despawning its visuals
    ///
    /// Refuses to leave a back limb without its front or limbs without a
    /// torso, since no attach sequence can reach those states.
    pub fn detach(&mut self, kind: SlotKind) -> Option<Arc<PartDefinition>> {
        if let Some(blocker) = self.detach_blocker(kind) {
            log::warn!("Refusing to detach {} while {} is attached", kind, blocker);
            return None;
        }

        let released = self.registry.clear_occupant(kind, &mut self.scene)?;
        log::debug!("Detached part '{}' from {}", released.id, kind);
        self.publish();
        Some(released)
    }

    fn detach_blocker(&self, kind: SlotKind) -> Option<SlotKind> {
        if kind == SlotKind::Torso {
            return LIMB_PRIORITY
                .into_iter()
                .find(|limb| self.registry.is_occupied(*limb));
        }
        kind.back_counterpart()
            .filter(|back| self.registry.is_occupied(*back))
    }

    /// Remove every part, back to the bare skull
    pub fn clear(&mut self) {
        if self.registry.occupied().next().is_none() {
            return;
        }
        self.registry.clear_all(&mut self.scene);
        log::debug!("Cleared all slots");
        self.publish();
    }

    fn publish(&mut self) {
        let occupancy = self.registry.occupancy();
        if !occupancy.is_reachable() {
            log::warn!("Unreachable slot occupancy {:#09b}", occupancy.bits());
        }

        self.representation = self.resolver.resolve(occupancy);
        self.config_changed.notify(());

        self.leg_collider_enabled = occupancy.contains(SlotKind::FrontLeg);
        self.leg_collider.notify(self.leg_collider_enabled);
    }

    /// Called after every slot change, with no payload
    pub fn subscribe_config_changed<F>(&mut self, mut observer: F) -> SubscriptionId
    where
        F: FnMut() + 'static,
    {
        self.config_changed.subscribe(move |()| observer())
    }

    pub fn unsubscribe_config_changed(&mut self, id: SubscriptionId) -> bool {
        self.config_changed.unsubscribe(id)
    }

    /// Called after every slot change with whether the leg collider should be on
    pub fn subscribe_leg_collider<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(bool) + 'static,
    {
        self.leg_collider.subscribe(observer)
    }

    pub fn unsubscribe_leg_collider(&mut self, id: SubscriptionId) -> bool {
        self.leg_collider.unsubscribe(id)
    }

    pub fn representation(&self) -> RepresentationHandle {
        self.representation
    }

    pub fn current(&self) -> Representation {
        self.representation.representation
    }

    pub fn occupancy(&self) -> Occupancy {
        self.registry.occupancy()
    }

    /// True iff the front leg slot is filled
    pub fn leg_collider_enabled(&self) -> bool {
        self.leg_collider_enabled
    }

    pub fn registry(&self) -> &SlotRegistry {
        &self.registry
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Skeleton root node; attached parts hang directly below it
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Mirror the whole skeleton around its vertical axis
    pub fn set_mirrored(&mut self, mirrored: bool) {
        if let Some(root) = self.scene.get_mut(self.root) {
            root.mirrored = mirrored;
        }
    }

    pub fn is_mirrored(&self) -> bool {
        self.scene.get(self.root).is_some_and(|root| root.mirrored)
    }
}

impl fmt::Debug for AssemblyController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssemblyController")
            .field("occupancy", &self.registry.occupancy())
            .field("representation", &self.representation.representation)
            .field("leg_collider_enabled", &self.leg_collider_enabled)
            .finish()
    }
}
