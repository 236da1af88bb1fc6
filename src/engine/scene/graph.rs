// Visual hierarchy stored as a generational node arena

use glam::Vec2;

use super::prefab::Prefab;

/// Handle to a node in a [`SceneGraph`]
///
/// The generation makes handles to despawned nodes stale instead of
/// silently aliasing whatever reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Raw arena index (for debugging only)
    pub fn index(&self) -> u32 {
        self.index
    }
}

/// A single visual node
#[derive(Debug, Clone)]
pub struct Node {
    /// Node name, matched by animation tracks
    pub name: String,
    /// Sprite drawn at this node (None = pure transform)
    pub sprite: Option<String>,
    /// Offset from the parent node
    pub local_position: Vec2,
    /// Sorting order within the sprite layer (higher = drawn on top)
    pub sort_order: i32,
    /// Whether the node is mirrored around its vertical axis
    pub mirrored: bool,
    /// Whether the node is drawn
    pub visible: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(name: &str, parent: Option<NodeId>) -> Self {
        Self {
            name: name.to_string(),
            sprite: None,
            local_position: Vec2::ZERO,
            sort_order: 0,
            mirrored: false,
            visible: true,
            parent,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug)]
struct Entry {
    generation: u32,
    node: Option<Node>,
}

/// Arena of scene nodes
#[derive(Debug, Default)]
pub struct SceneGraph {
    entries: Vec<Entry>,
    free: Vec<u32>,
    live: usize,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a new node, optionally under a parent
    ///
    /// A stale parent handle spawns the node as a root.
    pub fn spawn(&mut self, name: &str, parent: Option<NodeId>) -> NodeId {
        let parent = parent.filter(|p| self.contains(*p));
        let node = Node::new(name, parent);

        let id = match self.free.pop() {
            Some(index) => {
                let entry = &mut self.entries[index as usize];
                entry.generation = entry.generation.wrapping_add(1);
                entry.node = Some(node);
                NodeId {
                    index,
                    generation: entry.generation,
                }
            }
            None => {
                let index = self.entries.len() as u32;
                self.entries.push(Entry {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        };

        if let Some(parent) = parent.and_then(|p| self.get_mut(p)) {
            parent.children.push(id);
        }

        self.live += 1;
        id
    }

    /// Instantiate a prefab template under `parent`, returning its root
    pub fn instantiate(&mut self, prefab: &Prefab, parent: Option<NodeId>) -> NodeId {
        let root = self.spawn_from_template(prefab, parent);

        // Explicit stack keeps deep templates off the call stack
        let mut pending: Vec<(&Prefab, NodeId)> =
            prefab.children.iter().map(|child| (child, root)).collect();

        while let Some((template, parent)) = pending.pop() {
            let id = self.spawn_from_template(template, Some(parent));
            pending.extend(template.children.iter().map(|child| (child, id)));
        }

        root
    }

    fn spawn_from_template(&mut self, template: &Prefab, parent: Option<NodeId>) -> NodeId {
        let id = self.spawn(&template.name, parent);
        if let Some(node) = self.get_mut(id) {
            node.sprite = template.sprite.clone();
            node.local_position = template.offset;
            node.sort_order = template.sort_order;
        }
        id
    }

    /// Despawn a node and every node below it
    ///
    /// Returns the number of nodes removed (0 for a stale handle).
    pub fn despawn(&mut self, id: NodeId) -> usize {
        let Some(parent) = self.get(id).map(|node| node.parent) else {
            return 0;
        };

        if let Some(parent) = parent.and_then(|p| self.get_mut(p)) {
            parent.children.retain(|child| *child != id);
        }

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let entry = &mut self.entries[current.index as usize];
            if let Some(node) = entry.node.take() {
                stack.extend(node.children);
                self.free.push(current.index);
                removed += 1;
            }
        }

        self.live -= removed;
        removed
    }

    /// Check whether a handle still refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.entries
            .get(id.index as usize)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.entries
            .get_mut(id.index as usize)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.node.as_mut())
    }

    /// Get a node's name
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|node| node.name.as_str())
    }

    /// Get a node's children (empty for a stale handle)
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }

    /// All nodes below `id`, depth first, not including `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        while let Some(current) = stack.pop() {
            found.push(current);
            stack.extend_from_slice(self.children(current));
        }
        found
    }

    /// Find the first node named `name` in the subtree rooted at `id`
    pub fn find_by_name(&self, id: NodeId, name: &str) -> Option<NodeId> {
        if self.name(id)? == name {
            return Some(id);
        }
        self.descendants(id)
            .into_iter()
            .find(|node| self.name(*node) == Some(name))
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_links_parent() {
        let mut scene = SceneGraph::new();
        let root = scene.spawn("root", None);
        let child = scene.spawn("child", Some(root));

        assert_eq!(scene.children(root), &[child]);
        assert_eq!(scene.get(child).unwrap().parent(), Some(root));
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_despawn_removes_subtree() {
        let mut scene = SceneGraph::new();
        let root = scene.spawn("root", None);
        let arm = scene.spawn("arm", Some(root));
        let hand = scene.spawn("hand", Some(arm));
        let leg = scene.spawn("leg", Some(root));

        assert_eq!(scene.despawn(arm), 2);
        assert!(!scene.contains(arm));
        assert!(!scene.contains(hand));
        assert!(scene.contains(leg));
        assert_eq!(scene.children(root), &[leg]);
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_stale_handle_after_reuse() {
        let mut scene = SceneGraph::new();
        let first = scene.spawn("first", None);
        scene.despawn(first);

        let second = scene.spawn("second", None);
        assert_eq!(first.index(), second.index());
        assert!(scene.get(first).is_none());
        assert_eq!(scene.name(second), Some("second"));
        assert_eq!(scene.despawn(first), 0);
    }

    #[test]
    fn test_instantiate_prefab() {
        let shin = Prefab::new("Shin")
            .with_sprite("leg_lower")
            .with_offset(0.0, -0.5);
        let prefab = Prefab::new("Leg")
            .with_child(Prefab::new("Thigh").with_child(shin))
            .with_child(Prefab::new("Knee"));

        let mut scene = SceneGraph::new();
        let root = scene.spawn("Skeleton", None);
        let leg = scene.instantiate(&prefab, Some(root));

        assert_eq!(scene.name(leg), Some("Leg"));
        assert_eq!(scene.descendants(leg).len(), 3);
        assert_eq!(scene.len(), 5);

        let shin = scene.find_by_name(root, "Shin").unwrap();
        let node = scene.get(shin).unwrap();
        assert_eq!(node.sprite.as_deref(), Some("leg_lower"));
        assert_eq!(node.local_position, Vec2::new(0.0, -0.5));
    }

    #[test]
    fn test_descendants_excludes_root() {
        let mut scene = SceneGraph::new();
        let root = scene.spawn("root", None);
        let child = scene.spawn("child", Some(root));

        let found = scene.descendants(root);
        assert_eq!(found, vec![child]);
    }
}
