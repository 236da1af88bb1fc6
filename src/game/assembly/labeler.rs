// Layering suffix for parts attached behind the body

use crate::engine::scene::{NodeId, SceneGraph};

/// Suffix appended below parts in back slots
pub const BACK_SUFFIX: &str = "Back";

/// Append `suffix` to the name of every node below `root`
///
/// The root keeps its name. Returns how many nodes were renamed; a stale
/// root renames nothing. Animation tracks for back limbs target the
/// suffixed names, so this must run exactly once per attached instance.
pub fn relabel_subtree(scene: &mut SceneGraph, root: NodeId, suffix: &str) -> usize {
    let mut renamed = 0;
    let mut stack: Vec<NodeId> = scene.children(root).to_vec();

    while let Some(id) = stack.pop() {
        let Some(node) = scene.get_mut(id) else {
            continue;
        };
        node.name.push_str(suffix);
        stack.extend_from_slice(node.children());
        renamed += 1;
    }

    renamed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene::Prefab;

    #[test]
    fn test_relabel_chain() {
        let mut scene = SceneGraph::new();
        let root = scene.spawn("Root", None);
        let child = scene.spawn("Child", Some(root));
        let grandchild = scene.spawn("Grandchild", Some(child));

        assert_eq!(relabel_subtree(&mut scene, root, BACK_SUFFIX), 2);
        assert_eq!(scene.name(root), Some("Root"));
        assert_eq!(scene.name(child), Some("ChildBack"));
        assert_eq!(scene.name(grandchild), Some("GrandchildBack"));
    }

    #[test]
    fn test_relabel_wide_prefab() {
        let mut scene = SceneGraph::new();
        let shin = Prefab::new("Shin").with_child(Prefab::new("Foot"));
        let prefab = Prefab::new("Leg")
            .with_child(Prefab::new("Thigh").with_child(shin))
            .with_child(Prefab::new("Kneecap"));
        let root = scene.instantiate(&prefab, None);

        assert_eq!(relabel_subtree(&mut scene, root, BACK_SUFFIX), 4);

        let mut names: Vec<_> = scene
            .descendants(root)
            .into_iter()
            .filter_map(|id| scene.name(id).map(str::to_string))
            .collect();
        names.sort();
        assert_eq!(names, ["FootBack", "KneecapBack", "ShinBack", "ThighBack"]);
    }

    #[test]
    fn test_relabel_leaf_and_stale_root() {
        let mut scene = SceneGraph::new();
        let leaf = scene.spawn("Leaf", None);
        assert_eq!(relabel_subtree(&mut scene, leaf, BACK_SUFFIX), 0);
        assert_eq!(scene.name(leaf), Some("Leaf"));

        scene.despawn(leaf);
        assert_eq!(relabel_subtree(&mut scene, leaf, BACK_SUFFIX), 0);
    }
}
