// Scene graph for character visuals
//
// Nodes live in an indexed arena; prefabs are authored node trees
// that get instantiated under a parent node.

mod graph;
mod prefab;

pub use graph::{Node, NodeId, SceneGraph};
pub use prefab::Prefab;
