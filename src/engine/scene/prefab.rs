// Visual templates instantiated into the scene graph

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Authored node tree for a collectible part's visuals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prefab {
    pub name: String,
    #[serde(default)]
    pub sprite: Option<String>,
    #[serde(default)]
    pub offset: Vec2,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub children: Vec<Prefab>,
}

impl Prefab {
    /// Create an empty template node
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            sprite: None,
            offset: Vec2::ZERO,
            sort_order: 0,
            children: Vec::new(),
        }
    }

    /// Set the sprite drawn at this node
    pub fn with_sprite(mut self, sprite: &str) -> Self {
        self.sprite = Some(sprite.to_string());
        self
    }

    /// Set the offset from the parent node
    pub fn with_offset(mut self, x: f32, y: f32) -> Self {
        self.offset = Vec2::new(x, y);
        self
    }

    /// Append a child template
    pub fn with_child(mut self, child: Prefab) -> Self {
        self.children.push(child);
        self
    }

    /// Total number of nodes in the template, root included
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}
