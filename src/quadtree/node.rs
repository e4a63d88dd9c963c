use std::fmt::Debug;

use crate::quadtree::point::Point;
use crate::quadtree::rect::Rectangle;

/// Index of a [`Node`] in the tree's arena.
pub type NodeID = usize;

pub struct Node {
    pub bounds: Rectangle,

    /// Distance from the root. The root sits at the tree's base depth, usually `0`.
    pub depth: u32,

    /// Points held directly by this node. Frozen once the node has children.
    pub points: Vec<Point>,

    /// Index of the first of four consecutive children, laid out `[nw, ne, sw, se]`.
    /// `None` if leaf.
    pub children: Option<NodeID>,

    pub parent: Option<NodeID>,
}

impl Node {
    pub fn leaf(bounds: Rectangle, depth: u32, parent: Option<NodeID>) -> Self {
        Node {
            bounds,
            depth,
            points: vec![],
            children: None,
            parent,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// The arena indices of the four children, if any.
    pub fn children(&self) -> Option<[NodeID; 4]> {
        self.children.map(|c| [c, c + 1, c + 2, c + 3])
    }
}

impl Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let g = |i: Option<NodeID>| -> isize { i.map_or(-1, |i| i as isize) };

        write!(
            f,
            "[{:?} depth: {}, points: {}, children: {}, parent: {}]",
            self.bounds,
            self.depth,
            self.points.len(),
            g(self.children),
            g(self.parent)
        )
    }
}
