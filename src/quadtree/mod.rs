use core::fmt::Debug;

use tracing::trace;
use tracing::warn;

pub use crate::quadtree::config::Config;
pub use crate::quadtree::config::QuadTreeError;
pub use crate::quadtree::config::DEFAULT_CAPACITY;
pub use crate::quadtree::config::DEFAULT_MAX_DEPTH;
pub use crate::quadtree::node::Node;
pub use crate::quadtree::node::NodeID;
pub use crate::quadtree::point::Point;
pub use crate::quadtree::rect::Rectangle;

mod config;
mod node;
mod point;
mod rect;

/// The root always lives in the first slot of the arena.
pub const ROOT: NodeID = 0;

/// A point quadtree whose nodes split into four quadrants the first time they overflow.
///
/// Nodes are stored in a flat arena and refer to each other by [`NodeID`]. The four children of a
/// node always occupy consecutive slots, ordered `[nw, ne, sw, se]`. Subdivision happens once per
/// node and is never undone, so the shape of the tree depends on the order in which points were
/// inserted, not only on the final set of points. The only way to change the shape afterwards is
/// [`QuadTree::clear`] followed by re-insertion.
#[derive(Debug)]
pub struct QuadTree {
    config: Config,

    nodes: Vec<Node>,

    /// Whether some leaf at `max_depth` went over capacity since the last clear
    overflowed: bool,
}

/// A borrowed view of a node together with its position in the arena.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    id: NodeID,
    node: &'a Node,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeID {
        self.id
    }

    pub fn bounds(&self) -> Rectangle {
        self.node.bounds
    }

    pub fn depth(&self) -> u32 {
        self.node.depth
    }

    /// Points held directly by this node
    pub fn points(&self) -> &'a [Point] {
        &self.node.points
    }

    pub fn is_leaf(&self) -> bool {
        self.node.is_leaf()
    }

    pub fn children(&self) -> Option<[NodeID; 4]> {
        self.node.children()
    }

    pub fn parent(&self) -> Option<NodeID> {
        self.node.parent
    }
}

impl Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:?}", self.id, self.node)
    }
}

impl QuadTree {
    /// Create an empty tree over `bounds` where each node holds up to `capacity` points.
    pub fn new(bounds: Rectangle, capacity: usize) -> Result<Self, QuadTreeError> {
        Self::with_config(bounds, Config::with_capacity(capacity))
    }

    pub fn with_config(bounds: Rectangle, config: Config) -> Result<Self, QuadTreeError> {
        config.validate()?;

        Ok(QuadTree {
            config,
            nodes: vec![Node::leaf(bounds, config.base_depth, None)],
            overflowed: false,
        })
    }

    /// Build a tree and insert every point of `points` in order. Points outside `bounds` are
    /// dropped.
    pub fn from_points<I>(
        bounds: Rectangle,
        capacity: usize,
        points: I,
    ) -> Result<Self, QuadTreeError>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut tree = Self::new(bounds, capacity)?;
        tree.extend(points);

        Ok(tree)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// The bounds of the root node
    pub fn bounds(&self) -> Rectangle {
        self.nodes[ROOT].bounds
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            id: ROOT,
            node: &self.nodes[ROOT],
        }
    }

    pub fn node(&self, id: NodeID) -> Option<NodeRef<'_>> {
        self.nodes.get(id).map(|node| NodeRef { id, node })
    }

    pub fn parent(&self, id: NodeID) -> Option<NodeID> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    /// Number of nodes, leaves and internal nodes alike
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of nodes that have been split
    pub fn subdivisions(&self) -> usize {
        // every split adds exactly four nodes to the arena
        (self.nodes.len() - 1) / 4
    }

    /// Insert `p` into the tree. Returns `false`, leaving the tree untouched, if `p` is outside
    /// the tree's bounds.
    pub fn insert(&mut self, p: Point) -> bool {
        if !self.nodes[ROOT].bounds.contains(&p) {
            return false;
        }

        let Config {
            capacity,
            max_depth,
            ..
        } = self.config;

        let mut id = ROOT;

        loop {
            let node = &mut self.nodes[id];

            if node.is_leaf() {
                if node.points.len() < capacity {
                    node.points.push(p);
                    return true;
                }

                // Coincident points would split forever, so the deepest leaves just grow instead
                if node.depth >= max_depth {
                    node.points.push(p);

                    if !self.overflowed {
                        warn!(id, max_depth, "Leaf at maximum depth is over capacity");
                        self.overflowed = true;
                    }

                    return true;
                }

                self.subdivide(id);
            }

            let Some(children) = self.nodes[id].children() else {
                unreachable!("node {id} was just subdivided")
            };

            // Quadrants share their edges exactly, so this only fails if the split rounded away
            // the region containing `p`.
            let Some(next) = children
                .into_iter()
                .find(|&c| self.nodes[c].bounds.contains(&p))
            else {
                trace!(id, ?p, "No quadrant accepted point");
                return false;
            };

            id = next;
        }
    }

    /// Insert every point of `points` in order, returning how many were accepted.
    pub fn extend<I>(&mut self, points: I) -> usize
    where
        I: IntoIterator<Item = Point>,
    {
        points.into_iter().filter(|&p| self.insert(p)).count()
    }

    fn subdivide(&mut self, id: NodeID) {
        let first = self.nodes.len();
        let depth = self.nodes[id].depth + 1;
        let quadrants = self.nodes[id].bounds.split();

        for bounds in quadrants {
            self.nodes.push(Node::leaf(bounds, depth, Some(id)));
        }

        self.nodes[id].children = Some(first);

        trace!(id, depth, "Subdivided node");
    }

    /// Drop every point and child, leaving the root as an empty leaf. Bounds and capacity are
    /// kept.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);

        let root = &mut self.nodes[ROOT];
        root.points.clear();
        root.children = None;

        self.overflowed = false;
    }

    /// Like [`QuadTree::clear`], but also move the root to `bounds`.
    pub fn reset(&mut self, bounds: Rectangle) {
        self.clear();
        self.nodes[ROOT].bounds = bounds;
    }

    /// Every node reachable from the root, depth first, visiting children in `[nw, ne, sw, se]`
    /// order.
    pub fn nodes(&self) -> Walk<'_> {
        self.walk(ROOT)
    }

    /// Every node below `id`, not including `id` itself.
    pub fn descendants(&self, id: NodeID) -> Walk<'_> {
        let stack = match self.nodes.get(id).and_then(Node::children) {
            Some([nw, ne, sw, se]) => vec![se, sw, ne, nw],
            None => vec![],
        };

        Walk { tree: self, stack }
    }

    fn walk(&self, id: NodeID) -> Walk<'_> {
        Walk {
            tree: self,
            stack: vec![id],
        }
    }

    /// The leaves of the tree, in the same depth-first order as [`QuadTree::nodes`].
    pub fn leaves(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.nodes().filter(NodeRef::is_leaf)
    }

    pub fn leaf_nodes(&self) -> Vec<NodeRef<'_>> {
        self.leaves().collect()
    }

    /// The largest depth of any leaf.
    pub fn max_depth(&self) -> u32 {
        self.leaves()
            .map(|leaf| leaf.depth())
            .max()
            .unwrap_or(self.config.base_depth)
    }

    /// Total number of points stored in the tree.
    pub fn count(&self) -> usize {
        self.nodes.iter().map(|node| node.points.len()).sum()
    }

    pub fn iter_points(&self) -> impl Iterator<Item = &Point> + '_ {
        self.nodes.iter().flat_map(|node| node.points.iter())
    }
}

/// Depth-first, pre-order traversal over part of a [`QuadTree`].
pub struct Walk<'a> {
    tree: &'a QuadTree,
    stack: Vec<NodeID>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = &self.tree.nodes[id];

        // pushed in reverse so that `nw` comes out first
        if let Some([nw, ne, sw, se]) = node.children() {
            self.stack.extend([se, sw, ne, nw]);
        }

        Some(NodeRef { id, node })
    }
}
