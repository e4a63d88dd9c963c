//! Enter and exit animations for the nodes of a [`QuadTree`].
//!
//! The tree itself knows nothing about time. An [`Animator`] keeps one [`NodeAnim`] per arena
//! slot, and is kept in step with the tree by calling [`Animator::sync`] after every rebuild.

use tracing::debug;

use crate::quadtree::NodeID;
use crate::quadtree::QuadTree;
use crate::quadtree::Rectangle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Entering,
    Visible,
    Exiting,
    Gone,
}

#[derive(Debug, Clone, Copy)]
pub struct NodeAnim {
    pub phase: Phase,

    /// Progress through the current phase, in `[0, 1]`. Only meaningful while entering or exiting.
    pub progress: f32,

    /// Bounds of the node that last occupied this slot
    bounds: Rectangle,
}

impl NodeAnim {
    fn entering(bounds: Rectangle) -> Self {
        NodeAnim {
            phase: Phase::Entering,
            progress: 0.0,
            bounds,
        }
    }

    fn gone() -> Self {
        NodeAnim {
            phase: Phase::Gone,
            progress: 1.0,
            bounds: Rectangle::new(0.0, 0.0, 0.0, 0.0),
        }
    }

    /// Start fading out, picking up from however visible the node currently is.
    fn exit(&mut self) {
        self.progress = match self.phase {
            Phase::Entering => 1.0 - self.progress,
            Phase::Visible => 0.0,
            Phase::Exiting | Phase::Gone => return,
        };
        self.phase = Phase::Exiting;
    }

    pub fn opacity(&self) -> f32 {
        match self.phase {
            Phase::Entering => smoothstep(self.progress),
            Phase::Visible => 1.0,
            Phase::Exiting => 1.0 - smoothstep(self.progress),
            Phase::Gone => 0.0,
        }
    }
}

fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub struct Animator {
    /// Seconds an enter or exit animation lasts
    duration: f32,

    nodes: Vec<NodeAnim>,
}

impl Animator {
    /// A non-positive `duration` makes every transition complete on the next tick.
    pub fn new(duration: f32) -> Self {
        Animator {
            duration,
            nodes: vec![],
        }
    }

    pub fn get(&self, id: NodeID) -> Option<&NodeAnim> {
        self.nodes.get(id)
    }

    /// How visible node `id` is, from `0` (hidden) to `1` (fully drawn).
    pub fn opacity(&self, id: NodeID) -> f32 {
        self.nodes.get(id).map_or(0.0, NodeAnim::opacity)
    }

    /// Catch up with a rebuilt tree. Slots whose node is new or has moved start entering, slots
    /// the tree no longer uses start exiting. Returns the number of slots that started entering.
    pub fn sync(&mut self, tree: &QuadTree) -> usize {
        let mut entered = 0;

        if self.nodes.len() < tree.node_count() {
            self.nodes.resize(tree.node_count(), NodeAnim::gone());
        }

        for node in tree.nodes() {
            let bounds = node.bounds();
            let anim = &mut self.nodes[node.id()];

            let stale = matches!(anim.phase, Phase::Exiting | Phase::Gone);
            if stale || anim.bounds != bounds {
                *anim = NodeAnim::entering(bounds);
                entered += 1;
            }
        }

        for anim in self.nodes.iter_mut().skip(tree.node_count()) {
            anim.exit();
        }

        debug!(entered, slots = self.nodes.len(), "Synced animations");

        entered
    }

    /// Start the exit animation of every node below `id`. Returns how many nodes were affected.
    pub fn collapse(&mut self, tree: &QuadTree, id: NodeID) -> usize {
        let mut n = 0;

        for node in tree.descendants(id) {
            if let Some(anim) = self.nodes.get_mut(node.id()) {
                anim.exit();
                n += 1;
            }
        }

        n
    }

    /// Advance every animation by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        let step = if self.duration > 0.0 {
            dt / self.duration
        } else {
            1.0
        };

        for anim in &mut self.nodes {
            match anim.phase {
                Phase::Entering | Phase::Exiting => {
                    anim.progress = (anim.progress + step).min(1.0);
                }
                Phase::Visible | Phase::Gone => continue,
            }

            if anim.progress >= 1.0 {
                anim.phase = match anim.phase {
                    Phase::Entering => Phase::Visible,
                    _ => Phase::Gone,
                };
            }
        }
    }

    /// Whether nothing is mid-transition.
    pub fn is_settled(&self) -> bool {
        self.nodes
            .iter()
            .all(|anim| matches!(anim.phase, Phase::Visible | Phase::Gone))
    }
}
