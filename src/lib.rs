pub mod anim;
pub mod camera;
pub mod events;
pub mod io;
pub mod quadtree;
pub mod render;
pub mod sketch;

pub use crate::quadtree::Point;
pub use crate::quadtree::QuadTree;
pub use crate::quadtree::Rectangle;
