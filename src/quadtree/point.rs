use core::fmt::Debug;

#[derive(Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    /// Compute the midpoint of the current `Point` and some `other` `Point`.
    pub fn mid(&self, other: &Self) -> Self {
        Point {
            x: (self.x + other.x) / 2f32,
            y: (self.y + other.y) / 2f32,
        }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Point { x, y }
    }
}

impl Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
