use core::fmt::Debug;

use crate::quadtree::point::Point;

/// An axis-aligned rectangle, stored as its `min` (top-left) and `max` (bottom-right) corners.
///
/// Containment is half-open: a point on the left or top edge is inside, a point on the right or
/// bottom edge is not. Since [`Rectangle::split`] hands the exact same `center` value to
/// neighbouring quadrants, every point inside a rectangle lands in exactly one of its quadrants.
#[derive(Clone, Copy, PartialEq)]
pub struct Rectangle {
    min: Point,
    max: Point,
}

impl Rectangle {
    /// Create a rectangle from its top-left corner and its size. Callers are expected to pass a
    /// non-negative `width` and `height`; nothing is checked here.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rectangle {
            min: Point { x, y },
            max: Point {
                x: x + width,
                y: y + height,
            },
        }
    }

    pub fn x(&self) -> f32 {
        self.min.x
    }

    pub fn y(&self) -> f32 {
        self.min.y
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn min(&self) -> Point {
        self.min
    }

    pub fn max(&self) -> Point {
        self.max
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Point {
        self.min.mid(&self.max)
    }

    /// Whether `p` lies in `[x, x + width) × [y, y + height)`.
    pub fn contains(&self, p: &Point) -> bool {
        self.min.x <= p.x && p.x < self.max.x && self.min.y <= p.y && p.y < self.max.y
    }

    /// Splits the rectangle into four equal quadrants, in `[nw, ne, sw, se]` order.
    ///
    /// `y` grows downwards, so "north" is the half with the smaller `y`.
    pub fn split(&self) -> [Rectangle; 4] {
        let center = self.center();

        let nw = Rectangle {
            min: self.min,
            max: center,
        };

        let ne = Rectangle {
            min: Point {
                x: center.x,
                y: self.min.y,
            },
            max: Point {
                x: self.max.x,
                y: center.y,
            },
        };

        let sw = Rectangle {
            min: Point {
                x: self.min.x,
                y: center.y,
            },
            max: Point {
                x: center.x,
                y: self.max.y,
            },
        };

        let se = Rectangle {
            min: center,
            max: self.max,
        };

        [nw, ne, sw, se]
    }

    /// Shrink the rectangle by `amount` on every side. A rectangle too small to shrink collapses
    /// onto its center rather than getting a negative size.
    pub fn inset(&self, amount: f32) -> Self {
        let center = self.center();

        let (min_x, max_x) = if 2.0 * amount < self.width() {
            (self.min.x + amount, self.max.x - amount)
        } else {
            (center.x, center.x)
        };

        let (min_y, max_y) = if 2.0 * amount < self.height() {
            (self.min.y + amount, self.max.y - amount)
        } else {
            (center.y, center.y)
        };

        Rectangle {
            min: Point::new(min_x, min_y),
            max: Point::new(max_x, max_y),
        }
    }
}

impl Debug for Rectangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {}; {}x{}]",
            self.x(),
            self.y(),
            self.width(),
            self.height()
        )
    }
}

#[cfg(test)]
mod test {
    use super::Point;
    use super::Rectangle;

    #[test]
    fn contains_is_half_open() {
        let r = Rectangle::new(0.0, 0.0, 10.0, 10.0);

        assert!(r.contains(&Point::new(0.0, 0.0)));
        assert!(r.contains(&Point::new(9.99, 9.99)));
        assert!(!r.contains(&Point::new(10.0, 5.0)));
        assert!(!r.contains(&Point::new(5.0, 10.0)));
        assert!(!r.contains(&Point::new(-0.01, 5.0)));
    }

    #[test]
    fn contains_rejects_nan() {
        let r = Rectangle::new(0.0, 0.0, 10.0, 10.0);

        assert!(!r.contains(&Point::new(f32::NAN, 5.0)));
        assert!(!r.contains(&Point::new(5.0, f32::NAN)));
    }

    #[test]
    fn split_quadrants() {
        let r = Rectangle::new(0.0, 0.0, 100.0, 50.0);
        let [nw, ne, sw, se] = r.split();

        assert_eq!(nw, Rectangle::new(0.0, 0.0, 50.0, 25.0));
        assert_eq!(ne, Rectangle::new(50.0, 0.0, 50.0, 25.0));
        assert_eq!(sw, Rectangle::new(0.0, 25.0, 50.0, 25.0));
        assert_eq!(se, Rectangle::new(50.0, 25.0, 50.0, 25.0));
    }

    #[test]
    fn split_boundary_point_has_one_owner() {
        let r = Rectangle::new(0.0, 0.0, 100.0, 100.0);
        let center = r.center();

        let owners = r.split().iter().filter(|q| q.contains(&center)).count();

        assert_eq!(owners, 1);
    }

    #[test]
    fn inset_shrinks_and_clamps() {
        let r = Rectangle::new(0.0, 0.0, 10.0, 4.0);

        assert_eq!(r.inset(1.0), Rectangle::new(1.0, 1.0, 8.0, 2.0));

        let collapsed = r.inset(3.0);
        assert_eq!(collapsed.width(), 4.0);
        assert_eq!(collapsed.height(), 0.0);
        assert_eq!(collapsed.center(), r.center());
    }
}
