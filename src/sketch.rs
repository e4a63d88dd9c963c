//! The "noisy grid": scatter points over a square, index them in a [`QuadTree`], and give every
//! leaf cell a shape picked by sampling value noise at its center.

use std::num::Wrapping;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::debug;

use crate::quadtree::Config;
use crate::quadtree::DEFAULT_CAPACITY;
use crate::quadtree::DEFAULT_MAX_DEPTH;
use crate::quadtree::NodeID;
use crate::quadtree::Point;
use crate::quadtree::QuadTree;
use crate::quadtree::QuadTreeError;
use crate::quadtree::Rectangle;

/// Number of noise lattice cells across the sketch
const NOISE_FREQUENCY: f32 = 4.0;

/// Largest number of points a sketch scatters on one rebuild
pub const MAX_POINTS: usize = 100_000;

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("At most {max} points are supported, got {0}", max = MAX_POINTS)]
    TooManyPoints(usize),

    #[error("Bias must be within [0, 1], got {0}")]
    InvalidBias(f32),

    #[error("Size must be a positive finite number, got {0}")]
    InvalidSize(f32),

    #[error("Invalid tree configuration: {0}")]
    Tree(#[from] QuadTreeError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Number of points scattered on every rebuild
    pub points: usize,

    pub capacity: usize,

    pub max_depth: u32,

    /// How strongly points are pulled toward the center. `0` is uniform.
    pub bias: f32,

    /// Side length of the square the points are scattered over
    pub size: f32,

    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            points: 200,
            capacity: DEFAULT_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
            bias: 0.0,
            size: 512.0,
            seed: 0,
        }
    }
}

impl Settings {
    pub fn config(&self) -> Config {
        Config {
            capacity: self.capacity,
            max_depth: self.max_depth,
            base_depth: 0,
        }
    }

    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(0.0, 0.0, self.size, self.size)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.points > MAX_POINTS {
            return Err(SettingsError::TooManyPoints(self.points));
        }

        if !(0.0..=1.0).contains(&self.bias) {
            return Err(SettingsError::InvalidBias(self.bias));
        }

        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(SettingsError::InvalidSize(self.size));
        }

        self.config().validate()?;

        Ok(())
    }
}

/// Scatter `settings.points` points over the sketch square.
///
/// Each coordinate is drawn uniformly from `[-1, 1)` around the center, then raised to the power
/// `1 + 3 * bias` (keeping its sign), which squeezes points toward the center as `bias` grows.
pub fn generate_points(settings: &Settings) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(settings.seed);

    let half = settings.size / 2.0;
    let exponent = 1.0 + 3.0 * settings.bias;

    // largest coordinate still inside the half-open bounds
    let limit = settings.size * (1.0 - f32::EPSILON);

    let coordinate = |rng: &mut StdRng| {
        let t: f32 = rng.random::<f32>() * 2.0 - 1.0;
        let t = t.signum() * t.abs().powf(exponent);

        (half + t * half).clamp(0.0, limit)
    };

    (0..settings.points)
        .map(|_| {
            let x = coordinate(&mut rng);
            let y = coordinate(&mut rng);

            Point::new(x, y)
        })
        .collect()
}

/// Margin between neighbouring cells, a quarter of the side of the smallest possible cell.
pub fn gap(max_depth: u32, size: f32) -> f32 {
    size / 2f32.powi(max_depth as i32) / 4.0
}

/// Hash a lattice corner to a value in `[0, 1)`.
fn lattice(x: i32, y: i32, seed: u64) -> f32 {
    let c = Wrapping(0x9E37_79B9_7F4A_7C15u64);

    let mut h = Wrapping(seed) + c;
    h = (h ^ Wrapping(x as u32 as u64)) * c;
    h = (h ^ Wrapping(y as u32 as u64)) * c;
    h ^= h >> 29;

    // keep 24 bits so the conversion to `f32` is exact
    (h.0 >> 40) as f32 / (1u32 << 24) as f32
}

/// Smoothly interpolated value noise in `[0, 1]`. Deterministic for a given `seed`.
pub fn noise(x: f32, y: f32, seed: u64) -> f32 {
    let (x0, y0) = (x.floor(), y.floor());
    let (tx, ty) = (x - x0, y - y0);
    let (ix, iy) = (x0 as i32, y0 as i32);

    let fade = |t: f32| t * t * (3.0 - 2.0 * t);
    let lerp = |a: f32, b: f32, t: f32| a + (b - a) * t;

    let (sx, sy) = (fade(tx), fade(ty));

    let top = lerp(lattice(ix, iy, seed), lattice(ix + 1, iy, seed), sx);
    let bottom = lerp(lattice(ix, iy + 1, seed), lattice(ix + 1, iy + 1, seed), sx);

    lerp(top, bottom, sy).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Empty,
    Dot,
    Square,
    Cross,
}

impl Shape {
    pub fn from_noise(n: f32) -> Self {
        match n {
            n if n < 0.25 => Shape::Empty,
            n if n < 0.5 => Shape::Dot,
            n if n < 0.75 => Shape::Square,
            _ => Shape::Cross,
        }
    }
}

/// One leaf of the tree, ready to be drawn.
#[derive(Debug, Clone, Copy)]
pub struct Cell {
    pub id: NodeID,

    /// Leaf bounds shrunk by the sketch gap
    pub bounds: Rectangle,

    pub depth: u32,

    /// Number of points held by the leaf
    pub points: usize,

    pub noise: f32,

    pub shape: Shape,
}

/// Lay out one [`Cell`] per leaf of `tree`, in leaf order.
pub fn cells(tree: &QuadTree, settings: &Settings) -> Vec<Cell> {
    let gap = gap(tree.max_depth(), settings.size);
    let scale = NOISE_FREQUENCY / settings.size;

    tree.leaves()
        .map(|leaf| {
            let bounds = leaf.bounds();
            let c = bounds.center();
            let noise = noise(c.x * scale, c.y * scale, settings.seed);

            Cell {
                id: leaf.id(),
                bounds: bounds.inset(gap),
                depth: leaf.depth(),
                points: leaf.points().len(),
                noise,
                shape: Shape::from_noise(noise),
            }
        })
        .collect()
}

/// A tree together with the settings it was built from. Any settings change rebuilds the tree
/// from scratch.
#[derive(Debug)]
pub struct Sketch {
    settings: Settings,
    tree: QuadTree,
}

impl Sketch {
    pub fn new(settings: Settings) -> Result<Self, SettingsError> {
        settings.validate()?;

        let mut tree = QuadTree::with_config(settings.bounds(), settings.config())?;
        populate(&mut tree, &settings);

        Ok(Sketch { settings, tree })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tree(&self) -> &QuadTree {
        &self.tree
    }

    /// Change the settings and rebuild. On error the sketch is left as it was.
    pub fn update<F>(&mut self, f: F) -> Result<(), SettingsError>
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.settings.clone();
        f(&mut settings);
        settings.validate()?;

        if settings.config() == *self.tree.config() {
            self.tree.reset(settings.bounds());
        } else {
            self.tree = QuadTree::with_config(settings.bounds(), settings.config())?;
        }

        populate(&mut self.tree, &settings);
        self.settings = settings;

        Ok(())
    }

    pub fn cells(&self) -> Vec<Cell> {
        cells(&self.tree, &self.settings)
    }
}

fn populate(tree: &mut QuadTree, settings: &Settings) {
    let points = generate_points(settings);
    let accepted = tree.extend(points);

    debug!(
        accepted,
        rejected = settings.points - accepted,
        leaves = tree.leaves().count(),
        max_depth = tree.max_depth(),
        "Rebuilt tree"
    );
}

#[cfg(test)]
mod test {
    use super::MAX_POINTS;
    use super::Settings;
    use super::SettingsError;
    use super::Shape;
    use super::Sketch;
    use crate::quadtree::QuadTreeError;

    #[test]
    fn settings_validation() {
        let bad_bias = Settings {
            bias: 1.5,
            ..Default::default()
        };
        assert_eq!(bad_bias.validate(), Err(SettingsError::InvalidBias(1.5)));

        let bad_size = Settings {
            size: 0.0,
            ..Default::default()
        };
        assert_eq!(bad_size.validate(), Err(SettingsError::InvalidSize(0.0)));

        let too_many = Settings {
            points: MAX_POINTS + 1,
            ..Default::default()
        };
        assert_eq!(too_many.validate(), Err(SettingsError::TooManyPoints(MAX_POINTS + 1)));

        let bad_capacity = Settings {
            capacity: 0,
            ..Default::default()
        };
        assert_eq!(
            bad_capacity.validate(),
            Err(SettingsError::Tree(QuadTreeError::ZeroCapacity))
        );
    }

    #[test]
    fn points_are_seeded() {
        let settings = Settings::default();

        assert_eq!(
            super::generate_points(&settings),
            super::generate_points(&settings)
        );

        let other = Settings {
            seed: 1,
            ..Default::default()
        };
        assert_ne!(
            super::generate_points(&settings),
            super::generate_points(&other)
        );
    }

    #[test]
    fn bias_pulls_toward_center() {
        let spread = |bias: f32| {
            let settings = Settings {
                points: 500,
                bias,
                ..Default::default()
            };
            let c = settings.size / 2.0;

            super::generate_points(&settings)
                .iter()
                .map(|p| (p.x - c).abs() + (p.y - c).abs())
                .sum::<f32>()
        };

        assert!(spread(1.0) < spread(0.0));
    }

    #[test]
    fn every_point_is_in_bounds() {
        let settings = Settings {
            points: 2000,
            bias: 0.7,
            ..Default::default()
        };
        let bounds = settings.bounds();

        assert!(super::generate_points(&settings).iter().all(|p| bounds.contains(p)));
    }

    #[test]
    fn gap_follows_finest_level() {
        assert_eq!(super::gap(0, 512.0), 128.0);
        assert_eq!(super::gap(3, 512.0), 16.0);
    }

    #[test]
    fn noise_is_deterministic_and_bounded() {
        for i in 0..100 {
            let (x, y) = (i as f32 * 0.37, i as f32 * 0.11);
            let n = super::noise(x, y, 7);

            assert_eq!(n, super::noise(x, y, 7));
            assert!((0.0..=1.0).contains(&n));
        }
    }

    #[test]
    fn noise_matches_lattice_at_integers() {
        assert_eq!(super::noise(3.0, 5.0, 1), super::lattice(3, 5, 1));
    }

    #[test]
    fn shape_thresholds() {
        assert_eq!(Shape::from_noise(0.0), Shape::Empty);
        assert_eq!(Shape::from_noise(0.3), Shape::Dot);
        assert_eq!(Shape::from_noise(0.5), Shape::Square);
        assert_eq!(Shape::from_noise(1.0), Shape::Cross);
    }

    #[test]
    fn one_cell_per_leaf() {
        let sketch = Sketch::new(Settings::default()).unwrap();
        let cells = sketch.cells();

        assert_eq!(cells.len(), sketch.tree().leaves().count());
        assert_eq!(sketch.tree().count(), 200);
        assert!(cells.iter().all(|c| c.points <= sketch.settings().capacity));
    }

    #[test]
    fn update_rebuilds() {
        let mut sketch = Sketch::new(Settings::default()).unwrap();

        sketch.update(|s| s.points = 50).unwrap();
        assert_eq!(sketch.tree().count(), 50);

        sketch.update(|s| s.capacity = 1).unwrap();
        assert_eq!(sketch.tree().capacity(), 1);
        assert_eq!(sketch.tree().count(), 50);
    }

    #[test]
    fn failed_update_keeps_state() {
        let mut sketch = Sketch::new(Settings::default()).unwrap();

        let err = sketch.update(|s| s.bias = -1.0).unwrap_err();

        assert_eq!(err, SettingsError::InvalidBias(-1.0));
        assert_eq!(sketch.settings(), &Settings::default());
        assert_eq!(sketch.tree().count(), 200);
    }
}
