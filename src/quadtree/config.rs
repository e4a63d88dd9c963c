use thiserror::Error;

/// Nodes never subdivide past this depth unless configured otherwise. Points landing in a leaf at
/// this depth are kept there even if the leaf is already full.
pub const DEFAULT_MAX_DEPTH: u32 = 20;

pub const DEFAULT_CAPACITY: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuadTreeError {
    #[error("Node capacity must be at least 1")]
    ZeroCapacity,

    #[error("Base depth {base} is deeper than the maximum depth {max}")]
    BaseDepthExceedsMax { base: u32, max: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Number of points a node holds before it subdivides
    pub capacity: usize,

    /// Depth at which leaves stop subdividing and overflow instead
    pub max_depth: u32,

    /// Depth of the root node
    pub base_depth: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            capacity: DEFAULT_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
            base_depth: 0,
        }
    }
}

impl Config {
    pub fn with_capacity(capacity: usize) -> Self {
        Config {
            capacity,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), QuadTreeError> {
        if self.capacity == 0 {
            return Err(QuadTreeError::ZeroCapacity);
        }

        if self.base_depth > self.max_depth {
            return Err(QuadTreeError::BaseDepthExceedsMax {
                base: self.base_depth,
                max: self.max_depth,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::Config;
    use super::QuadTreeError;

    #[test]
    fn default_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn zero_capacity() {
        assert_eq!(
            Config::with_capacity(0).validate(),
            Err(QuadTreeError::ZeroCapacity)
        );
    }

    #[test]
    fn base_deeper_than_max() {
        let config = Config {
            base_depth: 5,
            max_depth: 3,
            ..Default::default()
        };

        assert_eq!(
            config.validate(),
            Err(QuadTreeError::BaseDepthExceedsMax { base: 5, max: 3 })
        );
    }
}
