use crate::sketch::MAX_POINTS;
use crate::sketch::Settings;

/// Bias change per key press
const BIAS_STEP: f32 = 0.1;

pub enum Event {
    SketchEvent(SketchEvent),
    AppEvent(AppEvent),
}

/// A change to the sketch settings. Every one of these rebuilds the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchEvent {
    MorePoints,
    FewerPoints,
    MoreCapacity,
    LessCapacity,
    MoreBias,
    LessBias,
    Reseed,
}

pub enum AppEvent {
    Resize { cols: u16, rows: u16 },

    /// Exit the application
    Exit,
}

impl SketchEvent {
    /// Apply the change to `settings`, keeping every value within its valid range.
    pub fn apply(self, settings: &mut Settings) {
        match self {
            SketchEvent::MorePoints => {
                settings.points = settings.points.saturating_mul(2).clamp(1, MAX_POINTS)
            }
            SketchEvent::FewerPoints => settings.points /= 2,
            SketchEvent::MoreCapacity => settings.capacity = settings.capacity.saturating_add(1),
            SketchEvent::LessCapacity => {
                settings.capacity = settings.capacity.saturating_sub(1).max(1)
            }
            SketchEvent::MoreBias => settings.bias = (settings.bias + BIAS_STEP).min(1.0),
            SketchEvent::LessBias => settings.bias = (settings.bias - BIAS_STEP).max(0.0),
            SketchEvent::Reseed => settings.seed = settings.seed.wrapping_add(1),
        }
    }
}

#[cfg(test)]
mod test {
    use super::SketchEvent;
    use crate::sketch::MAX_POINTS;
    use crate::sketch::Settings;

    #[test]
    fn stays_valid() {
        let mut settings = Settings {
            points: 0,
            capacity: 1,
            bias: 0.95,
            ..Default::default()
        };

        SketchEvent::LessCapacity.apply(&mut settings);
        SketchEvent::MoreBias.apply(&mut settings);
        SketchEvent::MorePoints.apply(&mut settings);

        assert_eq!(settings.capacity, 1);
        assert_eq!(settings.bias, 1.0);
        assert_eq!(settings.points, 1);
        assert_eq!(settings.validate(), Ok(()));

        for _ in 0..20 {
            SketchEvent::LessBias.apply(&mut settings);
        }
        assert_eq!(settings.bias, 0.0);

        for _ in 0..64 {
            SketchEvent::MorePoints.apply(&mut settings);
        }
        assert_eq!(settings.points, MAX_POINTS);
        assert_eq!(settings.validate(), Ok(()));
    }

    #[test]
    fn reseed_changes_seed() {
        let mut settings = Settings::default();
        SketchEvent::Reseed.apply(&mut settings);

        assert_eq!(settings.seed, 1);
    }
}
