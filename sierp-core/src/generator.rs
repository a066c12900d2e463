//! Mesh generation for a point on the morph timeline
use thiserror::Error;

use crate::buffers::MeshBuffers;
use crate::fold::{fold_in, fold_up};
use crate::geometry::Mesh;
use crate::positions::PositionCache;
use crate::shape::base_shape;
use crate::split::split;

/// Default end of the timeline
pub const DEFAULT_MAX_TIME: f64 = 8.0;

/// Deepest recursion a configuration may ask for
pub const MAX_SUPPORTED_DEPTH: u32 = 7;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("max time must be finite, got {0}")]
    NonFinite(f64),
    #[error("max time must be at least 1, got {0}")]
    TooShort(f64),
    #[error(
        "max time {max_time} would need depth {depth}, at most {max} is supported",
        max = MAX_SUPPORTED_DEPTH
    )]
    TooDeep { max_time: f64, depth: u32 },
    #[error("max speed must be finite and non-negative, got {0}")]
    InvalidSpeed(f64),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerateError {
    #[error("time must be finite, got {0}")]
    NonFinite(f64),
    #[error("time {time} is outside [0, {max_time}]")]
    OutOfRange { time: f64, max_time: f64 },
}

/// Timeline bounds shared by the generator and its callers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorConfig {
    max_time: f64,
}

impl GeneratorConfig {
    pub fn new(max_time: f64) -> Result<Self, ConfigError> {
        if !max_time.is_finite() {
            return Err(ConfigError::NonFinite(max_time));
        }
        if max_time < 1.0 {
            return Err(ConfigError::TooShort(max_time));
        }
        let depth = max_time.floor() as u32 - 1;
        if depth > MAX_SUPPORTED_DEPTH {
            return Err(ConfigError::TooDeep { max_time, depth });
        }
        Ok(Self { max_time })
    }

    pub fn max_time(&self) -> f64 {
        self.max_time
    }

    /// Deepest recursion reached at the end of the timeline
    pub fn max_depth(&self) -> u32 {
        self.max_time.floor() as u32 - 1
    }

    /// Bring an arbitrary input onto the timeline: anything non-finite
    /// becomes 0, the rest is clamped to `[0, max_time]`.
    pub fn clamp_time(&self, time: f64) -> f64 {
        if time.is_finite() {
            time.clamp(0.0, self.max_time)
        } else {
            0.0
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_time: DEFAULT_MAX_TIME,
        }
    }
}

/// Which stage of the morph a time value falls into
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Regime {
    /// `time <= 1`: a single unit folding up from the flat triangle
    Folding { fraction: f64 },
    /// Integer `time > 1`: a finished fractal
    Settled { level: u32 },
    /// Non-integer `time > 1`: inner faces of every copy folding in
    Subdividing { level: u32, fraction: f64 },
}

impl Regime {
    pub fn from_time(time: f64) -> Self {
        if time <= 1.0 {
            return Regime::Folding {
                fraction: time.max(0.0),
            };
        }
        let level = time.floor() as u32;
        let fraction = time.fract();
        if fraction == 0.0 {
            Regime::Settled { level }
        } else {
            Regime::Subdividing { level, fraction }
        }
    }

    /// Recursion depth of the copy layout; negative before the first fold
    /// completes.
    pub fn depth(&self) -> i32 {
        match *self {
            Regime::Folding { fraction } => fraction.floor() as i32 - 1,
            Regime::Settled { level } | Regime::Subdividing { level, .. } => level as i32 - 1,
        }
    }

    /// Uniform scale applied to the unit so the whole assembly stays
    /// unit-sized
    pub fn scale(&self) -> f64 {
        match *self {
            Regime::Folding { .. } => 1.0,
            Regime::Settled { level } | Regime::Subdividing { level, .. } => {
                1.0 / 2f64.powi(level as i32 - 1)
            }
        }
    }
}

/// Builds fractal meshes for any point on the timeline and memoizes the
/// copy layout per depth
#[derive(Debug, Default)]
pub struct MeshGenerator {
    config: GeneratorConfig,
    cache: PositionCache,
}

impl MeshGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            cache: PositionCache::new(),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn cache(&self) -> &PositionCache {
        &self.cache
    }

    /// The single unit shape at `time`, before replication
    pub fn unit(&self, time: f64) -> Mesh {
        let regime = Regime::from_time(time);

        let mut unit = base_shape();
        fold_up(&mut unit, time.min(1.0));

        match regime {
            Regime::Folding { .. } => return unit,
            Regime::Settled { .. } => {}
            Regime::Subdividing { fraction, .. } => {
                let mut children = split(&unit.triangles, fraction);
                fold_in(&mut children, fraction);
                unit = Mesh::from(children);
            }
        }

        unit.scale(regime.scale());
        unit
    }

    /// Mesh buffers for `time`.
    ///
    /// `time` is expected to be finite and within `[0, max_time]`; see
    /// [`GeneratorConfig::clamp_time`] and [`MeshGenerator::try_generate`].
    pub fn generate(&self, time: f64) -> MeshBuffers {
        let regime = Regime::from_time(time);
        let offsets = self.cache.get(regime.depth());
        let unit = self.unit(time);

        log::trace!(
            "generating t={time} ({regime:?}): {} triangles x {} copies",
            unit.triangles.len(),
            offsets.len()
        );
        MeshBuffers::assemble(&unit, &offsets)
    }

    /// Like [`generate`](Self::generate), rejecting times off the timeline
    pub fn try_generate(&self, time: f64) -> Result<MeshBuffers, GenerateError> {
        if !time.is_finite() {
            return Err(GenerateError::NonFinite(time));
        }
        if !(0.0..=self.config.max_time).contains(&time) {
            return Err(GenerateError::OutOfRange {
                time,
                max_time: self.config.max_time,
            });
        }
        Ok(self.generate(time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regimes() {
        assert_eq!(Regime::from_time(0.0), Regime::Folding { fraction: 0.0 });
        assert_eq!(Regime::from_time(1.0), Regime::Folding { fraction: 1.0 });
        assert_eq!(Regime::from_time(3.0), Regime::Settled { level: 3 });
        assert_eq!(
            Regime::from_time(2.5),
            Regime::Subdividing {
                level: 2,
                fraction: 0.5
            }
        );
    }

    #[test]
    fn test_regime_depth_and_scale() {
        assert_eq!(Regime::from_time(0.5).depth(), -1);
        assert_eq!(Regime::from_time(1.0).depth(), 0);
        assert_eq!(Regime::from_time(1.5).depth(), 0);
        assert_eq!(Regime::from_time(4.0).depth(), 3);
        assert_eq!(Regime::from_time(1.5).scale(), 1.0);
        assert_eq!(Regime::from_time(4.0).scale(), 0.125);
    }

    #[test]
    fn test_config_validation() {
        assert_eq!(GeneratorConfig::default().max_depth(), 7);
        assert!(matches!(
            GeneratorConfig::new(f64::NAN),
            Err(ConfigError::NonFinite(_))
        ));
        assert_eq!(GeneratorConfig::new(0.5), Err(ConfigError::TooShort(0.5)));
        assert!(matches!(
            GeneratorConfig::new(20.0),
            Err(ConfigError::TooDeep { depth: 19, .. })
        ));
        assert_eq!(GeneratorConfig::new(5.0).map(|c| c.max_depth()), Ok(4));
    }

    #[test]
    fn test_depth_cap() {
        assert_eq!(
            GeneratorConfig::new(8.9).map(|c| c.max_depth()),
            Ok(MAX_SUPPORTED_DEPTH)
        );
        assert_eq!(
            GeneratorConfig::new(9.0),
            Err(ConfigError::TooDeep {
                max_time: 9.0,
                depth: 8
            })
        );
    }

    #[test]
    fn test_clamp_time() {
        let config = GeneratorConfig::default();
        assert_eq!(config.clamp_time(-1.0), 0.0);
        assert_eq!(config.clamp_time(f64::NAN), 0.0);
        assert_eq!(config.clamp_time(f64::INFINITY), 0.0);
        assert_eq!(config.clamp_time(9.5), 8.0);
        assert_eq!(config.clamp_time(2.25), 2.25);
    }

    #[test]
    fn test_try_generate_rejects_bad_times() {
        let generator = MeshGenerator::default();
        assert!(matches!(
            generator.try_generate(f64::NAN),
            Err(GenerateError::NonFinite(_))
        ));
        assert_eq!(
            generator.try_generate(8.5),
            Err(GenerateError::OutOfRange {
                time: 8.5,
                max_time: 8.0
            })
        );
        assert_eq!(
            generator.try_generate(-0.1),
            Err(GenerateError::OutOfRange {
                time: -0.1,
                max_time: 8.0
            })
        );
        assert_eq!(generator.try_generate(2.0), Ok(generator.generate(2.0)));
    }

    #[test]
    fn test_unit_sizes() {
        let generator = MeshGenerator::default();
        assert_eq!(generator.unit(0.3).triangles.len(), 4);
        assert_eq!(generator.unit(3.0).triangles.len(), 4);
        assert_eq!(generator.unit(3.4).triangles.len(), 24);
    }
}
