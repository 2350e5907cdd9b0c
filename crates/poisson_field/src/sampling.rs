//! Stateless sampling seam over the point field.
//!
//! [`PositionSampling`] is the batch boundary for consumers that want a
//! one-shot set of positions without holding a mutable [`PoissonField`].
use mint::Vector2;
use rand::RngCore;

use crate::field::PoissonField;
use crate::space::{SamplingSpace, DEFAULT_MAX_ATTEMPTS};

/// Trait for position sampling over a rectangular domain.
///
/// Generated positions lie in `[0, extent)` on each axis.
pub trait PositionSampling: Send + Sync {
    fn generate(&self, domain_extent: Vector2<f32>, rng: &mut dyn RngCore) -> Vec<Vector2<f32>>;
}

/// One-shot Poisson-disc sampling backed by a throwaway [`PoissonField`].
#[derive(Debug, Clone)]
pub struct PoissonFieldSampling {
    /// Minimum distance between samples in world units.
    pub radius: f32,
    /// Candidate trials per seed point.
    pub max_attempts: u32,
}

impl PoissonFieldSampling {
    /// Create a new sampling strategy with the specified radius.
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl PositionSampling for PoissonFieldSampling {
    fn generate(&self, domain_extent: Vector2<f32>, rng: &mut dyn RngCore) -> Vec<Vector2<f32>> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Vec::new();
        }

        let space = SamplingSpace::new(domain_extent.x, domain_extent.y, self.radius)
            .with_max_attempts(self.max_attempts);
        let mut field = PoissonField::new(space);
        field
            .fill_disc(rng)
            .into_iter()
            .map(|placement| placement.position.into())
            .collect()
    }
}

/// Generate a random float in the range [0, 1].
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}
