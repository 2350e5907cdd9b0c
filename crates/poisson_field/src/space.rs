//! Sampling domain configuration.
use std::f32::consts::SQRT_2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default number of candidate trials per seed point.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;

/// Domain extents and spacing parameters for a point field.
///
/// Zero width, height, or radius is a legal "unconfigured" state: every
/// operation on an unconfigured space yields an empty result. [`validate`]
/// rejects values that can never become meaningful (negative or non-finite).
///
/// [`validate`]: SamplingSpace::validate
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SamplingSpace {
    /// Domain width in world units.
    pub width: f32,
    /// Domain height in world units.
    pub height: f32,
    /// Minimum allowed separation between accepted points.
    pub radius: f32,
    /// Candidate trials per seed point before it is retired.
    pub max_attempts: u32,
}

impl Default for SamplingSpace {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            radius: 0.0,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl SamplingSpace {
    /// Creates a space with the given extents and minimum separation.
    pub fn new(width: f32, height: f32, radius: f32) -> Self {
        Self {
            width,
            height,
            radius,
            ..Default::default()
        }
    }

    /// Sets the number of candidate trials per seed point.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.width.is_finite() || self.width < 0.0 {
            return Err(Error::InvalidConfig("width must be finite and >= 0".into()));
        }
        if !self.height.is_finite() || self.height < 0.0 {
            return Err(Error::InvalidConfig("height must be finite and >= 0".into()));
        }
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(Error::InvalidConfig("radius must be finite and >= 0".into()));
        }
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig("max_attempts must be >= 1".into()));
        }

        Ok(())
    }

    /// Cell edge length of the acceleration grid, `radius / sqrt(2)`.
    ///
    /// Zero when the radius is unset, signalling "not configured".
    pub fn cell_size(&self) -> f32 {
        if self.radius <= 0.0 {
            return 0.0;
        }
        self.radius / SQRT_2
    }

    /// Number of grid columns, zero when width or radius is unset.
    pub fn columns(&self) -> usize {
        let cell_size = self.cell_size();
        if self.width <= 0.0 || cell_size <= 0.0 {
            return 0;
        }
        (self.width / cell_size).ceil() as usize
    }

    /// Number of grid rows, zero when height or radius is unset.
    pub fn rows(&self) -> usize {
        let cell_size = self.cell_size();
        if self.height <= 0.0 || cell_size <= 0.0 {
            return 0;
        }
        (self.height / cell_size).ceil() as usize
    }

    /// True when width, height, and radius are all set.
    pub fn is_configured(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.radius > 0.0
    }
}
