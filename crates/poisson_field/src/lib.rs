#![forbid(unsafe_code)]
//! poisson_field: dynamic, grid-accelerated Poisson-disc point distribution.
//!
//! Modules:
//! - space: sampling domain configuration
//! - grid: sparse cell store with stable indices
//! - field: stateful generation, removal, and hole re-seeding
//! - sampling: stateless strategy seam over the field
//!
//! The field lays out points so that no two are closer than a configured
//! minimum radius, and supports runtime mutation: points can be evicted and
//! the resulting gaps re-seeded with validly spaced replacements.
pub mod error;
pub mod field;
pub mod grid;
pub mod sampling;
pub mod space;

/// Convenient re-exports for common types. Import with `use poisson_field::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::field::{Placement, PoissonField};
    pub use crate::grid::SpatialGrid;
    pub use crate::sampling::{PoissonFieldSampling, PositionSampling};
    pub use crate::space::{SamplingSpace, DEFAULT_MAX_ATTEMPTS};
}
