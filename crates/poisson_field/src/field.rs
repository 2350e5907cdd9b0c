//! Stateful Poisson-disc point field with removal and hole re-seeding.
//!
//! [`PoissonField`] owns the acceleration grid, the active set of points
//! still eligible to spawn candidates, and the FIFO queue of removed points
//! pending re-seeding. Generation is rejection sampling: candidates are
//! drawn in an annulus around a randomly chosen active point and accepted
//! when no already-accepted point lies within the validated radius.
use std::collections::VecDeque;
use std::f32::consts::PI;

use glam::Vec2;
use rand::RngCore;
use tracing::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::grid::SpatialGrid;
use crate::sampling::rand01;
use crate::space::SamplingSpace;

/// A point accepted into the field, paired with the grid cell it occupies.
///
/// Cell indices stay stable across removals, so callers may hold on to them
/// to address the slot later.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// Row-major cell index the point was written to.
    pub index: usize,
    /// Position inside the sampling domain.
    pub position: Vec2,
}

/// Dynamic blue-noise point field over a rectangular domain.
///
/// All randomness is drawn from the caller-supplied [`RngCore`], so a seeded
/// generator reproduces the exact same field.
#[derive(Debug, Clone)]
pub struct PoissonField {
    space: SamplingSpace,
    grid: SpatialGrid,
    active: Vec<Vec2>,
    removed: VecDeque<Vec2>,
}

impl PoissonField {
    /// Creates an empty field for the given space.
    pub fn new(space: SamplingSpace) -> Self {
        let grid = SpatialGrid::new(&space);
        Self {
            space,
            grid,
            active: Vec::new(),
            removed: VecDeque::new(),
        }
    }

    /// Current configuration.
    pub fn space(&self) -> &SamplingSpace {
        &self.space
    }

    /// The acceleration grid holding every accepted point.
    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// Number of points still eligible to spawn candidates.
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Number of evicted points waiting for a [`fill_hole`] pass.
    ///
    /// [`fill_hole`]: PoissonField::fill_hole
    pub fn removed_len(&self) -> usize {
        self.removed.len()
    }

    /// Fills the domain with blue-noise points using the configured radius.
    ///
    /// See [`fill_disc_with`](PoissonField::fill_disc_with).
    pub fn fill_disc(&mut self, rng: &mut dyn RngCore) -> Vec<Placement> {
        self.fill_disc_with(rng, None, None)
    }

    /// Fills the domain, overriding the spawn band and/or the separation
    /// check radius.
    ///
    /// Candidates are spawned at distance `[spawn_radius, 2 * spawn_radius)`
    /// from a randomly chosen active point and accepted when in bounds and no
    /// accepted point lies within `validated_radius`; both default to the
    /// configured radius. If the grid holds no points, one uniformly random
    /// seed enters the active set (the seed itself is not committed). The
    /// active set is re-seeded with every point already in the grid, so a
    /// re-invocation continues from current state. Each active point gets one
    /// turn of `max_attempts` trials and is retired afterwards, however many
    /// of its candidates were accepted.
    ///
    /// Returns the placements accepted during this call, in acceptance order.
    /// Empty when the space is unconfigured.
    pub fn fill_disc_with(
        &mut self,
        rng: &mut dyn RngCore,
        spawn_radius: Option<f32>,
        validated_radius: Option<f32>,
    ) -> Vec<Placement> {
        if !self.space.is_configured() {
            return Vec::new();
        }

        let spawn = spawn_radius.unwrap_or(self.space.radius);
        let validated = validated_radius.unwrap_or(self.space.radius);
        let mut accepted = Vec::new();

        if self.grid.occupied_count() == 0 {
            let seed = self.random_seed(rng);
            self.active.push(seed);
        }

        let existing: Vec<Vec2> = self.grid.iter().map(|(_, point)| point).collect();
        self.active.extend(existing);

        while !self.active.is_empty() {
            let pick = random_index(rng, self.active.len());
            let seed = self.active[pick];

            for _ in 0..self.space.max_attempts {
                let candidate = offset_candidate(rng, seed, spawn, spawn);
                if let Some(index) = self.try_accept(candidate, validated) {
                    self.active.push(candidate);
                    accepted.push(Placement {
                        index,
                        position: candidate,
                    });
                }
            }

            self.active.swap_remove(pick);
        }

        debug!(accepted = accepted.len(), "disc fill pass complete");
        accepted
    }

    /// Evicts the point at `index`, leaving a hole and enqueueing the point
    /// for the next [`fill_hole`] pass. Returns the evicted point, or [None]
    /// when the slot is empty or out of range (no state changes).
    ///
    /// [`fill_hole`]: PoissonField::fill_hole
    pub fn remove_at_index(&mut self, index: usize) -> Option<Vec2> {
        let point = self.grid.get(index)?;
        self.grid.set(index, None);
        self.removed.push_back(point);
        Some(point)
    }

    /// Resolves `(x, y)` to its cell index and evicts whatever occupies it.
    ///
    /// Returns the resolved index whether or not a point was evicted, so
    /// callers can address the slot later; [None] only when the coordinate
    /// resolves to no cell.
    pub fn remove_by_coord(&mut self, x: f32, y: f32) -> Option<usize> {
        let index = self.grid.index_of(x, y)?;
        self.remove_at_index(index);
        Some(index)
    }

    /// Re-seeds the gaps left by evicted points.
    ///
    /// Drains the removed queue in FIFO order. Each evicted point gets
    /// `max_attempts` trials at distance `[0, radius)` around its last known
    /// location, a deliberately tighter band than the `[radius, 2 * radius)`
    /// spawn band of [`fill_disc`], since the goal is patching a gap rather
    /// than growing the frontier. Accepted candidates are validated against
    /// the configured radius and written to the grid, but never join the
    /// active set: a patch point does not itself spawn further candidates.
    ///
    /// [`fill_disc`]: PoissonField::fill_disc
    pub fn fill_hole(&mut self, rng: &mut dyn RngCore) -> Vec<Placement> {
        let radius = self.space.radius;
        let mut accepted = Vec::new();

        while let Some(origin) = self.removed.pop_front() {
            for _ in 0..self.space.max_attempts {
                let candidate = offset_candidate(rng, origin, 0.0, radius);
                if let Some(index) = self.try_accept(candidate, radius) {
                    accepted.push(Placement {
                        index,
                        position: candidate,
                    });
                }
            }
        }

        debug!(accepted = accepted.len(), "hole fill pass complete");
        accepted
    }

    /// Produces and commits the next accepted point, or [None] when
    /// generation is complete.
    ///
    /// Single-step variant of [`fill_disc`] for callers that amortize
    /// sampling across scheduling slices. Each call picks a random active
    /// point and commits the first valid candidate out of up to
    /// `max_attempts` trials in the `[radius, 2 * radius)` band; the
    /// validation and grid write are identical to the batch path. A seed
    /// that fails every trial is retired; a successful seed stays active for
    /// later calls. On a completely empty field the first call synthesizes a
    /// random seed, and once the active set drains over a non-empty grid the
    /// field is saturated and every further call returns [None].
    ///
    /// [`fill_disc`]: PoissonField::fill_disc
    pub fn next(&mut self, rng: &mut dyn RngCore) -> Option<Placement> {
        if !self.space.is_configured() {
            return None;
        }

        if self.active.is_empty() && self.grid.occupied_count() == 0 {
            let seed = self.random_seed(rng);
            self.active.push(seed);
        }

        let spawn = self.space.radius;
        while !self.active.is_empty() {
            let pick = random_index(rng, self.active.len());
            let seed = self.active[pick];

            for _ in 0..self.space.max_attempts {
                let candidate = offset_candidate(rng, seed, spawn, spawn);
                if let Some(index) = self.try_accept(candidate, spawn) {
                    self.active.push(candidate);
                    return Some(Placement {
                        index,
                        position: candidate,
                    });
                }
            }

            self.active.swap_remove(pick);
        }

        None
    }

    /// Collects every accepted point within a three-cell window around
    /// `position`, as candidates for reactivation into the active set.
    ///
    /// Not invoked by any mutation path; exposed as a building block for
    /// incremental insertion.
    pub fn nearby_points(&self, position: Vec2) -> Vec<Vec2> {
        const REACH: isize = 3;

        let Some((column, row)) = self.grid.cell_of(position.x, position.y) else {
            return Vec::new();
        };

        let columns = self.grid.columns() as isize;
        let rows = self.grid.rows() as isize;
        let mut result = Vec::new();

        for row_offset in -REACH..=REACH {
            for column_offset in -REACH..=REACH {
                let check_row = row as isize + row_offset;
                let check_column = column as isize + column_offset;
                if check_row < 0 || check_row >= rows || check_column < 0 || check_column >= columns
                {
                    continue;
                }

                let index = (check_row * columns + check_column) as usize;
                if let Some(neighbor) = self.grid.get(index) {
                    result.push(neighbor);
                }
            }
        }

        result
    }

    /// Adopts new dimensions and/or radius.
    ///
    /// The field is cleared and regenerated only when the prospective
    /// column/row counts equal the current ones; a shape change merely adopts
    /// the new geometry and keeps the surviving slots. Callers that want a
    /// regenerated field after a shape change should call
    /// [`reconfigure`](PoissonField::reconfigure) followed by
    /// [`fill_disc`](PoissonField::fill_disc).
    ///
    /// Returns the placements produced by regeneration, empty when none ran.
    pub fn resize(
        &mut self,
        rng: &mut dyn RngCore,
        width: Option<f32>,
        height: Option<f32>,
        radius: Option<f32>,
    ) -> Vec<Placement> {
        let mut proposed = self.space;
        proposed.width = width.unwrap_or(self.space.width);
        proposed.height = height.unwrap_or(self.space.height);
        proposed.radius = radius.unwrap_or(self.space.radius);

        let mut accepted = Vec::new();
        if proposed.columns() == self.space.columns() && proposed.rows() == self.space.rows() {
            self.grid.clear();
            self.active.clear();
            accepted = self.fill_disc(rng);
            info!(
                columns = proposed.columns(),
                rows = proposed.rows(),
                "resize regenerated field"
            );
        }

        self.space = proposed;
        self.grid.reshape(&self.space);
        accepted
    }

    /// Adopts a new minimum separation, invalidating all derived state.
    ///
    /// Clears the grid, the active set, and the removed queue, then rebuilds
    /// the grid geometry, so nothing sampled against the old radius survives
    /// into the next pass.
    pub fn reconfigure(&mut self, radius: f32) {
        self.space.radius = radius;
        self.grid = SpatialGrid::new(&self.space);
        self.active.clear();
        self.removed.clear();
        info!(radius, "field reconfigured");
    }

    /// Validates and commits a candidate, returning its cell index.
    fn try_accept(&mut self, candidate: Vec2, validated_radius: f32) -> Option<usize> {
        if !self.is_valid_point(candidate, validated_radius) {
            return None;
        }
        let index = self.grid.index_of(candidate.x, candidate.y)?;
        self.grid.set(index, Some(candidate));
        Some(index)
    }

    /// True when `point` is in bounds and no accepted point lies within
    /// `validated_radius` of it.
    ///
    /// The window reach is `ceil(validated_radius / cell_size)` cells per
    /// axis, the bound that guarantees every point within the checked radius
    /// is visited.
    fn is_valid_point(&self, point: Vec2, validated_radius: f32) -> bool {
        if !self.space.is_configured() {
            return false;
        }
        if point.x < 0.0
            || point.x >= self.space.width
            || point.y < 0.0
            || point.y >= self.space.height
        {
            return false;
        }

        let Some((column, row)) = self.grid.cell_of(point.x, point.y) else {
            return false;
        };

        let reach = (validated_radius / self.grid.cell_size()).ceil() as isize;
        let min_dist_squared = validated_radius * validated_radius;
        let columns = self.grid.columns() as isize;
        let rows = self.grid.rows() as isize;

        for row_offset in -reach..=reach {
            for column_offset in -reach..=reach {
                let check_row = row as isize + row_offset;
                let check_column = column as isize + column_offset;
                if check_row < 0 || check_row >= rows || check_column < 0 || check_column >= columns
                {
                    continue;
                }

                let index = (check_row * columns + check_column) as usize;
                if let Some(neighbor) = self.grid.get(index) {
                    if (point - neighbor).length_squared() < min_dist_squared {
                        return false;
                    }
                }
            }
        }

        true
    }

    /// Uniformly random point strictly inside the domain.
    fn random_seed(&self, rng: &mut dyn RngCore) -> Vec2 {
        Vec2::new(
            (rand01(rng) * self.space.width).clamp(0.0, self.space.width.next_down()),
            (rand01(rng) * self.space.height).clamp(0.0, self.space.height.next_down()),
        )
    }
}

/// Candidate at a uniformly random angle and distance `[base, base + spread)`
/// from `origin`.
fn offset_candidate(rng: &mut dyn RngCore, origin: Vec2, base: f32, spread: f32) -> Vec2 {
    let angle = rand01(rng) * 2.0 * PI;
    let distance = base + rand01(rng) * spread;
    origin + Vec2::new(angle.cos(), angle.sin()) * distance
}

/// Uniformly random index into a non-empty collection of length `len`.
fn random_index(rng: &mut dyn RngCore, len: usize) -> usize {
    ((rand01(rng) * len as f32) as usize).min(len - 1)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn field_100x100_r10() -> PoissonField {
        PoissonField::new(SamplingSpace::new(100.0, 100.0, 10.0))
    }

    fn grid_points(field: &PoissonField) -> Vec<Vec2> {
        field.grid().iter().map(|(_, point)| point).collect()
    }

    fn min_pairwise_distance(points: &[Vec2]) -> f32 {
        let mut min = f32::MAX;
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                let dist = (points[i] - points[j]).length();
                if dist < min {
                    min = dist;
                }
            }
        }
        min
    }

    #[test]
    fn fill_disc_is_empty_when_unconfigured() {
        let mut rng = StdRng::seed_from_u64(1);

        let mut no_radius = PoissonField::new(SamplingSpace::new(100.0, 100.0, 0.0));
        assert!(no_radius.fill_disc(&mut rng).is_empty());

        let mut no_width = PoissonField::new(SamplingSpace::new(0.0, 100.0, 10.0));
        assert!(no_width.fill_disc(&mut rng).is_empty());
        assert_eq!(no_width.active_len(), 0);
    }

    #[test]
    fn fill_disc_respects_minimum_separation() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut field = field_100x100_r10();
        let placements = field.fill_disc(&mut rng);

        assert!(!placements.is_empty());
        let points = grid_points(&field);
        assert!(points.len() > 1);
        assert!(min_pairwise_distance(&points) >= 10.0 - 1e-3);
    }

    #[test]
    fn fill_disc_points_lie_inside_domain() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut field = field_100x100_r10();

        for placement in field.fill_disc(&mut rng) {
            assert!(placement.position.x >= 0.0 && placement.position.x < 100.0);
            assert!(placement.position.y >= 0.0 && placement.position.y < 100.0);
        }
    }

    #[test]
    fn fill_disc_placements_match_grid_slots() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut field = field_100x100_r10();

        for placement in field.fill_disc(&mut rng) {
            let index = field
                .grid()
                .index_of(placement.position.x, placement.position.y)
                .unwrap();
            assert_eq!(index, placement.index);
        }
        assert_eq!(field.active_len(), 0);
    }

    #[test]
    fn fill_disc_is_deterministic_for_a_seed() {
        let mut rng_a = StdRng::seed_from_u64(123);
        let mut rng_b = StdRng::seed_from_u64(123);

        let first = field_100x100_r10().fill_disc(&mut rng_a);
        let second = field_100x100_r10().fill_disc(&mut rng_b);
        assert_eq!(first, second);
    }

    #[test]
    fn fill_disc_reinvocation_continues_from_current_state() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut field = field_100x100_r10();

        let before = field.fill_disc(&mut rng).len();
        assert!(before > 0);

        field.fill_disc(&mut rng);
        let points = grid_points(&field);
        assert!(points.len() >= before);
        assert!(min_pairwise_distance(&points) >= 10.0 - 1e-3);
    }

    #[test]
    fn validated_radius_override_widens_separation() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut field = field_100x100_r10();
        let placements = field.fill_disc_with(&mut rng, None, Some(20.0));

        assert!(!placements.is_empty());
        let points = grid_points(&field);
        if points.len() > 1 {
            assert!(min_pairwise_distance(&points) >= 20.0 - 1e-3);
        }
    }

    #[test]
    fn removal_leaves_hole_and_enqueues_point() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut field = field_100x100_r10();
        let placements = field.fill_disc(&mut rng);
        let target = placements[placements.len() / 2];

        let index = field
            .remove_by_coord(target.position.x, target.position.y)
            .unwrap();
        assert_eq!(index, target.index);
        assert_eq!(field.grid().get(index), None);
        assert_eq!(field.removed_len(), 1);

        let occupied = field.grid().occupied_count();
        assert_eq!(field.remove_at_index(index), None);
        assert_eq!(field.grid().occupied_count(), occupied);
        assert_eq!(field.removed_len(), 1);
    }

    #[test]
    fn remove_at_index_out_of_range_is_a_no_op() {
        let mut field = field_100x100_r10();
        assert_eq!(field.remove_at_index(10_000), None);
        assert_eq!(field.removed_len(), 0);
    }

    #[test]
    fn remove_by_coord_returns_index_even_for_empty_slot() {
        let field_index = field_100x100_r10().remove_by_coord(5.0, 5.0);
        assert_eq!(field_index, Some(0));

        let mut unconfigured = PoissonField::new(SamplingSpace::default());
        assert_eq!(unconfigured.remove_by_coord(5.0, 5.0), None);
    }

    #[test]
    fn fill_hole_patches_near_the_evicted_point() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut field = field_100x100_r10();
        let placements = field.fill_disc(&mut rng);
        let target = placements[placements.len() / 3];

        let evicted = field.remove_at_index(target.index).unwrap();
        let patches = field.fill_hole(&mut rng);

        assert!(patches.len() <= field.space().max_attempts as usize);
        for patch in &patches {
            assert!((patch.position - evicted).length() <= 10.0 + 1e-3);
        }
        assert_eq!(field.removed_len(), 0);
        assert_eq!(field.active_len(), 0);

        let points = grid_points(&field);
        assert!(min_pairwise_distance(&points) >= 10.0 - 1e-3);
    }

    #[test]
    fn fill_hole_drains_queue_even_when_unconfigured() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut field = PoissonField::new(SamplingSpace::default());
        field.removed.push_back(Vec2::new(1.0, 1.0));

        assert!(field.fill_hole(&mut rng).is_empty());
        assert_eq!(field.removed_len(), 0);
    }

    #[test]
    fn candidate_bands_are_distinct() {
        let mut rng = StdRng::seed_from_u64(17);
        let origin = Vec2::new(50.0, 50.0);
        let radius = 10.0;

        for _ in 0..1000 {
            let grown = offset_candidate(&mut rng, origin, radius, radius);
            let dist = (grown - origin).length();
            assert!((radius - 1e-3..=2.0 * radius + 1e-3).contains(&dist));

            let patched = offset_candidate(&mut rng, origin, 0.0, radius);
            assert!((patched - origin).length() <= radius + 1e-3);
        }
    }

    #[test]
    fn next_commits_one_placement_per_call() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut field = field_100x100_r10();

        let first = field.next(&mut rng).unwrap();
        assert_eq!(field.grid().get(first.index), Some(first.position));
        assert!(field.active_len() >= 1);

        let mut produced = vec![first];
        for _ in 0..10_000 {
            match field.next(&mut rng) {
                Some(placement) => produced.push(placement),
                None => break,
            }
        }

        assert!(produced.len() > 1);
        assert_eq!(field.active_len(), 0);
        assert_eq!(field.next(&mut rng), None);

        let points = grid_points(&field);
        assert_eq!(points.len(), produced.len());
        assert!(min_pairwise_distance(&points) >= 10.0 - 1e-3);
    }

    #[test]
    fn next_is_none_when_unconfigured() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut field = PoissonField::new(SamplingSpace::default());
        assert_eq!(field.next(&mut rng), None);
    }

    #[test]
    fn nearby_points_scans_a_three_cell_window() {
        let mut field = field_100x100_r10();
        let center = Vec2::new(50.0, 50.0);
        let near = Vec2::new(64.0, 50.0);
        let far = Vec2::new(5.0, 5.0);

        let center_index = field.grid().index_of(center.x, center.y).unwrap();
        let near_index = field.grid().index_of(near.x, near.y).unwrap();
        let far_index = field.grid().index_of(far.x, far.y).unwrap();
        field.grid.set(center_index, Some(center));
        field.grid.set(near_index, Some(near));
        field.grid.set(far_index, Some(far));

        let found = field.nearby_points(center);
        assert!(found.contains(&center));
        assert!(found.contains(&near));
        assert!(!found.contains(&far));
    }

    #[test]
    fn resize_regenerates_only_when_shape_is_unchanged() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut field = field_100x100_r10();
        field.fill_disc(&mut rng);

        // ceil(101 / 7.071) == ceil(100 / 7.071) == 15: same shape, regenerate
        let regenerated = field.resize(&mut rng, Some(101.0), None, None);
        assert!(!regenerated.is_empty());
        assert_eq!(field.space().width, 101.0);

        // ceil(200 / 7.071) == 29 != 15: shape changed, no regeneration
        let occupied = field.grid().occupied_count();
        let result = field.resize(&mut rng, Some(200.0), None, None);
        assert!(result.is_empty());
        assert_eq!(field.space().width, 200.0);
        assert_eq!(field.grid().columns(), 29);
        assert_eq!(field.grid().occupied_count(), occupied);
    }

    #[test]
    fn reconfigure_clears_grid_active_set_and_queue() {
        let mut rng = StdRng::seed_from_u64(19);
        let mut field = field_100x100_r10();
        let placements = field.fill_disc(&mut rng);
        field.remove_at_index(placements[0].index);
        assert_eq!(field.removed_len(), 1);

        field.reconfigure(5.0);
        assert_eq!(field.space().radius, 5.0);
        assert_eq!(field.grid().occupied_count(), 0);
        assert_eq!(field.active_len(), 0);
        assert_eq!(field.removed_len(), 0);
        assert_eq!(field.grid().columns(), 29);
    }
}
