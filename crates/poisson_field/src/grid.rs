//! Sparse, index-stable cell store over a sampling space.
//!
//! Cell size is `radius / sqrt(2)`, so a cell can hold at most one accepted
//! point and a bounded window scan suffices for distance checks. Slots are
//! addressed by row-major index and are never compacted: removing a point
//! flips its slot to [None], and every other index keeps its meaning.
use glam::Vec2;

use crate::space::SamplingSpace;

/// Acceleration grid mapping cell indices to at most one accepted point each.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    columns: usize,
    rows: usize,
    slots: Vec<Option<Vec2>>,
}

impl SpatialGrid {
    /// Builds a grid sized for the given space. Unconfigured spaces produce
    /// a zero-cell grid.
    pub fn new(space: &SamplingSpace) -> Self {
        let mut grid = Self {
            cell_size: 0.0,
            columns: 0,
            rows: 0,
            slots: Vec::new(),
        };
        grid.reshape(space);
        grid
    }

    /// Recomputes geometry from `space`, keeping surviving slot contents.
    ///
    /// Slots past the new addressable range are discarded; the rest keep
    /// their index positions.
    pub(crate) fn reshape(&mut self, space: &SamplingSpace) {
        self.cell_size = space.cell_size();
        self.columns = space.columns();
        self.rows = space.rows();
        self.slots.resize(self.columns * self.rows, None);
    }

    /// Cell edge length, zero when unconfigured.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of addressable slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Column and row of the cell containing `(x, y)`, or [None] when the
    /// grid is unconfigured or the coordinate falls outside the addressable
    /// range.
    pub fn cell_of(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        if self.cell_size <= 0.0 || self.columns == 0 || self.rows == 0 {
            return None;
        }
        if !x.is_finite() || !y.is_finite() {
            return None;
        }

        let column = (x / self.cell_size).floor();
        let row = (y / self.cell_size).floor();
        if column < 0.0 || row < 0.0 {
            return None;
        }

        let (column, row) = (column as usize, row as usize);
        if column >= self.columns || row >= self.rows {
            return None;
        }
        Some((column, row))
    }

    /// Row-major cell index for a coordinate. Pure with respect to the grid
    /// geometry: identical inputs always resolve to the identical index.
    pub fn index_of(&self, x: f32, y: f32) -> Option<usize> {
        self.cell_of(x, y)
            .map(|(column, row)| row * self.columns + column)
    }

    /// Point stored at `index`, if the slot is occupied.
    pub fn get(&self, index: usize) -> Option<Vec2> {
        self.slots.get(index).copied().flatten()
    }

    /// Writes a slot directly. Passing [None] leaves a hole; the slot stays
    /// addressable and no other index shifts. Out-of-range writes are
    /// ignored.
    pub fn set(&mut self, index: usize, value: Option<Vec2>) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = value;
        }
    }

    /// Empties every slot without changing geometry.
    pub fn clear(&mut self) {
        self.slots.fill(None);
    }

    /// Number of occupied slots.
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Iterates occupied slots as `(index, point)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Vec2)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|point| (index, point)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> SpatialGrid {
        SpatialGrid::new(&SamplingSpace::new(100.0, 100.0, 10.0))
    }

    #[test]
    fn geometry_matches_space() {
        let grid = sample_grid();
        assert!((grid.cell_size() - 7.071_067_8).abs() < 1e-4);
        assert_eq!(grid.columns(), 15);
        assert_eq!(grid.rows(), 15);
        assert_eq!(grid.slot_count(), 225);
    }

    #[test]
    fn index_of_is_row_major() {
        let grid = sample_grid();
        assert_eq!(grid.index_of(5.0, 5.0), Some(0));
        assert_eq!(grid.index_of(95.0, 95.0), Some(13 * 15 + 13));
    }

    #[test]
    fn index_of_is_deterministic() {
        let grid = sample_grid();
        let first = grid.index_of(42.5, 17.3);
        let second = grid.index_of(42.5, 17.3);
        assert_eq!(first, second);
        assert!(first.is_some());
    }

    #[test]
    fn index_of_rejects_unconfigured_and_unaddressable() {
        let unconfigured = SpatialGrid::new(&SamplingSpace::default());
        assert_eq!(unconfigured.index_of(5.0, 5.0), None);

        let grid = sample_grid();
        assert_eq!(grid.index_of(-1.0, 5.0), None);
        assert_eq!(grid.index_of(5.0, 150.0), None);
        assert_eq!(grid.index_of(f32::NAN, 5.0), None);
    }

    #[test]
    fn holes_are_first_class() {
        let mut grid = sample_grid();
        let point = Vec2::new(5.0, 5.0);
        let index = grid.index_of(point.x, point.y).unwrap();

        grid.set(index, Some(point));
        assert_eq!(grid.get(index), Some(point));
        assert_eq!(grid.occupied_count(), 1);

        grid.set(index, None);
        assert_eq!(grid.get(index), None);
        assert_eq!(grid.occupied_count(), 0);
        assert_eq!(grid.slot_count(), 225);
    }

    #[test]
    fn set_ignores_out_of_range_index() {
        let mut grid = sample_grid();
        grid.set(10_000, Some(Vec2::ZERO));
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn iter_skips_holes() {
        let mut grid = sample_grid();
        grid.set(3, Some(Vec2::new(1.0, 1.0)));
        grid.set(7, Some(Vec2::new(2.0, 2.0)));
        grid.set(3, None);

        let points: Vec<_> = grid.iter().collect();
        assert_eq!(points, vec![(7, Vec2::new(2.0, 2.0))]);
    }

    #[test]
    fn reshape_preserves_surviving_slots() {
        let mut grid = sample_grid();
        grid.set(0, Some(Vec2::new(1.0, 1.0)));
        grid.set(224, Some(Vec2::new(99.0, 99.0)));

        grid.reshape(&SamplingSpace::new(50.0, 50.0, 10.0));
        assert_eq!(grid.columns(), 8);
        assert_eq!(grid.slot_count(), 64);
        assert_eq!(grid.get(0), Some(Vec2::new(1.0, 1.0)));
        assert_eq!(grid.get(224), None);
    }
}
