#[cfg(feature = "rayon")]
use rayon::prelude::*;
use shoal_data::Position;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

#[derive(Clone, Default, Debug)]
/// Uniform grid over the bounding box of the current organism positions.
///
/// The world scrolls horizontally, so the grid is re-fitted on every build
/// instead of covering a fixed area.
///
/// # Implementation Notes
/// - Uses the "offset array" pattern (like compressed sparse rows):
///   `cell_offsets[i]..cell_offsets[i+1]` indexes all entries in cell `i`
/// - Cell counting runs on Rayon with atomic counters; the scatter pass is
///   sequential so entry order within a cell is deterministic
///
/// # Examples
/// ```
/// use shoal_core::spatial_hash::SpatialHash;
/// use shoal_data::Position;
///
/// let mut spatial = SpatialHash::new(10.0);
/// let positions = vec![
///     Position::new(15.0, 15.0),
///     Position::new(25.0, 25.0),
///     Position::new(85.0, 85.0),
/// ];
/// spatial.build(&positions);
///
/// let mut nearby = Vec::new();
/// spatial.query_into(15.0, 15.0, 20.0, &mut nearby);
/// assert_eq!(nearby.len(), 2);
/// ```
pub struct SpatialHash {
    pub cell_size: f64,
    pub origin_x: f64,
    pub origin_y: f64,
    pub cols: usize,
    pub rows: usize,
    pub cell_offsets: Vec<usize>,
    pub entity_indices: Vec<usize>,
    positions: Vec<Position>,
}

impl SpatialHash {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            origin_x: 0.0,
            origin_y: 0.0,
            cols: 0,
            rows: 0,
            cell_offsets: vec![0],
            entity_indices: Vec::new(),
            positions: Vec::new(),
        }
    }

    #[inline]
    pub fn get_cell_idx(&self, x: f64, y: f64) -> Option<usize> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let cx = ((x - self.origin_x) / self.cell_size).floor();
        let cy = ((y - self.origin_y) / self.cell_size).floor();
        if cx < 0.0 || cy < 0.0 || cx >= self.cols as f64 || cy >= self.rows as f64 {
            None
        } else {
            Some((cy as usize * self.cols) + cx as usize)
        }
    }

    /// Rebuilds the grid for `positions`; entry `i` is reported back as index `i`.
    pub fn build(&mut self, positions: &[Position]) {
        self.positions.clear();
        self.positions.extend_from_slice(positions);

        let finite = positions.iter().filter(|p| p.x.is_finite() && p.y.is_finite());
        let (mut min_x, mut min_y, mut max_x, mut max_y) =
            (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for p in finite {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        if min_x > max_x {
            self.cols = 0;
            self.rows = 0;
            self.cell_offsets.clear();
            self.cell_offsets.push(0);
            self.entity_indices.clear();
            return;
        }

        self.origin_x = min_x;
        self.origin_y = min_y;
        self.cols = ((max_x - min_x) / self.cell_size).floor() as usize + 1;
        self.rows = ((max_y - min_y) / self.cell_size).floor() as usize + 1;

        let cell_count = self.cols * self.rows;
        let atomic_counts: Vec<AtomicUsize> =
            (0..cell_count).map(|_| AtomicUsize::new(0)).collect();
        let count_one = |p: &Position| {
            if let Some(idx) = self.get_cell_idx(p.x, p.y) {
                atomic_counts[idx].fetch_add(1, AtomicOrdering::Relaxed);
            }
        };
        #[cfg(feature = "rayon")]
        positions.par_iter().for_each(count_one);
        #[cfg(not(feature = "rayon"))]
        positions.iter().for_each(count_one);
        let counts: Vec<usize> = atomic_counts.into_iter().map(|a| a.into_inner()).collect();

        self.cell_offsets.resize(cell_count + 1, 0);
        let mut total = 0;
        for (i, &count) in counts.iter().enumerate() {
            self.cell_offsets[i] = total;
            total += count;
        }
        self.cell_offsets[cell_count] = total;

        self.entity_indices.resize(total, 0);
        let mut current_offsets = self.cell_offsets[..cell_count].to_vec();
        for (entity_idx, p) in positions.iter().enumerate() {
            if let Some(cell_idx) = self.get_cell_idx(p.x, p.y) {
                self.entity_indices[current_offsets[cell_idx]] = entity_idx;
                current_offsets[cell_idx] += 1;
            }
        }
    }

    /// Visits every entry whose cell overlaps the query square. Callers filter
    /// by exact distance.
    pub fn query_callback<F>(&self, x: f64, y: f64, radius: f64, mut callback: F)
    where
        F: FnMut(usize),
    {
        if self.cols == 0 {
            return;
        }
        let min_cx = ((x - radius - self.origin_x) / self.cell_size).floor() as i64;
        let max_cx = ((x + radius - self.origin_x) / self.cell_size).floor() as i64;
        let min_cy = ((y - radius - self.origin_y) / self.cell_size).floor() as i64;
        let max_cy = ((y + radius - self.origin_y) / self.cell_size).floor() as i64;

        for cy in min_cy.max(0)..=max_cy.min(self.rows as i64 - 1) {
            for cx in min_cx.max(0)..=max_cx.min(self.cols as i64 - 1) {
                let cell_idx = (cy as usize * self.cols) + cx as usize;
                let start = self.cell_offsets[cell_idx];
                let end = self.cell_offsets[cell_idx + 1];
                for &entity_idx in &self.entity_indices[start..end] {
                    callback(entity_idx);
                }
            }
        }
    }

    /// Indices of entries within `radius` of `(x, y)`.
    #[inline]
    pub fn query_into(&self, x: f64, y: f64, radius: f64, result: &mut Vec<usize>) {
        result.clear();
        let center = Position::new(x, y);
        let r2 = radius * radius;
        self.query_callback(x, y, radius, |idx| {
            if self.positions[idx].distance_sq(&center) <= r2 {
                result.push(idx);
            }
        });
    }

    pub fn count_nearby(&self, x: f64, y: f64, radius: f64) -> usize {
        let mut result = Vec::new();
        self.query_into(x, y, radius, &mut result);
        result.len()
    }
}
