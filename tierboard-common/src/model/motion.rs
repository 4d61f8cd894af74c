//! Directional moves
//!
//! Buckets are linear sequences, but the UI wraps them into rows. Left/right
//! step through the sequence; up/down jump by a row width that depends on
//! render-time geometry. The index arithmetic here is pure; measuring the
//! geometry is the caller's job (see [`GridGeometry`]).

use super::bucket::Bucket;
use super::snapshot::Snapshot;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// One-step reposition of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Final index for an item at `index` in a sequence of `len` items
///
/// Returns `None` when the move is a no-op:
/// - `Left` on the first item, `Right` on the last
/// - `Up` within the first row
/// - `Down` on the last item
///
/// `Down` past the end of the sequence lands on the tail instead of failing.
/// An `items_per_row` of zero is treated as one.
pub fn target_index(index: usize, len: usize, direction: Direction, items_per_row: usize) -> Option<usize> {
    if index >= len {
        return None;
    }
    let row = items_per_row.max(1);
    let last = len - 1;

    match direction {
        Direction::Left => index.checked_sub(1),
        Direction::Right => (index < last).then_some(index + 1),
        Direction::Up => index.checked_sub(row),
        Direction::Down => (index < last).then(|| (index + row).min(last)),
    }
}

/// Layout measurements used to derive the row width of a wrapped bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    /// Inner width of the bucket container
    pub container_width: f64,
    /// Rendered width of one item
    pub item_width: f64,
    /// Horizontal gap between adjacent items
    pub gap: f64,
}

impl GridGeometry {
    pub fn new(container_width: f64, item_width: f64, gap: f64) -> Self {
        Self {
            container_width,
            item_width,
            gap,
        }
    }

    /// Items that fit on one row; never less than one
    ///
    /// A row of `n` items is `n * item + (n - 1) * gap` wide, so
    /// `n = floor((container + gap) / (item + gap))`.
    pub fn items_per_row(&self) -> usize {
        let gap = if self.gap.is_finite() { self.gap.max(0.0) } else { 0.0 };
        let pitch = self.item_width + gap;
        let span = self.container_width + gap;
        if !pitch.is_finite() || !span.is_finite() || self.item_width <= 0.0 || span <= 0.0 {
            return 1;
        }
        ((span / pitch).floor() as usize).max(1)
    }
}

impl Default for GridGeometry {
    /// Single-column layout until the UI reports real measurements
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl Snapshot {
    /// Move `id` one step in `direction` within its own bucket
    ///
    /// Returns the new index, or `None` if the move was a no-op.
    pub fn move_direction(&mut self, id: &str, direction: Direction, items_per_row: usize) -> Result<Option<usize>> {
        let (bucket, index): (Bucket, usize) = self
            .locate(id)
            .ok_or_else(|| Error::NotFound(format!("item {}", id)))?;

        match target_index(index, self.bucket(bucket).len(), direction, items_per_row) {
            Some(target) => self.move_item(id, bucket, target).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_right_boundaries() {
        assert_eq!(target_index(0, 3, Direction::Left, 4), None);
        assert_eq!(target_index(1, 3, Direction::Left, 4), Some(0));
        assert_eq!(target_index(2, 3, Direction::Right, 4), None);
        assert_eq!(target_index(0, 3, Direction::Right, 4), Some(1));
        assert_eq!(target_index(0, 1, Direction::Left, 4), None);
        assert_eq!(target_index(0, 1, Direction::Right, 4), None);
    }

    #[test]
    fn test_up_is_noop_in_first_row() {
        for index in 0..4 {
            assert_eq!(target_index(index, 10, Direction::Up, 4), None);
        }
        assert_eq!(target_index(4, 10, Direction::Up, 4), Some(0));
        assert_eq!(target_index(9, 10, Direction::Up, 4), Some(5));
    }

    #[test]
    fn test_down_jumps_one_row_or_lands_on_tail() {
        assert_eq!(target_index(0, 10, Direction::Down, 4), Some(4));
        assert_eq!(target_index(5, 10, Direction::Down, 4), Some(9));
        // Last row: append to the tail
        assert_eq!(target_index(6, 10, Direction::Down, 4), Some(9));
        assert_eq!(target_index(8, 10, Direction::Down, 4), Some(9));
        // Already last
        assert_eq!(target_index(9, 10, Direction::Down, 4), None);
    }

    #[test]
    fn test_exhaustive_invariants() {
        let dirs = [Direction::Left, Direction::Right, Direction::Up, Direction::Down];
        for len in 0..12 {
            for row in 0..6 {
                for index in 0..len + 1 {
                    for dir in dirs {
                        if let Some(target) = target_index(index, len, dir, row) {
                            assert!(target < len);
                            assert_ne!(target, index);
                            match dir {
                                Direction::Left | Direction::Up => assert!(target < index),
                                Direction::Right | Direction::Down => assert!(target > index),
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_index_is_noop() {
        assert_eq!(target_index(3, 3, Direction::Left, 1), None);
        assert_eq!(target_index(0, 0, Direction::Down, 1), None);
    }

    #[test]
    fn test_zero_row_width_behaves_like_one() {
        assert_eq!(target_index(2, 5, Direction::Up, 0), Some(1));
        assert_eq!(target_index(2, 5, Direction::Down, 0), Some(3));
    }

    #[test]
    fn test_items_per_row() {
        // 5 items of 100 with 10 gaps = 540
        assert_eq!(GridGeometry::new(540.0, 100.0, 10.0).items_per_row(), 5);
        assert_eq!(GridGeometry::new(539.0, 100.0, 10.0).items_per_row(), 4);
        assert_eq!(GridGeometry::new(1000.0, 100.0, 0.0).items_per_row(), 10);
        assert_eq!(GridGeometry::new(50.0, 100.0, 10.0).items_per_row(), 1);
    }

    #[test]
    fn test_items_per_row_degenerate_geometry() {
        assert_eq!(GridGeometry::default().items_per_row(), 1);
        assert_eq!(GridGeometry::new(500.0, 0.0, 0.0).items_per_row(), 1);
        assert_eq!(GridGeometry::new(500.0, -3.0, 1.0).items_per_row(), 1);
        assert_eq!(GridGeometry::new(f64::NAN, 100.0, 0.0).items_per_row(), 1);
        assert_eq!(GridGeometry::new(f64::INFINITY, 100.0, 0.0).items_per_row(), 1);
    }

    #[test]
    fn test_move_direction_on_snapshot() {
        let mut snapshot = Snapshot::from_buckets([(Bucket::A, vec!["a", "b", "c", "d", "e"])]);

        assert_eq!(snapshot.move_direction("c", Direction::Left, 2).unwrap(), Some(1));
        assert_eq!(snapshot.bucket(Bucket::A), ["a", "c", "b", "d", "e"]);

        assert_eq!(snapshot.move_direction("a", Direction::Left, 2).unwrap(), None);
        assert_eq!(snapshot.bucket(Bucket::A), ["a", "c", "b", "d", "e"]);

        assert_eq!(snapshot.move_direction("a", Direction::Down, 2).unwrap(), Some(2));
        assert_eq!(snapshot.bucket(Bucket::A), ["c", "b", "a", "d", "e"]);

        assert_eq!(snapshot.move_direction("d", Direction::Down, 2).unwrap(), Some(4));
        assert_eq!(snapshot.bucket(Bucket::A), ["c", "b", "a", "e", "d"]);

        assert_eq!(snapshot.move_direction("e", Direction::Up, 2).unwrap(), Some(1));
        assert_eq!(snapshot.bucket(Bucket::A), ["c", "e", "b", "a", "d"]);
    }

    #[test]
    fn test_move_direction_unknown_item() {
        let mut snapshot = Snapshot::default();
        assert!(matches!(
            snapshot.move_direction("x", Direction::Up, 3),
            Err(Error::NotFound(_))
        ));
    }
}
