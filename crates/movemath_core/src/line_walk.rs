//! Bidirectional grid rasterization for straight-line queries.
//!
//! Two cursors start at opposite ends of the line and step towards each
//! other with independent Bresenham error terms. The walk stops as soon as
//! the cursors touch (within one cell on both axes). For odd-length lines
//! the shared center cell is visited twice; callers must not rely on each
//! cell being visited exactly once.

use crate::math::{Cell, Fixed, Vec2Fixed};

/// Cells of a world-space line, with the end biased into the square the
/// line actually arrives from.
///
/// An end point lying exactly on a square boundary would otherwise pick
/// the square beyond it. The bias is one world unit back towards the start
/// on each axis of travel, and none on an axis where start and end agree.
#[must_use]
pub fn line_cells(start: Vec2Fixed, end: Vec2Fixed) -> (Cell, Cell) {
    let bias = |s: Fixed, e: Fixed| -> Fixed {
        if s == e {
            Fixed::ZERO
        } else if s < e {
            -Fixed::ONE
        } else {
            Fixed::ONE
        }
    };

    let biased = Vec2Fixed::new(end.x + bias(start.x, end.x), end.z + bias(start.z, end.z));
    (start.cell(), biased.cell())
}

/// Advance one cursor by one step.
#[inline]
fn step(dir: Cell, dif: Cell, pos: &mut Cell, err: &mut (i32, i32)) {
    let prev = err.1;
    pos.x += dir.x * i32::from(prev >= 0);
    pos.z += dir.z * i32::from(prev <= 0);
    err.0 -= dif.z * i32::from(prev >= 0);
    err.0 += dif.x * i32::from(prev <= 0);
}

/// Visit the cells between `start` and `end` from both ends at once.
///
/// `visit` returns `false` to abort; the walk then returns `false`. Each
/// iteration tests the forward cursor first and skips the reverse cursor
/// if that already failed.
pub fn walk_line(start: Cell, end: Cell, mut visit: impl FnMut(Cell) -> bool) -> bool {
    let diff = Cell::new((end.x - start.x).abs(), (end.z - start.z).abs());
    let diff2 = Cell::new(diff.x * 2, diff.z * 2);

    let fwd_dir = Cell::new(
        i32::from(end.x > start.x) * 2 - 1,
        i32::from(end.z > start.z) * 2 - 1,
    );
    let rev_dir = Cell::new(
        i32::from(start.x > end.x) * 2 - 1,
        i32::from(start.z > end.z) * 2 - 1,
    );

    // error terms hold (current, previous)
    let mut fwd_err = (diff.x - diff.z, diff.x - diff.z);
    let mut rev_err = fwd_err;
    let mut fwd = start;
    let mut rev = end;

    let steps = diff.x + diff.z + 1;
    let mut fwd_ctr = steps;
    let mut rev_ctr = steps;

    while fwd_ctr > 0 && rev_ctr > 0 {
        if !(visit(fwd) && visit(rev)) {
            return false;
        }
        if fwd.is_adjacent_or_equal(rev) {
            break;
        }

        step(fwd_dir, diff2, &mut fwd, &mut fwd_err);
        step(rev_dir, diff2, &mut rev, &mut rev_err);

        // crossing a vertex exactly moves both axes in one step
        fwd_ctr -= i32::from(fwd_err.1 == 0);
        rev_ctr -= i32::from(rev_err.1 == 0);
        fwd_err.1 = fwd_err.0;
        rev_err.1 = rev_err.0;

        fwd_ctr -= 1;
        rev_ctr -= 1;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn collect(start: Cell, end: Cell) -> Vec<Cell> {
        let mut cells = Vec::new();
        walk_line(start, end, |c| {
            cells.push(c);
            true
        });
        cells
    }

    fn fixed(n: i32) -> Fixed {
        Fixed::from_num(n)
    }

    #[test]
    fn test_horizontal_even_length() {
        let cells = collect(Cell::new(0, 0), Cell::new(5, 0));
        let set: BTreeSet<_> = cells.iter().copied().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(set, (0..=5).map(|x| Cell::new(x, 0)).collect());
    }

    #[test]
    fn test_odd_length_center_visited_twice() {
        let cells = collect(Cell::new(0, 3), Cell::new(4, 3));
        assert_eq!(cells.len(), 6);
        assert_eq!(cells.iter().filter(|&&c| c == Cell::new(2, 3)).count(), 2);

        let set: BTreeSet<_> = cells.into_iter().collect();
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn test_vertical() {
        let cells: BTreeSet<_> = collect(Cell::new(2, 7), Cell::new(2, 1)).into_iter().collect();
        assert_eq!(cells, (1..=7).map(|z| Cell::new(2, z)).collect());
    }

    #[test]
    fn test_diagonal() {
        let cells: BTreeSet<_> = collect(Cell::new(0, 0), Cell::new(3, 3)).into_iter().collect();
        assert_eq!(cells, (0..=3).map(|i| Cell::new(i, i)).collect());
    }

    #[test]
    fn test_shallow_line_is_symmetric() {
        let fwd: BTreeSet<_> = collect(Cell::new(0, 0), Cell::new(2, 1)).into_iter().collect();
        let rev: BTreeSet<_> = collect(Cell::new(2, 1), Cell::new(0, 0)).into_iter().collect();

        let expected: BTreeSet<_> = [Cell::new(0, 0), Cell::new(1, 0), Cell::new(1, 1), Cell::new(2, 1)]
            .into_iter()
            .collect();
        assert_eq!(fwd, expected);
        assert_eq!(rev, expected);
    }

    #[test]
    fn test_single_cell() {
        let cells = collect(Cell::new(4, 4), Cell::new(4, 4));
        assert_eq!(cells, vec![Cell::new(4, 4), Cell::new(4, 4)]);
    }

    #[test]
    fn test_abort_short_circuits() {
        let mut visited = Vec::new();
        let ok = walk_line(Cell::new(0, 0), Cell::new(9, 0), |c| {
            visited.push(c);
            c.x != 0
        });
        assert!(!ok);
        // reverse cursor never tested once the forward one failed
        assert_eq!(visited, vec![Cell::new(0, 0)]);
    }

    #[test]
    fn test_abort_in_middle() {
        let ok = walk_line(Cell::new(0, 0), Cell::new(9, 0), |c| c.x != 6);
        assert!(!ok);
        assert!(walk_line(Cell::new(0, 0), Cell::new(9, 0), |c| c.x != 20));
    }

    #[test]
    fn test_line_cells_bias() {
        // ends exactly on the boundary between squares 1 and 2
        let start = Vec2Fixed::new(fixed(4), fixed(4));
        let end = Vec2Fixed::new(fixed(16), fixed(4));
        assert_eq!(line_cells(start, end), (Cell::new(0, 0), Cell::new(1, 0)));

        // travelling the other way the boundary square is kept
        let (s, e) = line_cells(end, start);
        assert_eq!(s, Cell::new(2, 0));
        assert_eq!(e, Cell::new(0, 0));
    }

    #[test]
    fn test_line_cells_no_bias_on_shared_axis() {
        let start = Vec2Fixed::new(fixed(16), fixed(16));
        let end = Vec2Fixed::new(fixed(16), fixed(40));
        assert_eq!(line_cells(start, end), (Cell::new(2, 2), Cell::new(2, 4)));

        assert_eq!(line_cells(start, start), (Cell::new(2, 2), Cell::new(2, 2)));
    }
}
