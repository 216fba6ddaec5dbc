//! Grid geometry: pointer-to-cell conversion and line rasterization.
//!
//! The drawing surface reports sparse pointer samples. Consecutive
//! samples are joined with [`rasterize_line`] so the recorded stroke is
//! 8-connected, with no gaps between cells.

use crate::types::{GridCell, Point};

/// Every grid cell touched by the straight segment from `a` to `b`.
///
/// Uses the integer Bresenham algorithm, so there is no floating point
/// and every octant is handled. Both endpoints are included and
/// consecutive cells differ by at most one row and one column.
///
/// The cell set does not depend on the direction of the segment:
/// `rasterize_line(b, a)` is `rasterize_line(a, b)` reversed. Ties in
/// the error term are always broken from the lexicographically smaller
/// endpoint to make this hold.
///
/// # Examples
///
/// ```
/// use epidraw_pipeline::GridCell;
/// use epidraw_pipeline::geometry::rasterize_line;
///
/// let cells = rasterize_line(GridCell::new(0, 0), GridCell::new(0, 5));
/// assert_eq!(cells.len(), 6);
/// assert!(cells.iter().all(|c| c.row == 0));
/// ```
#[must_use]
pub fn rasterize_line(a: GridCell, b: GridCell) -> Vec<GridCell> {
    if (b.row, b.col) < (a.row, a.col) {
        let mut cells = bresenham(b, a);
        cells.reverse();
        cells
    } else {
        bresenham(a, b)
    }
}

/// Bresenham walk from `from` to `to` with `x = col` and `y = row`.
fn bresenham(from: GridCell, to: GridCell) -> Vec<GridCell> {
    let (mut x, mut y) = (i64::from(from.col), i64::from(from.row));
    let (x_end, y_end) = (i64::from(to.col), i64::from(to.row));

    let dx = (x_end - x).abs();
    let dy = (y_end - y).abs();
    let sx = if x < x_end { 1 } else { -1 };
    let sy = if y < y_end { 1 } else { -1 };
    let mut err = dx - dy;

    #[allow(clippy::cast_possible_truncation)]
    let mut cells = Vec::with_capacity(dx.max(dy) as usize + 1);

    loop {
        // Coordinates stay between the two i32 endpoints.
        #[allow(clippy::cast_possible_truncation)]
        cells.push(GridCell::new(y as i32, x as i32));

        if x == x_end && y == y_end {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }

    cells
}

/// Convert a pointer position on the surface into the grid cell under
/// it.
///
/// The position is first clamped to the surface (`0 ..= size - 1` on
/// each axis, where `size = cell_size * grid_size`), so pointer samples
/// that wander off the edge land on the border cells.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn cell_at(position: Point, cell_size: f64, grid_size: u32) -> GridCell {
    let surface = cell_size * f64::from(grid_size);
    let max_pos = (surface - 1.0).max(0.0);
    let max_index = i64::from(grid_size.saturating_sub(1));

    let to_index = |v: f64| -> i32 {
        let clamped = if v.is_nan() { 0.0 } else { v.clamp(0.0, max_pos) };
        let index = (clamped / cell_size).floor();
        // Saturating float-to-int cast; NaN (cell_size == 0) becomes 0.
        (index as i64).clamp(0, max_index) as i32
    };

    GridCell::new(to_index(position.y), to_index(position.x))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn cells(coords: &[(i32, i32)]) -> Vec<GridCell> {
        coords.iter().map(|&(r, c)| GridCell::new(r, c)).collect()
    }

    fn assert_adjacent_steps(line: &[GridCell]) {
        for w in line.windows(2) {
            let dr = (w[1].row - w[0].row).abs();
            let dc = (w[1].col - w[0].col).abs();
            assert!(
                dr <= 1 && dc <= 1 && (dr, dc) != (0, 0),
                "bad step {:?} -> {:?}",
                w[0],
                w[1],
            );
        }
    }

    #[test]
    fn horizontal_row() {
        let line = rasterize_line(GridCell::new(0, 0), GridCell::new(0, 5));
        assert_eq!(
            line,
            cells(&[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4), (0, 5)])
        );
    }

    #[test]
    fn vertical_column_upward() {
        let line = rasterize_line(GridCell::new(4, 2), GridCell::new(1, 2));
        assert_eq!(line, cells(&[(4, 2), (3, 2), (2, 2), (1, 2)]));
    }

    #[test]
    fn diagonal_has_no_skipped_cells() {
        let line = rasterize_line(GridCell::new(0, 0), GridCell::new(3, 3));
        assert_eq!(line, cells(&[(0, 0), (1, 1), (2, 2), (3, 3)]));
    }

    #[test]
    fn reversed_diagonal_is_same_set() {
        let forward = rasterize_line(GridCell::new(0, 0), GridCell::new(3, 3));
        let mut backward = rasterize_line(GridCell::new(3, 3), GridCell::new(0, 0));
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn shallow_slope_reversal_is_symmetric() {
        // A tie in the error term: a naive walk picks different cells
        // depending on direction.
        let a = GridCell::new(0, 0);
        let b = GridCell::new(1, 2);
        let forward: HashSet<_> = rasterize_line(a, b).into_iter().collect();
        let backward: HashSet<_> = rasterize_line(b, a).into_iter().collect();
        assert_eq!(forward, backward);
    }

    #[test]
    fn single_cell_line() {
        let c = GridCell::new(7, 9);
        assert_eq!(rasterize_line(c, c), vec![c]);
    }

    #[test]
    fn every_octant_is_connected_and_hits_endpoints() {
        let center = GridCell::new(10, 10);
        let targets = [
            (13, 17),
            (17, 13),
            (17, 7),
            (13, 3),
            (7, 3),
            (3, 7),
            (3, 13),
            (7, 17),
        ];
        for (r, c) in targets {
            let end = GridCell::new(r, c);
            let line = rasterize_line(center, end);
            assert_eq!(line.first(), Some(&center));
            assert_eq!(line.last(), Some(&end));
            assert_adjacent_steps(&line);
            let expected_len = (r - 10).abs().max((c - 10).abs()) + 1;
            assert_eq!(line.len(), usize::try_from(expected_len).unwrap());
        }
    }

    // --- cell_at ---

    #[test]
    fn cell_at_floors_position() {
        let cell = cell_at(Point::new(10.9, 4.2), 2.0, 100);
        assert_eq!(cell, GridCell::new(2, 5));
    }

    #[test]
    fn cell_at_clamps_outside_positions() {
        assert_eq!(cell_at(Point::new(-5.0, -1.0), 2.0, 10), GridCell::new(0, 0));
        assert_eq!(cell_at(Point::new(50.0, 19.5), 2.0, 10), GridCell::new(9, 9));
    }

    #[test]
    fn cell_at_fractional_cell_size() {
        // 500px surface with 156 cells: the last pixel lands on cell 155.
        let cell_size = 500.0 / 156.0;
        let cell = cell_at(Point::new(499.9, 0.0), cell_size, 156);
        assert_eq!(cell, GridCell::new(0, 155));
        assert!(cell.in_bounds(156));
    }
}
