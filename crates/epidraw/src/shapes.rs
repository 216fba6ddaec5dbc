//! Built-in demo strokes.
//!
//! Each shape is a closed sequence of pointer samples on the grid, as a
//! drawing surface would report them. Consecutive samples may be far
//! apart; the stroke recorder fills the gaps.

use std::f64::consts::{FRAC_PI_2, TAU};

use clap::ValueEnum;
use epidraw_pipeline::GridCell;

/// Samples taken around curved shapes.
const CURVE_SAMPLES: u32 = 96;

/// A demo stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shape {
    /// Circle centered on the grid.
    Circle,
    /// Axis-aligned square.
    Square,
    /// Five-pointed star.
    Star,
    /// Parametric heart.
    Heart,
}

impl Shape {
    /// Lowercase name, as accepted on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Square => "square",
            Self::Star => "star",
            Self::Heart => "heart",
        }
    }

    /// Pointer samples for this shape on a `grid_size` grid. The last
    /// sample repeats the first.
    #[must_use]
    pub fn samples(self, grid_size: u32) -> Vec<GridCell> {
        let size = f64::from(grid_size);
        let c = size / 2.0;
        let points: Vec<(f64, f64)> = match self {
            Self::Circle => {
                let r = 0.35 * size;
                (0..CURVE_SAMPLES)
                    .map(|i| {
                        let a = TAU * f64::from(i) / f64::from(CURVE_SAMPLES);
                        (r.mul_add(a.cos(), c), r.mul_add(a.sin(), c))
                    })
                    .collect()
            }
            Self::Square => {
                let h = size * 3.0 / 10.0;
                vec![(c - h, c - h), (c + h, c - h), (c + h, c + h), (c - h, c + h)]
            }
            Self::Star => (0..10u32)
                .map(|i| {
                    let r = if i % 2 == 0 { 0.4 * size } else { 0.16 * size };
                    let a = (TAU * f64::from(i)).mul_add(0.1, -FRAC_PI_2);
                    (r.mul_add(a.cos(), c), r.mul_add(a.sin(), c))
                })
                .collect(),
            Self::Heart => {
                let s = 0.4 * size / 17.0;
                (0..CURVE_SAMPLES)
                    .map(|i| {
                        let t = TAU * f64::from(i) / f64::from(CURVE_SAMPLES);
                        let x = 16.0 * t.sin().powi(3);
                        let y = 13.0f64.mul_add(
                            t.cos(),
                            -(2.0f64.mul_add(
                                (3.0 * t).cos(),
                                5.0f64.mul_add((2.0 * t).cos(), (4.0 * t).cos()),
                            )),
                        );
                        (x.mul_add(s, c), (-y).mul_add(s, c))
                    })
                    .collect()
            }
        };

        let mut cells: Vec<GridCell> = points.into_iter().map(|(x, y)| to_cell(x, y)).collect();
        if let Some(&first) = cells.first() {
            cells.push(first);
        }
        cells
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_cell(x: f64, y: f64) -> GridCell {
    GridCell::new(y.floor() as i32, x.floor() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Shape; 4] = [Shape::Circle, Shape::Square, Shape::Star, Shape::Heart];

    #[test]
    fn shapes_are_closed() {
        for shape in ALL {
            let cells = shape.samples(156);
            assert!(cells.len() > 2, "{}", shape.name());
            assert_eq!(cells.first(), cells.last(), "{}", shape.name());
        }
    }

    #[test]
    fn shapes_fit_the_grid() {
        for shape in ALL {
            for grid in [20, 156, 400] {
                assert!(
                    shape.samples(grid).iter().all(|c| c.in_bounds(grid)),
                    "{} escapes a {grid} grid",
                    shape.name(),
                );
            }
        }
    }

    #[test]
    fn square_corners() {
        let cells = Shape::Square.samples(100);
        assert_eq!(
            cells,
            vec![
                GridCell::new(20, 20),
                GridCell::new(20, 80),
                GridCell::new(80, 80),
                GridCell::new(80, 20),
                GridCell::new(20, 20),
            ]
        );
    }

    #[test]
    fn names_round_trip_through_clap() {
        for shape in ALL {
            assert_eq!(Shape::from_str(shape.name(), false), Ok(shape));
        }
    }
}
