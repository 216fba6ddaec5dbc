//! Translate a sampled path so its centroid sits at the origin.
//!
//! Without this, the DFT bin at frequency 0 carries the path's offset
//! from the grid corner and the first epicycle arm becomes a long
//! static arm pointing at the drawing.

use crate::types::{Point, Polyline};

/// Shift every point by the negative mean of all points.
///
/// The output has the same length as the input and its centroid is
/// `(0, 0)` up to floating-point error. An empty path is returned
/// unchanged.
#[must_use = "returns the centered polyline"]
pub fn center(path: &Polyline) -> Polyline {
    let Some(c) = path.centroid() else {
        return path.clone();
    };
    path.points()
        .iter()
        .map(|p| Point::new(p.x - c.x, p.y - c.y))
        .collect()
}
