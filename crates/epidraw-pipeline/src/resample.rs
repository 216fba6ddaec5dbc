//! Arc-length resampling: redistribute a polyline into a fixed number of
//! equally spaced points.
//!
//! The DFT assumes its input is sampled at uniform intervals of the
//! curve parameter. Hand-drawn strokes are not: the pointer reports
//! samples at irregular spacing, and rasterized segments have diagonal
//! steps that are longer than straight ones. Resampling by arc length
//! removes that bias before the transform.
//!
//! This is the first numeric stage of the pipeline, between stroke
//! recording and centering.

use crate::types::{EpicycleError, Point, Polyline};

/// Resample `path` into `count` points spaced `L / count` apart along
/// the path, where `L` is its total arc length.
///
/// The first output point is the first input point. The walk emits a
/// point each time the distance accumulated since the previous emitted
/// point reaches the step, interpolating inside the current segment and
/// continuing from the interpolated point rather than the next vertex.
/// Spacing therefore stays uniform across vertices.
///
/// If floating-point error exhausts the input one point early, the
/// result is padded with the last emitted point so the output length is
/// always `count`.
///
/// # Errors
///
/// Returns [`EpicycleError::InsufficientInput`] if `path` has fewer than
/// two points, and [`EpicycleError::DegeneratePath`] if its total
/// length is zero (every point identical).
///
/// # Examples
///
/// ```
/// use epidraw_pipeline::{Point, Polyline};
/// use epidraw_pipeline::resample::resample;
///
/// let line = Polyline::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
/// let out = resample(&line, 5).unwrap();
/// assert_eq!(out.len(), 5);
/// assert!((out.points()[1].x - 2.0).abs() < 1e-12);
/// ```
pub fn resample(path: &Polyline, count: usize) -> Result<Polyline, EpicycleError> {
    let points = path.points();
    if points.len() < 2 {
        return Err(EpicycleError::InsufficientInput);
    }
    if count == 0 {
        return Ok(Polyline::default());
    }

    let total = path.arc_length();
    if total <= 0.0 || !total.is_finite() {
        return Err(EpicycleError::DegeneratePath);
    }

    #[allow(clippy::cast_precision_loss)]
    let step = total / count as f64;

    let mut out = Vec::with_capacity(count);
    out.push(points[0]);

    let mut acc = 0.0;
    let mut prev = points[0];
    let mut i = 1;

    while i < points.len() && out.len() < count {
        let next = points[i];
        let d = prev.distance(next);

        if acc + d >= step {
            // `d > 0` here: `acc < step` always holds on entry.
            let t = (step - acc) / d;
            let p = prev.lerp(next, t);
            out.push(p);
            prev = p;
            acc = 0.0;
        } else {
            acc += d;
            prev = next;
            i += 1;
        }
    }

    if let Some(&last) = out.last() {
        out.resize(count, last);
    }

    Ok(Polyline::new(out))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::TAU;

    use super::*;

    fn poly(coords: &[(f64, f64)]) -> Polyline {
        Polyline::new(coords.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    fn gaps(pl: &Polyline) -> Vec<f64> {
        pl.points()
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .collect()
    }

    #[test]
    fn too_few_points_is_insufficient() {
        assert_eq!(
            resample(&poly(&[]), 10),
            Err(EpicycleError::InsufficientInput)
        );
        assert_eq!(
            resample(&poly(&[(1.0, 1.0)]), 10),
            Err(EpicycleError::InsufficientInput),
        );
    }

    #[test]
    fn zero_length_path_is_degenerate() {
        let p = poly(&[(2.0, 3.0), (2.0, 3.0), (2.0, 3.0)]);
        assert_eq!(resample(&p, 8), Err(EpicycleError::DegeneratePath));
    }

    #[test]
    fn zero_count_is_empty() {
        let p = poly(&[(0.0, 0.0), (1.0, 0.0)]);
        assert!(resample(&p, 0).unwrap().is_empty());
    }

    #[test]
    fn straight_line_is_evenly_spaced() {
        let p = poly(&[(0.0, 0.0), (10.0, 0.0)]);
        let out = resample(&p, 4).unwrap();
        let xs: Vec<f64> = out.points().iter().map(|p| p.x).collect();
        for (x, expected) in xs.iter().zip([0.0, 2.5, 5.0, 7.5]) {
            assert!((x - expected).abs() < 1e-12, "got {xs:?}");
        }
    }

    #[test]
    fn spacing_is_uniform_across_vertices() {
        // Uneven vertex density along one straight line.
        let p = poly(&[
            (0.0, 0.0),
            (0.3, 0.0),
            (0.4, 0.0),
            (7.0, 0.0),
            (7.1, 0.0),
            (20.0, 0.0),
        ]);
        let out = resample(&p, 40).unwrap();
        assert_eq!(out.len(), 40);
        let step = 20.0 / 40.0;
        for g in gaps(&out) {
            assert!((g - step).abs() < 1e-9, "gap {g} differs from {step}");
        }
        let sum: f64 = gaps(&out).iter().sum();
        assert!((sum - 20.0 * 39.0 / 40.0).abs() < 1e-9);
    }

    #[test]
    fn first_point_is_preserved() {
        let p = poly(&[(3.0, -1.0), (4.0, 5.0), (-2.0, 2.0)]);
        let out = resample(&p, 17).unwrap();
        assert_eq!(out.first(), Some(&Point::new(3.0, -1.0)));
        assert_eq!(out.len(), 17);
    }

    #[test]
    fn dense_circle_keeps_requested_count() {
        let raw: Vec<Point> = (0..=1000)
            .map(|i| {
                let a = TAU * f64::from(i) / 1000.0;
                Point::new(50.0 * a.cos(), 50.0 * a.sin())
            })
            .collect();
        let out = resample(&Polyline::new(raw), 200).unwrap();
        assert_eq!(out.len(), 200);
        let g = gaps(&out);
        let mean = g.iter().sum::<f64>() / 199.0;
        for gap in g {
            assert!((gap - mean).abs() < 1e-3 * mean);
        }
    }

    #[test]
    fn staircase_from_grid_cells() {
        // A rasterized diagonal: every step is sqrt(2).
        let p: Polyline = (0..10)
            .map(|i| Point::new(f64::from(i) + 0.5, f64::from(i) + 0.5))
            .collect();
        let out = resample(&p, 9).unwrap();
        assert_eq!(out.len(), 9);
        for g in gaps(&out) {
            assert!((g - 2.0_f64.sqrt()).abs() < 1e-9);
        }
    }
}
