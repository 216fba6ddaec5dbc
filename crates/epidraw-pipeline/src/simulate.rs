//! Epicycle simulation: precompute the rotating-arm chain at evenly
//! spaced times over one revolution.
//!
//! This is the inverse transform written out as geometry. At time `t`
//! each component contributes an arm of length `amp` at angle
//! `freq·t + phase`; adding the arms tip to tail puts the last tip on
//! the reconstructed curve.

use std::f64::consts::TAU;

use crate::types::{AnimationFrame, FourierComponent, Point, Polyline};

/// Build `steps` frames of the epicycle chain anchored at `origin`.
///
/// Frame `s` is the chain at `t = s·2π/steps`. Arm lengths are
/// multiplied by `scale`, which must be the same linear unit used to
/// turn grid cells into points (the cell size in pixels) or the
/// reconstruction will be mis-sized on the surface.
///
/// Components are chained in the order given, so passing the output of
/// [`select_top`](crate::dft::select_top) puts the longest arms nearest
/// the origin.
#[must_use]
pub fn build_frames(
    components: &[FourierComponent],
    steps: usize,
    scale: f64,
    origin: Point,
) -> Vec<AnimationFrame> {
    #[allow(clippy::cast_precision_loss)]
    let dt = if steps == 0 { 0.0 } else { TAU / steps as f64 };

    (0..steps)
        .map(|s| {
            #[allow(clippy::cast_precision_loss)]
            let t = s as f64 * dt;
            let mut current = origin;
            let arms = components
                .iter()
                .map(|c| {
                    #[allow(clippy::cast_precision_loss)]
                    let angle = (c.freq as f64).mul_add(t, c.phase);
                    let (sin, cos) = angle.sin_cos();
                    let len = c.amp * scale;
                    current = Point::new(cos.mul_add(len, current.x), sin.mul_add(len, current.y));
                    current
                })
                .collect();
            AnimationFrame::new(arms)
        })
        .collect()
}

/// The pen position of every frame, in frame order.
///
/// Frames with no arms are skipped.
#[must_use]
pub fn trace(frames: &[AnimationFrame]) -> Polyline {
    frames.iter().filter_map(AnimationFrame::tip).collect()
}

/// Mean squared distance between corresponding points of two paths.
///
/// Only the common prefix is compared. Returns `None` if either path
/// is empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean_squared_error(a: &Polyline, b: &Polyline) -> Option<f64> {
    let n = a.len().min(b.len());
    if n == 0 {
        return None;
    }
    let sum: f64 = a
        .points()
        .iter()
        .zip(b.points())
        .map(|(p, q)| p.distance_squared(*q))
        .sum();
    Some(sum / n as f64)
}
