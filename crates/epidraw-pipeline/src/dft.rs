//! Direct discrete Fourier transform of a sampled 2D path.
//!
//! Each point `(x, y)` is treated as the complex sample `x + iy`, so
//! every output bin is one rotating arm of an epicycle chain. The
//! transform is the plain `O(N²)` sum; for the few hundred samples a
//! hand-drawn stroke is reduced to this is well under a millisecond.

use std::f64::consts::TAU;

use crate::types::{FourierComponent, Polyline};

/// Compute all `N` bins of the DFT of `path`.
///
/// For bin `k`, with `θ = 2π·k·i/N`:
///
/// ```text
/// re(k) = (1/N) Σ  x_i·cos θ + y_i·sin θ
/// im(k) = (1/N) Σ -x_i·sin θ + y_i·cos θ
/// ```
///
/// Bins above `N/2` are reported with negative frequency `k - N`, so the
/// frequencies cover `(-N/2, N/2]`. Output is in bin order.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
pub fn transform(path: &Polyline) -> Vec<FourierComponent> {
    let points = path.points();
    let n = points.len();
    if n == 0 {
        return Vec::new();
    }
    let n_f = n as f64;

    (0..n)
        .map(|k| {
            let (mut re, mut im) = (0.0, 0.0);
            for (i, p) in points.iter().enumerate() {
                // Reduce k·i modulo N before converting to keep θ small.
                let theta = TAU * ((k * i) % n) as f64 / n_f;
                let (sin, cos) = theta.sin_cos();
                re += p.x.mul_add(cos, p.y * sin);
                im += p.y.mul_add(cos, -p.x * sin);
            }
            re /= n_f;
            im /= n_f;

            let freq = if 2 * k <= n {
                k as i64
            } else {
                k as i64 - n as i64
            };

            FourierComponent {
                freq,
                amp: re.hypot(im),
                phase: im.atan2(re),
                re,
                im,
            }
        })
        .collect()
}

/// Rank components by amplitude and keep at most `k` of them.
///
/// Sorting is stable and descending by `amp`, so equal amplitudes keep
/// their incoming order. For output of [`transform`] that is ascending
/// bin index, which makes the selection deterministic.
#[must_use]
pub fn select_top(mut components: Vec<FourierComponent>, k: usize) -> Vec<FourierComponent> {
    components.sort_by(|a, b| b.amp.total_cmp(&a.amp));
    components.truncate(k);
    components
}
