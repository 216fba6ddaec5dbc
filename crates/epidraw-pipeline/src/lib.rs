//! epidraw-pipeline: Fourier epicycle decomposition of hand-drawn paths
//! (sans-IO).
//!
//! A drawn stroke goes through:
//! cell centers -> arc-length resample -> center -> DFT ->
//! top-K by amplitude -> precomputed epicycle frames -> playback.
//!
//! This crate has **no I/O dependencies**. Pointer capture, rendering,
//! and the host event loop are collaborators: they feed
//! [`Session`] gesture events and draw the [`Scene`]s it produces.

pub mod center;
pub mod dft;
pub mod diagnostics;
pub mod geometry;
pub mod playback;
pub mod resample;
pub mod session;
pub mod simulate;
pub mod stroke;
pub mod types;

pub use playback::{ManualScheduler, PlaybackPhase, Player, Scene, Scheduler};
pub use session::Session;
pub use stroke::{DrawnPath, StrokeRecorder};
pub use types::{
    AnimationFrame, EpicycleConfig, EpicycleError, FourierComponent, GridCell, Point, Polyline,
    distance,
};

/// Output of one full decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    /// Resampled and centered samples, in grid units.
    pub samples: Polyline,
    /// Components ranked by amplitude, truncated to
    /// [`EpicycleConfig::max_components`].
    pub components: Vec<FourierComponent>,
    /// Precomputed frames on the playback surface, in pixels.
    pub frames: Vec<AnimationFrame>,
}

/// Decompose a drawn path into epicycles.
///
/// `path` is the drawn stroke in grid units (cell centers, see
/// [`DrawnPath::to_polyline`]).
///
/// # Pipeline steps
///
/// 1. Resample to [`EpicycleConfig::sample_count`] points by arc length
/// 2. Translate the centroid to the origin
/// 3. DFT over all samples
/// 4. Keep the [`EpicycleConfig::max_components`] largest amplitudes
/// 5. Precompute [`EpicycleConfig::frame_count`] frames, scaled by the
///    cell size and anchored at the surface center
///
/// # Errors
///
/// Returns [`EpicycleError::InsufficientInput`] if `path` has fewer
/// than two points and [`EpicycleError::DegeneratePath`] if it has zero
/// length.
pub fn decompose(path: &Polyline, config: &EpicycleConfig) -> Result<Decomposition, EpicycleError> {
    diagnostics::decompose_with_diagnostics(path, config).map(|(decomposition, _)| decomposition)
}
